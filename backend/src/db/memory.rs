use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::Camp;
use super::repository::CampRepository;
use super::DatabaseError;

/// `camps.moniker VARCHAR(100)`
const MONIKER_MAX_CHARS: usize = 100;
/// `camps.name VARCHAR(200)`
const NAME_MAX_CHARS: usize = 200;

#[derive(Debug)]
struct Tables {
    /// Camps keyed by moniker, so iteration is moniker-ordered.
    camps: BTreeMap<String, Camp>,
    next_camp_id: i32,
    next_talk_id: i32,
    next_speaker_id: i32,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            camps: BTreeMap::new(),
            next_camp_id: 1,
            next_talk_id: 1,
            next_speaker_id: 1,
        }
    }
}

/// In-memory camp store.
///
/// Intended for tests/dev. Mirrors the PostgreSQL schema's constraints on
/// camp rows: unique monikers, `length >= 1`, and the `VARCHAR` limits of
/// `moniker` and `name`.
#[derive(Debug, Default)]
pub struct InMemoryCampRepository {
    tables: RwLock<Tables>,
}

impl InMemoryCampRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DatabaseError> {
        self.tables
            .read()
            .map_err(|_| DatabaseError::ConnectionError("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DatabaseError> {
        self.tables
            .write()
            .map_err(|_| DatabaseError::ConnectionError("lock poisoned".to_string()))
    }

    fn check_row(camp: &Camp) -> Result<(), DatabaseError> {
        for (column, value, limit) in [
            ("moniker", &camp.moniker, MONIKER_MAX_CHARS),
            ("name", &camp.name, NAME_MAX_CHARS),
        ] {
            if value.chars().count() > limit {
                return Err(DatabaseError::Rejected(format!(
                    "value too long for {} (max {} characters)",
                    column, limit
                )));
            }
        }
        if camp.length < 1 {
            return Err(DatabaseError::Rejected(format!(
                "length must be at least 1, got {}",
                camp.length
            )));
        }
        Ok(())
    }

    fn project(camp: &Camp, include_talks: bool) -> Camp {
        if include_talks {
            camp.clone()
        } else {
            camp.without_talks()
        }
    }
}

#[async_trait]
impl CampRepository for InMemoryCampRepository {
    async fn get_all_camps(&self, include_talks: bool) -> Result<Vec<Camp>, DatabaseError> {
        let tables = self.read()?;
        Ok(tables
            .camps
            .values()
            .map(|c| Self::project(c, include_talks))
            .collect())
    }

    async fn get_camp(
        &self,
        moniker: &str,
        include_talks: bool,
    ) -> Result<Option<Camp>, DatabaseError> {
        let tables = self.read()?;
        Ok(tables
            .camps
            .get(moniker)
            .map(|c| Self::project(c, include_talks)))
    }

    async fn get_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> Result<Vec<Camp>, DatabaseError> {
        let tables = self.read()?;
        Ok(tables
            .camps
            .values()
            .filter(|c| c.event_date == Some(date))
            .map(|c| Self::project(c, include_talks))
            .collect())
    }

    async fn add_camp(&self, camp: &Camp) -> Result<Camp, DatabaseError> {
        Self::check_row(camp)?;

        let mut tables = self.write()?;

        if tables.camps.contains_key(&camp.moniker) {
            return Err(DatabaseError::Conflict(format!(
                "moniker {} already exists",
                camp.moniker
            )));
        }

        let mut stored = camp.clone();
        stored.camp_id = tables.next_camp_id;
        tables.next_camp_id += 1;

        for talk in stored.talks.iter_mut() {
            talk.talk_id = tables.next_talk_id;
            talk.camp_id = stored.camp_id;
            tables.next_talk_id += 1;

            if let Some(speaker) = talk.speaker.as_mut() {
                if speaker.speaker_id == 0 {
                    speaker.speaker_id = tables.next_speaker_id;
                    tables.next_speaker_id += 1;
                }
            }
        }

        tables.camps.insert(stored.moniker.clone(), stored.clone());
        Ok(stored)
    }

    async fn update_camp(&self, camp: &Camp) -> Result<bool, DatabaseError> {
        Self::check_row(camp)?;

        let mut tables = self.write()?;

        let current_key = match tables
            .camps
            .iter()
            .find(|(_, c)| c.camp_id == camp.camp_id)
            .map(|(k, _)| k.clone())
        {
            Some(key) => key,
            None => return Ok(false),
        };

        if current_key != camp.moniker && tables.camps.contains_key(&camp.moniker) {
            return Err(DatabaseError::Conflict(format!(
                "moniker {} already exists",
                camp.moniker
            )));
        }

        let talks = match tables.camps.remove(&current_key) {
            Some(previous) => previous.talks,
            None => return Ok(false),
        };

        tables.camps.insert(
            camp.moniker.clone(),
            Camp {
                talks,
                ..camp.clone()
            },
        );
        Ok(true)
    }

    async fn delete_camp(&self, camp: &Camp) -> Result<bool, DatabaseError> {
        let mut tables = self.write()?;

        let matches = tables
            .camps
            .get(&camp.moniker)
            .map(|c| c.camp_id == camp.camp_id)
            .unwrap_or(false);

        if matches {
            tables.camps.remove(&camp.moniker);
        }
        Ok(matches)
    }

    async fn count_camps(&self) -> Result<i64, DatabaseError> {
        Ok(self.read()?.camps.len() as i64)
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Speaker, Talk};

    fn camp(moniker: &str, date: Option<NaiveDate>) -> Camp {
        Camp {
            name: format!("{} camp", moniker),
            moniker: moniker.to_string(),
            event_date: date,
            ..Camp::default()
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[actix_rt::test]
    async fn add_assigns_ids_to_camp_talks_and_new_speakers() {
        let repo = InMemoryCampRepository::new();
        let mut new_camp = camp("atl2023", None);
        new_camp.talks = vec![
            Talk {
                title: "Rust for C# developers".to_string(),
                speaker: Some(Speaker {
                    first_name: "Ada".to_string(),
                    last_name: "Lovelace".to_string(),
                    ..Speaker::default()
                }),
                ..Talk::default()
            },
            Talk {
                title: "Unassigned".to_string(),
                ..Talk::default()
            },
        ];

        let stored = repo.add_camp(&new_camp).await.unwrap();

        assert_eq!(stored.camp_id, 1);
        assert_eq!(stored.talks[0].talk_id, 1);
        assert_eq!(stored.talks[1].talk_id, 2);
        assert!(stored.talks.iter().all(|t| t.camp_id == stored.camp_id));
        assert_eq!(stored.talks[0].speaker.as_ref().unwrap().speaker_id, 1);
        assert!(stored.talks[1].speaker.is_none());
    }

    #[actix_rt::test]
    async fn add_rejects_duplicate_moniker() {
        let repo = InMemoryCampRepository::new();
        repo.add_camp(&camp("atl2023", None)).await.unwrap();

        let err = repo.add_camp(&camp("atl2023", None)).await.unwrap_err();

        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert_eq!(repo.count_camps().await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn add_rejects_non_positive_length() {
        let repo = InMemoryCampRepository::new();
        let mut bad = camp("atl2023", None);
        bad.length = 0;

        let err = repo.add_camp(&bad).await.unwrap_err();

        assert!(matches!(err, DatabaseError::Rejected(_)));
        assert_eq!(repo.count_camps().await.unwrap(), 0);
    }

    #[actix_rt::test]
    async fn add_rejects_values_longer_than_their_columns() {
        let repo = InMemoryCampRepository::new();
        let long_moniker = camp(&"m".repeat(101), None);
        let long_name = Camp {
            name: "n".repeat(201),
            ..camp("atl2023", None)
        };

        assert!(matches!(repo.add_camp(&long_moniker).await, Err(DatabaseError::Rejected(_))));
        assert!(matches!(repo.add_camp(&long_name).await, Err(DatabaseError::Rejected(_))));
        assert!(repo.add_camp(&camp(&"m".repeat(100), None)).await.is_ok());
        assert_eq!(repo.count_camps().await.unwrap(), 1);
    }

    #[actix_rt::test]
    async fn talks_are_only_returned_when_requested() {
        let repo = InMemoryCampRepository::new();
        let mut new_camp = camp("atl2023", None);
        new_camp.talks = vec![Talk::default()];
        repo.add_camp(&new_camp).await.unwrap();

        let without = repo.get_camp("atl2023", false).await.unwrap().unwrap();
        let with = repo.get_camp("atl2023", true).await.unwrap().unwrap();

        assert!(without.talks.is_empty());
        assert_eq!(with.talks.len(), 1);
    }

    #[actix_rt::test]
    async fn search_matches_event_date_only() {
        let repo = InMemoryCampRepository::new();
        repo.add_camp(&camp("a", Some(date(2023, 1, 1)))).await.unwrap();
        repo.add_camp(&camp("b", Some(date(2023, 1, 2)))).await.unwrap();
        repo.add_camp(&camp("c", None)).await.unwrap();

        let found = repo.get_camps_by_event_date(date(2023, 1, 1), false).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].moniker, "a");
    }

    #[actix_rt::test]
    async fn update_keeps_talks_and_supports_renaming() {
        let repo = InMemoryCampRepository::new();
        let mut new_camp = camp("atl2023", None);
        new_camp.talks = vec![Talk::default()];
        let stored = repo.add_camp(&new_camp).await.unwrap();

        let renamed = Camp {
            moniker: "atl2024".to_string(),
            talks: Vec::new(),
            ..stored.clone()
        };
        assert!(repo.update_camp(&renamed).await.unwrap());

        assert!(repo.get_camp("atl2023", false).await.unwrap().is_none());
        let after = repo.get_camp("atl2024", true).await.unwrap().unwrap();
        assert_eq!(after.talks.len(), 1);
    }

    #[actix_rt::test]
    async fn update_onto_taken_moniker_conflicts() {
        let repo = InMemoryCampRepository::new();
        let first = repo.add_camp(&camp("one", None)).await.unwrap();
        repo.add_camp(&camp("two", None)).await.unwrap();

        let clash = Camp {
            moniker: "two".to_string(),
            ..first
        };

        let err = repo.update_camp(&clash).await.unwrap_err();
        assert!(matches!(err, DatabaseError::Conflict(_)));
        assert!(repo.get_camp("one", false).await.unwrap().is_some());
    }

    #[actix_rt::test]
    async fn update_and_delete_of_missing_camp_report_false() {
        let repo = InMemoryCampRepository::new();
        let ghost = Camp {
            camp_id: 42,
            ..camp("ghost", None)
        };

        assert!(!repo.update_camp(&ghost).await.unwrap());
        assert!(!repo.delete_camp(&ghost).await.unwrap());
    }

    #[actix_rt::test]
    async fn delete_removes_camp() {
        let repo = InMemoryCampRepository::new();
        let stored = repo.add_camp(&camp("atl2023", None)).await.unwrap();

        assert!(repo.delete_camp(&stored).await.unwrap());
        assert!(!repo.delete_camp(&stored).await.unwrap());
        assert_eq!(repo.count_camps().await.unwrap(), 0);
    }
}
