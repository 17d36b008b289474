//! # Camp Manager Service
//!
//! The CampManager sits between the HTTP handlers and the repository.
//! It performs the existence checks, builds the resource location,
//! converts through the mapping profile and turns every outcome into
//! either a model or a [`CampError`] kind the handlers map to a status.
//!
//! ## Flow Example: Create
//!
//! ```text
//! 1. POST /api/camps with a CampModel
//!                ↓
//! 2. moniker/name present?            → InvalidInput
//!                ↓
//! 3. moniker already stored?          → MonikerInUse
//!                ↓
//! 4. /api/camps/{moniker} buildable?  → InvalidMoniker
//!                ↓
//! 5. CampModel → Camp, repository.add_camp()
//!                ↓
//! 6. Return location + stored CampModel
//! ```
//!
//! Existence checks and writes are separate calls. Two creates racing on
//! the same moniker both pass step 3; the store's unique constraint makes
//! the loser fail with `MonikerInUse`.

use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::db::{Camp, CampRepository, DatabaseError, Location, Speaker, Talk};
use crate::models::CampModel;
use crate::utils::camp_location;

/// Errors that can occur in camp operations.
#[derive(Debug, thiserror::Error)]
pub enum CampError {
    /// No camp with this moniker.
    #[error("Could not find camp with moniker of {0}")]
    NotFound(String),

    /// Search returned nothing.
    #[error("No camps found on {0}")]
    NoCampsOnDate(NaiveDate),

    /// Another camp already uses this moniker.
    #[error("Moniker in Use")]
    MonikerInUse(String),

    /// The moniker cannot be turned into a resource URL.
    #[error("Could not use current moniker")]
    InvalidMoniker(String),

    /// Request is missing something it needs.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The store did not persist the change.
    #[error("{0}")]
    SaveFailed(String),

    /// Data-layer failure.
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

/// A freshly created camp and the path it can be fetched from.
#[derive(Debug, Clone)]
pub struct CreatedCamp {
    /// Value for the `Location` header, e.g. `/api/camps/atl2023`.
    pub location: String,

    /// The stored camp.
    pub camp: CampModel,
}

/// The service behind the `/api/camps` endpoints.
///
/// ## Usage
///
/// ```rust,ignore
/// let manager = CampManager::new(Arc::new(InMemoryCampRepository::new()));
/// let camps = manager.list_camps(false).await?;
/// ```
#[derive(Clone)]
pub struct CampManager {
    repository: Arc<dyn CampRepository>,
}

impl CampManager {
    /// Create a new CampManager on top of a repository.
    pub fn new(repository: Arc<dyn CampRepository>) -> Self {
        Self { repository }
    }

    // ==========================================
    // QUERIES
    // ==========================================

    /// All camps.
    pub async fn list_camps(&self, include_talks: bool) -> Result<Vec<CampModel>, CampError> {
        debug!("Listing camps (include_talks: {})", include_talks);

        let camps = self.repository.get_all_camps(include_talks).await?;
        Ok(camps.iter().map(CampModel::from).collect())
    }

    /// One camp by moniker.
    ///
    /// ## Returns
    ///
    /// * `Ok(CampModel)` - The camp
    /// * `Err(CampError::NotFound)` - No such moniker
    pub async fn get_camp(
        &self,
        moniker: &str,
        include_talks: bool,
    ) -> Result<CampModel, CampError> {
        debug!("Getting camp: {}", moniker);

        self.repository
            .get_camp(moniker, include_talks)
            .await?
            .map(|camp| CampModel::from(&camp))
            .ok_or_else(|| CampError::NotFound(moniker.to_string()))
    }

    /// Camps starting on `date`. An empty result is `NoCampsOnDate`.
    pub async fn search_by_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> Result<Vec<CampModel>, CampError> {
        debug!("Searching camps on {} (include_talks: {})", date, include_talks);

        let camps = self
            .repository
            .get_camps_by_event_date(date, include_talks)
            .await?;

        if camps.is_empty() {
            return Err(CampError::NoCampsOnDate(date));
        }

        Ok(camps.iter().map(CampModel::from).collect())
    }

    // ==========================================
    // MUTATIONS
    // ==========================================

    /// Create a camp from a model.
    pub async fn create_camp(&self, model: CampModel) -> Result<CreatedCamp, CampError> {
        let moniker = match model.moniker.as_deref().map(str::trim) {
            Some(m) if !m.is_empty() => m.to_string(),
            _ => return Err(CampError::InvalidInput("moniker is required".to_string())),
        };

        if model.name.as_deref().map(str::trim).unwrap_or_default().is_empty() {
            return Err(CampError::InvalidInput("name is required".to_string()));
        }

        if self.repository.get_camp(&moniker, false).await?.is_some() {
            return Err(CampError::MonikerInUse(moniker));
        }

        let location = camp_location(&moniker)
            .ok_or_else(|| CampError::InvalidMoniker(moniker.clone()))?;

        let camp = Camp {
            moniker: moniker.clone(),
            ..Camp::from(&model)
        };

        let stored = self
            .repository
            .add_camp(&camp)
            .await
            .map_err(|e| write_error(e, &moniker, "Failed to save the camp"))?;

        info!("Camp created: {} ({} talks)", stored.moniker, stored.talks.len());

        Ok(CreatedCamp {
            location,
            camp: CampModel::from(&stored),
        })
    }

    /// Overlay `model` onto the camp currently stored under `moniker`.
    ///
    /// Only fields present in the model change. Talks are untouched.
    /// A model identical to the stored camp is a successful no-op.
    pub async fn update_camp(
        &self,
        moniker: &str,
        model: CampModel,
    ) -> Result<CampModel, CampError> {
        let current = self
            .repository
            .get_camp(moniker, false)
            .await?
            .ok_or_else(|| CampError::NotFound(moniker.to_string()))?;

        let mut updated = model.apply_to(&current);
        updated.moniker = updated.moniker.trim().to_string();

        if updated.moniker.is_empty() {
            return Err(CampError::InvalidInput("moniker cannot be blank".to_string()));
        }
        if updated.moniker != current.moniker && camp_location(&updated.moniker).is_none() {
            return Err(CampError::InvalidMoniker(updated.moniker));
        }

        if updated == current {
            debug!("Update of {} changes nothing", moniker);
            return Ok(CampModel::from(&current));
        }

        let saved = self
            .repository
            .update_camp(&updated)
            .await
            .map_err(|e| write_error(e, &updated.moniker, "Failed to update the camp"))?;

        if !saved {
            warn!("Update of camp {} saved nothing", moniker);
            return Err(CampError::SaveFailed("Failed to update the camp".to_string()));
        }

        info!("Camp updated: {}", updated.moniker);
        Ok(CampModel::from(&updated))
    }

    /// Delete the camp stored under `moniker`, with its talks.
    pub async fn delete_camp(&self, moniker: &str) -> Result<(), CampError> {
        let current = self
            .repository
            .get_camp(moniker, false)
            .await?
            .ok_or_else(|| CampError::NotFound(moniker.to_string()))?;

        if !self.repository.delete_camp(&current).await? {
            warn!("Delete of camp {} removed nothing", moniker);
            return Err(CampError::SaveFailed("Failed to delete the camp".to_string()));
        }

        info!("Camp deleted: {}", moniker);
        Ok(())
    }

    // ==========================================
    // MAINTENANCE
    // ==========================================

    /// Whether the store answers.
    pub async fn is_store_healthy(&self) -> bool {
        match self.repository.ping().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Camp store health check failed: {}", e);
                false
            }
        }
    }

    /// Insert the demo camp when the store is empty.
    ///
    /// Returns `true` if the camp was inserted.
    pub async fn seed_demo_data(&self) -> Result<bool, CampError> {
        if self.repository.count_camps().await? > 0 {
            debug!("Store already has camps, skipping demo data");
            return Ok(false);
        }

        let stored = self.repository.add_camp(&demo_camp()).await?;
        info!("Seeded demo camp {} with {} talks", stored.moniker, stored.talks.len());
        Ok(true)
    }
}

/// Map a failed insert/update to the error callers should see.
fn write_error(e: DatabaseError, moniker: &str, rejected: &str) -> CampError {
    match e {
        DatabaseError::Conflict(_) => CampError::MonikerInUse(moniker.to_string()),
        DatabaseError::Rejected(detail) => {
            warn!("Store rejected camp {}: {}", moniker, detail);
            CampError::SaveFailed(rejected.to_string())
        }
        other => CampError::Database(other),
    }
}

/// The sample camp loaded by `SEED_DEMO_DATA`.
fn demo_camp() -> Camp {
    let speaker = |first: &str, last: &str| Speaker {
        speaker_id: 0,
        first_name: first.to_string(),
        last_name: last.to_string(),
        middle_name: None,
        company: Some("Wilder Minds LLC".to_string()),
        company_url: Some("http://wilderminds.com".to_string()),
        blog_url: Some("http://wildermuth.com".to_string()),
        twitter: Some(format!("{}{}", first, last).to_lowercase()),
        github: Some(format!("{}{}", first, last).to_lowercase()),
    };

    Camp {
        camp_id: 0,
        name: "Atlanta Code Camp".to_string(),
        moniker: "ATL2018".to_string(),
        event_date: NaiveDate::from_ymd_opt(2018, 10, 18),
        length: 1,
        location: Location {
            venue_name: Some("Atlanta Convention Center".to_string()),
            address1: Some("123 Main Street".to_string()),
            city_town: Some("Atlanta".to_string()),
            state_province: Some("GA".to_string()),
            postal_code: Some("12345".to_string()),
            country: Some("USA".to_string()),
            ..Location::default()
        },
        talks: vec![
            Talk {
                title: "Entity Framework From Scratch".to_string(),
                abstract_text: "Entity Framework from scratch in an hour. Probably cover it all".to_string(),
                level: 100,
                speaker: Some(speaker("Shawn", "Wildermuth")),
                ..Talk::default()
            },
            Talk {
                title: "Writing Sample Data Made Easy".to_string(),
                abstract_text: "Thinking of good sample data examples is tiring.".to_string(),
                level: 200,
                speaker: Some(speaker("Resa", "Wildermuth")),
                ..Talk::default()
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::InMemoryCampRepository;
    use crate::models::TalkModel;

    fn manager() -> CampManager {
        CampManager::new(Arc::new(InMemoryCampRepository::new()))
    }

    fn atl() -> CampModel {
        CampModel {
            moniker: Some("atl2023".to_string()),
            name: Some("Atlanta Code Camp".to_string()),
            venue: Some("Tech Square".to_string()),
            event_date: NaiveDate::from_ymd_opt(2023, 10, 14),
            ..CampModel::default()
        }
    }

    #[actix_rt::test]
    async fn create_then_get_returns_same_camp() {
        let manager = manager();

        let created = manager.create_camp(atl()).await.unwrap();
        let fetched = manager.get_camp("atl2023", false).await.unwrap();

        assert_eq!(created.location, "/api/camps/atl2023");
        assert_eq!(created.camp, fetched);
        assert_eq!(fetched.venue.as_deref(), Some("Tech Square"));
    }

    #[actix_rt::test]
    async fn create_requires_moniker_and_name() {
        let manager = manager();

        let no_moniker = CampModel { moniker: None, ..atl() };
        let blank_name = CampModel { name: Some("  ".to_string()), ..atl() };

        assert!(matches!(manager.create_camp(no_moniker).await, Err(CampError::InvalidInput(_))));
        assert!(matches!(manager.create_camp(blank_name).await, Err(CampError::InvalidInput(_))));
    }

    #[actix_rt::test]
    async fn create_with_taken_moniker_is_rejected() {
        let manager = manager();
        manager.create_camp(atl()).await.unwrap();

        let second = CampModel { name: Some("Impostor".to_string()), ..atl() };
        let err = manager.create_camp(second).await.unwrap_err();

        assert!(matches!(err, CampError::MonikerInUse(_)));
        let all = manager.list_camps(false).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name.as_deref(), Some("Atlanta Code Camp"));
    }

    #[actix_rt::test]
    async fn create_with_unroutable_moniker_is_rejected() {
        let manager = manager();
        let model = CampModel { moniker: Some("atl 2023".to_string()), ..atl() };

        let err = manager.create_camp(model).await.unwrap_err();

        assert!(matches!(err, CampError::InvalidMoniker(_)));
        assert!(manager.list_camps(false).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn create_rejected_by_store_is_save_failure() {
        let manager = manager();
        let model = CampModel { length: Some(0), ..atl() };

        let err = manager.create_camp(model).await.unwrap_err();

        assert!(matches!(err, CampError::SaveFailed(_)));
    }

    #[actix_rt::test]
    async fn search_with_no_matches_is_an_error() {
        let manager = manager();
        manager.create_camp(atl()).await.unwrap();

        let hit = manager
            .search_by_date(NaiveDate::from_ymd_opt(2023, 10, 14).unwrap(), false)
            .await
            .unwrap();
        let miss = manager
            .search_by_date(NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(), false)
            .await;

        assert_eq!(hit.len(), 1);
        assert!(matches!(miss, Err(CampError::NoCampsOnDate(_))));
    }

    #[actix_rt::test]
    async fn update_overlays_present_fields_and_keeps_talks() {
        let manager = manager();
        let with_talk = CampModel {
            talks: Some(vec![TalkModel {
                title: Some("Keep me".to_string()),
                ..TalkModel::default()
            }]),
            ..atl()
        };
        manager.create_camp(with_talk).await.unwrap();

        let patch = CampModel {
            name: Some("ATL Code Camp".to_string()),
            talks: Some(Vec::new()),
            ..CampModel::default()
        };
        let updated = manager.update_camp("atl2023", patch).await.unwrap();

        assert_eq!(updated.name.as_deref(), Some("ATL Code Camp"));
        assert_eq!(updated.venue.as_deref(), Some("Tech Square"));

        let stored = manager.get_camp("atl2023", true).await.unwrap();
        assert_eq!(stored.name.as_deref(), Some("ATL Code Camp"));
        assert_eq!(stored.talks.unwrap().len(), 1);
    }

    #[actix_rt::test]
    async fn update_unknown_camp_is_not_found() {
        let manager = manager();

        let err = manager.update_camp("nope", atl()).await.unwrap_err();

        assert!(matches!(err, CampError::NotFound(_)));
        assert!(manager.list_camps(false).await.unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn update_without_changes_succeeds() {
        let manager = manager();
        manager.create_camp(atl()).await.unwrap();

        let updated = manager.update_camp("atl2023", atl()).await.unwrap();

        assert_eq!(updated.moniker.as_deref(), Some("atl2023"));
    }

    #[actix_rt::test]
    async fn rename_onto_existing_moniker_is_rejected() {
        let manager = manager();
        manager.create_camp(atl()).await.unwrap();
        manager
            .create_camp(CampModel { moniker: Some("sea2023".to_string()), ..atl() })
            .await
            .unwrap();

        let patch = CampModel { moniker: Some("sea2023".to_string()), ..CampModel::default() };
        let err = manager.update_camp("atl2023", patch).await.unwrap_err();

        assert!(matches!(err, CampError::MonikerInUse(_)));
    }

    #[actix_rt::test]
    async fn rename_trims_moniker_like_create() {
        let manager = manager();
        manager.create_camp(atl()).await.unwrap();

        let patch = CampModel { moniker: Some(" atl2024 ".to_string()), ..CampModel::default() };
        let updated = manager.update_camp("atl2023", patch).await.unwrap();

        assert_eq!(updated.moniker.as_deref(), Some("atl2024"));
        assert!(manager.get_camp("atl2024", false).await.is_ok());

        let blank = CampModel { moniker: Some("   ".to_string()), ..CampModel::default() };
        let err = manager.update_camp("atl2024", blank).await.unwrap_err();
        assert!(matches!(err, CampError::InvalidInput(_)));
    }

    #[actix_rt::test]
    async fn rename_onto_routed_segment_is_rejected() {
        let manager = manager();
        manager.create_camp(atl()).await.unwrap();

        let patch = CampModel { moniker: Some("search".to_string()), ..CampModel::default() };
        let err = manager.update_camp("atl2023", patch).await.unwrap_err();

        assert!(matches!(err, CampError::InvalidMoniker(_)));
        assert!(manager.get_camp("atl2023", false).await.is_ok());
    }

    #[actix_rt::test]
    async fn delete_twice_reports_not_found() {
        let manager = manager();
        manager.create_camp(atl()).await.unwrap();

        manager.delete_camp("atl2023").await.unwrap();
        let err = manager.delete_camp("atl2023").await.unwrap_err();

        assert!(matches!(err, CampError::NotFound(_)));
    }

    #[actix_rt::test]
    async fn seed_only_fills_an_empty_store() {
        let manager = manager();

        assert!(manager.seed_demo_data().await.unwrap());
        assert!(!manager.seed_demo_data().await.unwrap());

        let camp = manager.get_camp("ATL2018", true).await.unwrap();
        let talks = camp.talks.unwrap();
        assert_eq!(talks.len(), 2);
        assert!(talks.iter().all(|t| t.speaker.is_some()));
    }
}
