//! # Camp Repository
//!
//! The data-access seam used by [`crate::services::CampManager`].
//! Every call either returns data or a [`DatabaseError`]; nothing panics
//! and nothing is signalled out of band.
//!
//! The mutating calls report whether anything was persisted. `Ok(false)`
//! means the store accepted the request but saved nothing (for example
//! the row disappeared between the read and the write).

use async_trait::async_trait;
use chrono::NaiveDate;

use super::models::Camp;
use super::{queries, Database, DatabaseError};

/// Data access for camps and their talks.
#[async_trait]
pub trait CampRepository: Send + Sync {
    /// All camps, ordered by moniker.
    async fn get_all_camps(&self, include_talks: bool) -> Result<Vec<Camp>, DatabaseError>;

    /// The camp with this moniker, if any.
    async fn get_camp(
        &self,
        moniker: &str,
        include_talks: bool,
    ) -> Result<Option<Camp>, DatabaseError>;

    /// Camps whose event starts on `date`.
    async fn get_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> Result<Vec<Camp>, DatabaseError>;

    /// Store a new camp with its talks. Returns the stored snapshot.
    async fn add_camp(&self, camp: &Camp) -> Result<Camp, DatabaseError>;

    /// Replace the stored camp row identified by `camp.camp_id`.
    /// Talks are left as they are.
    async fn update_camp(&self, camp: &Camp) -> Result<bool, DatabaseError>;

    /// Remove a camp and its talks.
    async fn delete_camp(&self, camp: &Camp) -> Result<bool, DatabaseError>;

    /// Number of stored camps.
    async fn count_camps(&self) -> Result<i64, DatabaseError>;

    /// Check the store is reachable.
    async fn ping(&self) -> Result<(), DatabaseError>;
}

#[async_trait]
impl CampRepository for Database {
    async fn get_all_camps(&self, include_talks: bool) -> Result<Vec<Camp>, DatabaseError> {
        queries::get_all_camps(self.pool(), include_talks).await
    }

    async fn get_camp(
        &self,
        moniker: &str,
        include_talks: bool,
    ) -> Result<Option<Camp>, DatabaseError> {
        queries::get_camp_by_moniker(self.pool(), moniker, include_talks).await
    }

    async fn get_camps_by_event_date(
        &self,
        date: NaiveDate,
        include_talks: bool,
    ) -> Result<Vec<Camp>, DatabaseError> {
        queries::get_camps_by_event_date(self.pool(), date, include_talks).await
    }

    async fn add_camp(&self, camp: &Camp) -> Result<Camp, DatabaseError> {
        queries::insert_camp(self.pool(), camp).await
    }

    async fn update_camp(&self, camp: &Camp) -> Result<bool, DatabaseError> {
        Ok(queries::update_camp(self.pool(), camp).await? == 1)
    }

    async fn delete_camp(&self, camp: &Camp) -> Result<bool, DatabaseError> {
        Ok(queries::delete_camp(self.pool(), camp.camp_id).await? == 1)
    }

    async fn count_camps(&self) -> Result<i64, DatabaseError> {
        queries::count_camps(self.pool()).await
    }

    async fn ping(&self) -> Result<(), DatabaseError> {
        queries::ping(self.pool()).await
    }
}
