//! # Database Models
//!
//! This module defines the persistence entities. Each struct mirrors the
//! rows of one or more tables; the camp's location is stored inline on the
//! `camps` row but kept as its own struct here.
//!
//! ## Table Overview
//!
//! | Table | Description |
//! |-------|-------------|
//! | `camps` | Events, keyed by their unique moniker |
//! | `talks` | Sessions belonging to exactly one camp |
//! | `speakers` | Speaker profiles, shared between talks |
//!
//! ## Relationship Diagram
//!
//! ```text
//! ┌─────────────┐       ┌──────────────────┐       ┌──────────────┐
//! │   camps     │──────<│      talks       │>──────│   speakers   │
//! │             │       │                  │       │              │
//! │ camp_id(PK) │       │ camp_id (FK)     │       │speaker_id(PK)│
//! │ moniker(UQ) │       │ speaker_id (FK)  │       │ first_name   │
//! │ venue_name  │       │ title            │       │ last_name    │
//! │ ...         │       │ abstract         │       │ ...          │
//! └─────────────┘       └──────────────────┘       └──────────────┘
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A camp (event).
///
/// `camp_id` is zero until the record has been stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    /// Surrogate key assigned by the store.
    pub camp_id: i32,

    /// Display name, e.g. "Atlanta Code Camp".
    pub name: String,

    /// Unique human-readable key, e.g. "atl2023".
    pub moniker: String,

    /// First day of the event.
    pub event_date: Option<NaiveDate>,

    /// Number of days the event runs.
    pub length: i32,

    /// Where the camp takes place.
    pub location: Location,

    /// Talks owned by this camp. Empty unless talks were requested.
    pub talks: Vec<Talk>,
}

impl Default for Camp {
    fn default() -> Self {
        Self {
            camp_id: 0,
            name: String::new(),
            moniker: String::new(),
            event_date: None,
            length: 1,
            location: Location::default(),
            talks: Vec::new(),
        }
    }
}

/// Physical location of a camp.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub venue_name: Option<String>,
    pub address1: Option<String>,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city_town: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// A talk given at a camp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Talk {
    /// Surrogate key assigned by the store.
    pub talk_id: i32,

    /// Owning camp. Zero until assigned by the store.
    pub camp_id: i32,

    pub title: String,

    /// Talk abstract (`abstract` is reserved in Rust).
    pub abstract_text: String,

    /// Audience level, e.g. 100 (intro) to 400 (expert).
    pub level: i32,

    /// Who gives the talk, if assigned.
    pub speaker: Option<Speaker>,
}

impl Default for Talk {
    fn default() -> Self {
        Self {
            talk_id: 0,
            camp_id: 0,
            title: String::new(),
            abstract_text: String::new(),
            level: 100,
            speaker: None,
        }
    }
}

/// Speaker profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Speaker {
    /// Surrogate key; zero for a speaker not yet stored.
    pub speaker_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub blog_url: Option<String>,
    pub twitter: Option<String>,
    pub github: Option<String>,
}

impl Camp {
    /// Copy of this camp without its talks.
    pub fn without_talks(&self) -> Self {
        Self {
            talks: Vec::new(),
            ..self.clone()
        }
    }
}
