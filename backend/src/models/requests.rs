//! # API Request Models
//!
//! Query-string parameters accepted by the camp endpoints. Request bodies
//! are [`super::CampModel`].

use serde::{Deserialize, Serialize};

/// Query parameters for `GET /api/camps` and `GET /api/camps/{moniker}`.
///
/// ## Example
///
/// `GET /api/camps?includeTalks=true`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampsQuery {
    /// Load each camp's talks (with speakers).
    #[serde(default)]
    pub include_talks: bool,
}

/// Query parameters for `GET /api/camps/search`.
///
/// ## Example
///
/// `GET /api/camps/search?theDate=2023-10-14&includeTalks=true`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Event date, `YYYY-MM-DD` or an RFC 3339 timestamp.
    pub the_date: Option<String>,

    /// Load each camp's talks (with speakers).
    #[serde(default)]
    pub include_talks: bool,
}
