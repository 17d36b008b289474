//! # Camp Transport Models
//!
//! The JSON shapes exchanged with clients. A camp's location is flattened
//! into `venue` and `location*` fields.
//!
//! Every field is optional on input so the same model serves as a full
//! POST body and as a partial PUT overlay.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::utils::deserialize_event_date;

/// Camp as seen by API clients.
///
/// ## Example JSON
///
/// ```json
/// {
///     "name": "Atlanta Code Camp",
///     "moniker": "atl2023",
///     "eventDate": "2023-10-14",
///     "length": 1,
///     "venue": "Tech Square",
///     "locationCityTown": "Atlanta",
///     "talks": []
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampModel {
    pub name: Option<String>,

    /// Unique key; also the last segment of the camp's URL.
    pub moniker: Option<String>,

    /// Accepts `YYYY-MM-DD` or a full timestamp on input.
    #[serde(deserialize_with = "deserialize_event_date")]
    pub event_date: Option<NaiveDate>,

    /// Duration in days.
    pub length: Option<i32>,

    /// Flattened `location.venue_name`.
    pub venue: Option<String>,

    pub location_address1: Option<String>,
    pub location_address2: Option<String>,
    pub location_address3: Option<String>,
    pub location_city_town: Option<String>,
    pub location_state_province: Option<String>,
    pub location_postal_code: Option<String>,
    pub location_country: Option<String>,

    /// Talks at the camp. Only populated when talks were requested.
    pub talks: Option<Vec<TalkModel>>,
}

/// Talk as seen by API clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TalkModel {
    pub title: Option<String>,

    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,

    pub level: Option<i32>,

    pub speaker: Option<SpeakerModel>,
}

/// Speaker as seen by API clients.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeakerModel {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub middle_name: Option<String>,
    pub company: Option<String>,
    pub company_url: Option<String>,
    pub blog_url: Option<String>,
    pub twitter: Option<String>,
    #[serde(rename = "gitHub")]
    pub github: Option<String>,
}
