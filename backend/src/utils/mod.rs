//! # Utilities Module
//!
//! This module contains helper functions used across the backend service.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

/// Base path of the camp resources.
pub const CAMPS_BASE_PATH: &str = "/api/camps";

/// Literal segments routed under [`CAMPS_BASE_PATH`] ahead of `{moniker}`.
pub const RESERVED_CAMP_SEGMENTS: &[&str] = &["search"];

/// Build the URL path of a camp's `GET` endpoint.
///
/// Returns `None` when the moniker cannot be used as a single path
/// segment: it is empty or contains characters outside the URL
/// unreserved set (`A-Z a-z 0-9 - . _ ~`). `.` and `..` are rejected too,
/// as is any segment in [`RESERVED_CAMP_SEGMENTS`], whose URL would not
/// reach the camp.
///
/// ## Examples
///
/// ```rust,ignore
/// assert_eq!(camp_location("atl2023").as_deref(), Some("/api/camps/atl2023"));
/// assert_eq!(camp_location("atl 2023"), None);
/// ```
pub fn camp_location(moniker: &str) -> Option<String> {
    let usable = !moniker.is_empty()
        && moniker != "."
        && moniker != ".."
        && !RESERVED_CAMP_SEGMENTS.contains(&moniker)
        && moniker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~'));

    if usable {
        Some(format!("{}/{}", CAMPS_BASE_PATH, moniker))
    } else {
        None
    }
}

/// Parse an event date.
///
/// Accepts `YYYY-MM-DD`, an RFC 3339 timestamp, or a timestamp without
/// offset (`YYYY-MM-DDTHH:MM:SS`). Only the date part is kept.
pub fn parse_event_date(value: &str) -> Result<NaiveDate, String> {
    let value = value.trim();

    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(value) {
        return Ok(timestamp.date_naive());
    }
    if let Ok(timestamp) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(timestamp.date());
    }

    Err(format!("Invalid date: {}", value))
}

/// Serde adapter for optional event dates, see [`parse_event_date`].
pub fn deserialize_event_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|value| parse_event_date(&value).map_err(serde::de::Error::custom))
        .transpose()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camp_location() {
        assert_eq!(camp_location("atl2023").as_deref(), Some("/api/camps/atl2023"));
        assert_eq!(camp_location("code-camp_2023.v~1").as_deref(), Some("/api/camps/code-camp_2023.v~1"));
        assert_eq!(camp_location(""), None);
        assert_eq!(camp_location(".."), None);
        assert_eq!(camp_location("atl 2023"), None);
        assert_eq!(camp_location("atl/2023"), None);
        assert_eq!(camp_location("atl?x=1"), None);
        assert_eq!(camp_location("search"), None);
        assert_eq!(camp_location("Search").as_deref(), Some("/api/camps/Search"));
    }

    #[test]
    fn test_parse_event_date() {
        let expected = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();

        assert_eq!(parse_event_date("2023-01-01").unwrap(), expected);
        assert_eq!(parse_event_date(" 2023-01-01 ").unwrap(), expected);
        assert_eq!(parse_event_date("2023-01-01T09:30:00Z").unwrap(), expected);
        assert_eq!(parse_event_date("2023-01-01T09:30:00").unwrap(), expected);
        assert_eq!(parse_event_date("2023-01-01T09:30:00.250").unwrap(), expected);
        assert!(parse_event_date("01/01/2023").is_err());
        assert!(parse_event_date("2023-02-30").is_err());
    }
}
