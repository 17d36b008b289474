//! # Mapping Profile
//!
//! Conversions between persistence entities (`crate::db::models`) and
//! transport models (`crate::models`).
//!
//! | Entity | Model | Notes |
//! |--------|-------|-------|
//! | `Camp` | `CampModel` | `location` is flattened into `venue` / `location*` |
//! | `Talk` | `TalkModel` | model → entity never sets the camp or speaker |
//! | `Speaker` | `SpeakerModel` | field-for-field |
//!
//! Entity → model is a `From<&Entity>` impl. Model → entity comes in two
//! forms: `From<&Model>` builds a fresh, unsaved entity, and `apply_to`
//! overlays the fields present in the model onto an existing snapshot and
//! returns the result.

use crate::db::models::{Camp, Location, Speaker, Talk};
use crate::models::{CampModel, SpeakerModel, TalkModel};

// ============================================
// ENTITY -> MODEL
// ============================================

impl From<&Camp> for CampModel {
    fn from(camp: &Camp) -> Self {
        Self {
            name: Some(camp.name.clone()),
            moniker: Some(camp.moniker.clone()),
            event_date: camp.event_date,
            length: Some(camp.length),
            venue: camp.location.venue_name.clone(),
            location_address1: camp.location.address1.clone(),
            location_address2: camp.location.address2.clone(),
            location_address3: camp.location.address3.clone(),
            location_city_town: camp.location.city_town.clone(),
            location_state_province: camp.location.state_province.clone(),
            location_postal_code: camp.location.postal_code.clone(),
            location_country: camp.location.country.clone(),
            talks: Some(camp.talks.iter().map(TalkModel::from).collect()),
        }
    }
}

impl From<&Talk> for TalkModel {
    fn from(talk: &Talk) -> Self {
        Self {
            title: Some(talk.title.clone()),
            abstract_text: Some(talk.abstract_text.clone()),
            level: Some(talk.level),
            speaker: talk.speaker.as_ref().map(SpeakerModel::from),
        }
    }
}

impl From<&Speaker> for SpeakerModel {
    fn from(speaker: &Speaker) -> Self {
        Self {
            first_name: Some(speaker.first_name.clone()),
            last_name: Some(speaker.last_name.clone()),
            middle_name: speaker.middle_name.clone(),
            company: speaker.company.clone(),
            company_url: speaker.company_url.clone(),
            blog_url: speaker.blog_url.clone(),
            twitter: speaker.twitter.clone(),
            github: speaker.github.clone(),
        }
    }
}

// ============================================
// MODEL -> NEW ENTITY
// ============================================

impl From<&CampModel> for Camp {
    fn from(model: &CampModel) -> Self {
        Camp {
            talks: model
                .talks
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(Talk::from)
                .collect(),
            ..model.apply_to(&Camp::default())
        }
    }
}

impl From<&TalkModel> for Talk {
    fn from(model: &TalkModel) -> Self {
        model.apply_to(&Talk::default())
    }
}

impl From<&SpeakerModel> for Speaker {
    fn from(model: &SpeakerModel) -> Self {
        model.apply_to(&Speaker::default())
    }
}

// ============================================
// MODEL OVERLAY
// ============================================

/// `Some(new)` wins over the current value.
fn overlay<T: Clone>(new: &Option<T>, current: &T) -> T {
    new.clone().unwrap_or_else(|| current.clone())
}

/// Same as [`overlay`] for fields that are optional on both sides.
fn overlay_opt<T: Clone>(new: &Option<T>, current: &Option<T>) -> Option<T> {
    new.clone().or_else(|| current.clone())
}

impl CampModel {
    /// Overlay this model onto `camp`, returning the merged snapshot.
    ///
    /// Absent fields keep their current value. Talks are never touched:
    /// the result carries `camp.talks` unchanged.
    pub fn apply_to(&self, camp: &Camp) -> Camp {
        Camp {
            camp_id: camp.camp_id,
            name: overlay(&self.name, &camp.name),
            moniker: overlay(&self.moniker, &camp.moniker),
            event_date: overlay_opt(&self.event_date, &camp.event_date),
            length: overlay(&self.length, &camp.length),
            location: Location {
                venue_name: overlay_opt(&self.venue, &camp.location.venue_name),
                address1: overlay_opt(&self.location_address1, &camp.location.address1),
                address2: overlay_opt(&self.location_address2, &camp.location.address2),
                address3: overlay_opt(&self.location_address3, &camp.location.address3),
                city_town: overlay_opt(&self.location_city_town, &camp.location.city_town),
                state_province: overlay_opt(
                    &self.location_state_province,
                    &camp.location.state_province,
                ),
                postal_code: overlay_opt(&self.location_postal_code, &camp.location.postal_code),
                country: overlay_opt(&self.location_country, &camp.location.country),
            },
            talks: camp.talks.clone(),
        }
    }
}

impl TalkModel {
    /// Overlay this model onto `talk`.
    ///
    /// The talk's camp and speaker are left as they are even when the
    /// model carries a speaker; callers assign those explicitly.
    pub fn apply_to(&self, talk: &Talk) -> Talk {
        Talk {
            talk_id: talk.talk_id,
            camp_id: talk.camp_id,
            title: overlay(&self.title, &talk.title),
            abstract_text: overlay(&self.abstract_text, &talk.abstract_text),
            level: overlay(&self.level, &talk.level),
            speaker: talk.speaker.clone(),
        }
    }
}

impl SpeakerModel {
    /// Overlay this model onto `speaker`.
    pub fn apply_to(&self, speaker: &Speaker) -> Speaker {
        Speaker {
            speaker_id: speaker.speaker_id,
            first_name: overlay(&self.first_name, &speaker.first_name),
            last_name: overlay(&self.last_name, &speaker.last_name),
            middle_name: overlay_opt(&self.middle_name, &speaker.middle_name),
            company: overlay_opt(&self.company, &speaker.company),
            company_url: overlay_opt(&self.company_url, &speaker.company_url),
            blog_url: overlay_opt(&self.blog_url, &speaker.blog_url),
            twitter: overlay_opt(&self.twitter, &speaker.twitter),
            github: overlay_opt(&self.github, &speaker.github),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stored_camp() -> Camp {
        Camp {
            camp_id: 7,
            name: "Atlanta Code Camp".to_string(),
            moniker: "atl2023".to_string(),
            event_date: NaiveDate::from_ymd_opt(2023, 10, 14),
            length: 2,
            location: Location {
                venue_name: Some("Tech Square".to_string()),
                city_town: Some("Atlanta".to_string()),
                ..Location::default()
            },
            talks: vec![Talk {
                talk_id: 3,
                camp_id: 7,
                title: "Async Rust".to_string(),
                abstract_text: "Futures all the way down".to_string(),
                level: 300,
                speaker: Some(Speaker {
                    speaker_id: 9,
                    first_name: "Grace".to_string(),
                    last_name: "Hopper".to_string(),
                    ..Speaker::default()
                }),
            }],
        }
    }

    #[test]
    fn camp_to_model_flattens_location() {
        let model = CampModel::from(&stored_camp());

        assert_eq!(model.venue.as_deref(), Some("Tech Square"));
        assert_eq!(model.location_city_town.as_deref(), Some("Atlanta"));
        assert_eq!(model.location_country, None);
        assert_eq!(model.length, Some(2));

        let talks = model.talks.unwrap();
        assert_eq!(talks.len(), 1);
        assert_eq!(
            talks[0].speaker.as_ref().unwrap().last_name.as_deref(),
            Some("Hopper")
        );
    }

    #[test]
    fn model_to_camp_rebuilds_location() {
        let model = CampModel {
            name: Some("Atlanta Code Camp".to_string()),
            moniker: Some("atl2023".to_string()),
            venue: Some("Tech Square".to_string()),
            location_postal_code: Some("30308".to_string()),
            ..CampModel::default()
        };

        let camp = Camp::from(&model);

        assert_eq!(camp.camp_id, 0);
        assert_eq!(camp.length, 1);
        assert_eq!(camp.location.venue_name.as_deref(), Some("Tech Square"));
        assert_eq!(camp.location.postal_code.as_deref(), Some("30308"));
        assert!(camp.talks.is_empty());
    }

    #[test]
    fn new_talks_from_model_have_no_speaker() {
        let model = CampModel {
            moniker: Some("atl2023".to_string()),
            talks: Some(vec![TalkModel {
                title: Some("Intro".to_string()),
                speaker: Some(SpeakerModel {
                    first_name: Some("Ada".to_string()),
                    ..SpeakerModel::default()
                }),
                ..TalkModel::default()
            }]),
            ..CampModel::default()
        };

        let camp = Camp::from(&model);

        assert_eq!(camp.talks.len(), 1);
        assert_eq!(camp.talks[0].title, "Intro");
        assert_eq!(camp.talks[0].level, 100);
        assert!(camp.talks[0].speaker.is_none());
    }

    #[test]
    fn overlay_only_replaces_present_fields() {
        let current = stored_camp();
        let patch = CampModel {
            name: Some("ATL Code Camp".to_string()),
            location_country: Some("USA".to_string()),
            talks: Some(Vec::new()),
            ..CampModel::default()
        };

        let merged = patch.apply_to(&current);

        assert_eq!(merged.name, "ATL Code Camp");
        assert_eq!(merged.location.country.as_deref(), Some("USA"));
        assert_eq!(merged.camp_id, current.camp_id);
        assert_eq!(merged.moniker, current.moniker);
        assert_eq!(merged.event_date, current.event_date);
        assert_eq!(merged.location.venue_name, current.location.venue_name);
        assert_eq!(merged.talks, current.talks);
    }

    #[test]
    fn talk_overlay_keeps_camp_and_speaker() {
        let current = stored_camp().talks.remove(0);
        let patch = TalkModel {
            title: Some("Async Rust, revisited".to_string()),
            speaker: Some(SpeakerModel::default()),
            ..TalkModel::default()
        };

        let merged = patch.apply_to(&current);

        assert_eq!(merged.title, "Async Rust, revisited");
        assert_eq!(merged.camp_id, 7);
        assert_eq!(merged.speaker, current.speaker);
    }

    #[test]
    fn speaker_round_trips() {
        let speaker = Speaker {
            speaker_id: 0,
            first_name: "Shawn".to_string(),
            last_name: "Wildermuth".to_string(),
            middle_name: None,
            company: Some("Wilder Minds LLC".to_string()),
            company_url: Some("http://wilderminds.com".to_string()),
            blog_url: Some("http://wildermuth.com".to_string()),
            twitter: Some("shawnwildermuth".to_string()),
            github: Some("shawnwildermuth".to_string()),
        };

        assert_eq!(Speaker::from(&SpeakerModel::from(&speaker)), speaker);
    }
}
