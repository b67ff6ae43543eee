//! Tribute model with its nested funeral details and RSVP entries.

use serde::{Deserialize, Serialize};

use super::null_as_default;

/// An attendance response for a tribute's funeral event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Rsvp {
    /// Attendee name, the de-duplication key within one `rsvp_list`.
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attending: bool,
    /// RFC 3339 UTC instant of the latest submission.
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
}

/// Funeral event information attached to a tribute.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct FuneralDetails {
    #[serde(default, deserialize_with = "null_as_default")]
    pub rsvp_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsvp_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rsvp_list: Vec<Rsvp>,
}

impl FuneralDetails {
    /// Insert or replace the RSVP for `rsvp.name`, keeping the position of an
    /// existing entry.
    pub fn upsert_rsvp(&mut self, rsvp: Rsvp) {
        match self.rsvp_list.iter_mut().find(|r| r.name == rsvp.name) {
            Some(existing) => *existing = rsvp,
            None => self.rsvp_list.push(rsvp),
        }
    }

    /// Number of RSVPs that confirmed attendance.
    pub fn attending_count(&self) -> usize {
        self.rsvp_list.iter().filter(|r| r.attending).count()
    }
}

/// A memorial record for one deceased individual.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Tribute {
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub story: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obituary_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candle_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funeral_details: Option<FuneralDetails>,
}

impl Tribute {
    /// Whether visitors may currently RSVP to this tribute's funeral.
    pub fn rsvp_enabled(&self) -> bool {
        self.funeral_details
            .as_ref()
            .is_some_and(|details| details.rsvp_enabled)
    }

    /// Whether `user_id` created this tribute.
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.created_by.as_deref() == Some(user_id)
    }
}

/// Request body for submitting an RSVP.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RsvpRequest {
    pub name: String,
    #[serde(default = "default_attending")]
    pub attending: bool,
}

fn default_attending() -> bool {
    true
}
