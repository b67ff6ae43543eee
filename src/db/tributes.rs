//! Tribute-specific repository operations.

use chrono::{SecondsFormat, Utc};

use super::TributeRepository;
use crate::models::Rsvp;
use crate::models::Tribute;

impl TributeRepository {
    /// Record `name`'s attendance on a tribute's funeral.
    ///
    /// A repeat submission under the exact same name replaces the earlier
    /// entry in place. Returns `None`, leaving storage untouched, when no
    /// tribute has `tribute_id`.
    pub async fn add_rsvp(&self, tribute_id: &str, name: &str, attending: bool) -> Option<Tribute> {
        let mut tributes = self.get_all().await;
        let Some(tribute) = tributes.iter_mut().find(|t| t.id == tribute_id) else {
            tracing::debug!("RSVP for unknown tribute {} ignored", tribute_id);
            return None;
        };

        tribute
            .funeral_details
            .get_or_insert_with(Default::default)
            .upsert_rsvp(Rsvp {
                name: name.to_string(),
                attending,
                timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            });
        let updated = tribute.clone();

        self.collection.save_all(&tributes).await;
        Some(updated)
    }
}
