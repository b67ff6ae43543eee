//! Generic whole-collection repository.
//!
//! Every operation loads the full collection, mutates it in memory and, for
//! writes, saves the full collection back. No locking is performed: two
//! overlapping writes race and the last save wins.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use super::merge::{shallow_merge, to_fields};
use super::IdGenerator;
use crate::errors::AppError;
use crate::storage::{Collection, Record};

/// CRUD operations over one persisted collection.
pub struct Repository<T> {
    pub(super) collection: Collection<T>,
    pub(super) ids: Arc<IdGenerator>,
}

impl<T: Record> Repository<T> {
    pub fn new(collection: Collection<T>, ids: Arc<IdGenerator>) -> Self {
        Self { collection, ids }
    }

    /// All stored records in insertion order.
    pub async fn get_all(&self) -> Vec<T> {
        self.collection.load_all().await
    }

    /// The record with `id`, if present.
    pub async fn get_by_id(&self, id: &str) -> Option<T> {
        self.get_all().await.into_iter().find(|r| r.id() == id)
    }

    /// Records created by `user_id`.
    pub async fn list_by_owner(&self, user_id: &str) -> Vec<T> {
        self.get_all()
            .await
            .into_iter()
            .filter(|r| r.owner() == Some(user_id))
            .collect()
    }

    /// Update-merge a record with an existing id, or append a new one.
    ///
    /// Fields absent from `record` keep their stored values, so an update
    /// that omits the owner never clears it. A `None` field counts as absent;
    /// use [`Self::replace`] to store an already merged record.
    pub async fn save(&self, record: T) -> Result<T, AppError> {
        if record.id().trim().is_empty() {
            return Err(AppError::Validation(format!(
                "{} id is required",
                T::ENTITY
            )));
        }

        let mut records = self.get_all().await;
        let now = Utc::now().to_rfc3339();

        let stored = match records.iter().position(|r| r.id() == record.id()) {
            Some(index) => {
                let mut merged = shallow_merge(&records[index], to_fields(&record)?)?;
                merged.touch(&now);
                records[index] = merged.clone();
                merged
            }
            None => {
                let mut record = record;
                record.touch(&now);
                records.push(record.clone());
                record
            }
        };

        self.collection.save_all(&records).await;
        Ok(stored)
    }

    /// Overwrite the stored record sharing `record`'s id with `record` as a
    /// whole, so fields cleared by an earlier [`Self::merge_patch`] stay
    /// cleared. The stored owner is kept when `record` carries none.
    pub async fn replace(&self, mut record: T) -> Result<T, AppError> {
        let mut records = self.get_all().await;
        let index = records
            .iter()
            .position(|r| r.id() == record.id())
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::ENTITY, record.id())))?;

        let has_owner = record.owner().is_some_and(|o| !o.trim().is_empty());
        if let (false, Some(owner)) = (has_owner, records[index].owner().map(str::to_string)) {
            record.set_owner(owner);
        }
        record.touch(&Utc::now().to_rfc3339());

        records[index] = record.clone();
        self.collection.save_all(&records).await;
        Ok(record)
    }

    /// Append `record` under a freshly minted id.
    ///
    /// The owner falls back to `acting_user` when the record carries none.
    pub async fn create(&self, mut record: T, acting_user: Option<&str>) -> T {
        let mut records = self.get_all().await;

        let id = loop {
            let candidate = self.ids.next_id();
            if !records.iter().any(|r| r.id() == candidate) {
                break candidate;
            }
        };
        let now = Utc::now().to_rfc3339();

        record.set_id(id);
        record.set_created_at(now.clone());
        record.touch(&now);
        let has_owner = record.owner().is_some_and(|o| !o.trim().is_empty());
        if let (false, Some(user)) = (has_owner, acting_user) {
            record.set_owner(user.to_string());
        }

        records.push(record.clone());
        self.collection.save_all(&records).await;

        tracing::info!("Created {} {}", T::ENTITY, record.id());
        record
    }

    /// The stored record with `patch` shallow-merged over it, not yet saved.
    pub async fn merge_patch(&self, id: &str, patch: Map<String, Value>) -> Result<T, AppError> {
        let existing = self
            .get_by_id(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("{} {} not found", T::ENTITY, id)))?;

        Ok(shallow_merge(&existing, patch)?)
    }

    /// Remove the record with `id`. Returns whether anything was removed.
    pub async fn delete(&self, id: &str) -> bool {
        let mut records = self.get_all().await;
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            return false;
        }

        self.collection.save_all(&records).await;
        tracing::info!("Deleted {} {}", T::ENTITY, id);
        true
    }
}
