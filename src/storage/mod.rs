//! Persistence adapter.
//!
//! A [`Collection`] reads and writes one whole record collection as a JSON
//! array stored under a single slot key. Reads never fail outward: a missing
//! or corrupted slot degrades to the seed collection.

mod records;
mod seed;
mod slot;

pub use records::Record;
pub use seed::mock_tributes;
pub use slot::{MemorySlot, SqliteSlot, StorageSlot};

use serde_json::Value;

/// Slot key holding the tribute collection.
pub const TRIBUTES_KEY: &str = "tributes";
/// Slot key holding the vendor listing collection.
pub const VENDOR_LISTINGS_KEY: &str = "vendorListings";

/// Why a collection could not be read or written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Nothing has been stored under the slot key yet.
    Empty,
    /// Stored content is not a JSON sequence of records.
    Corrupted(String),
    /// No storage medium is attached.
    Unavailable,
    /// The storage medium failed to read or write.
    Backend(String),
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Empty => write!(f, "storage slot is empty"),
            StorageError::Corrupted(reason) => write!(f, "stored collection is corrupted: {}", reason),
            StorageError::Unavailable => write!(f, "no storage medium available"),
            StorageError::Backend(reason) => write!(f, "storage backend error: {}", reason),
        }
    }
}

impl std::error::Error for StorageError {}

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        StorageError::Backend(err.to_string())
    }
}

/// A record collection persisted as a unit under one slot key.
#[derive(Clone)]
pub struct Collection<T> {
    slot: StorageSlot,
    key: &'static str,
    seed: Vec<T>,
}

impl<T: Record> Collection<T> {
    /// Collection whose fallback is empty.
    pub fn new(slot: StorageSlot, key: &'static str) -> Self {
        Self::with_seed(slot, key, Vec::new())
    }

    /// Collection that falls back to `seed` when the slot is empty or unreadable.
    pub fn with_seed(slot: StorageSlot, key: &'static str, seed: Vec<T>) -> Self {
        Self { slot, key, seed }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read the stored collection, distinguishing every failure mode.
    pub async fn try_load_all(&self) -> Result<Vec<T>, StorageError> {
        let raw = self.slot.read(self.key).await?.ok_or(StorageError::Empty)?;
        decode_collection(self.key, &raw)
    }

    /// Read the stored collection, degrading to the seed on any failure.
    ///
    /// A detached slot yields an empty collection rather than the seed.
    pub async fn load_all(&self) -> Vec<T> {
        match self.try_load_all().await {
            Ok(records) => records,
            Err(StorageError::Unavailable) => Vec::new(),
            Err(StorageError::Empty) => self.seed.clone(),
            Err(e @ StorageError::Corrupted(_)) => {
                tracing::warn!("Slot {:?}: {}; using seed collection", self.key, e);
                self.seed.clone()
            }
            Err(e) => {
                tracing::error!("Slot {:?}: {}; using seed collection", self.key, e);
                self.seed.clone()
            }
        }
    }

    /// Overwrite the slot with `records` in a single write.
    pub async fn try_save_all(&self, records: &[T]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(records)
            .map_err(|e| StorageError::Backend(format!("serialization failed: {}", e)))?;
        self.slot.write(self.key, &raw).await
    }

    /// Best-effort overwrite; failures are logged, never raised.
    pub async fn save_all(&self, records: &[T]) {
        match self.try_save_all(records).await {
            Ok(()) => tracing::debug!("Slot {:?}: saved {} records", self.key, records.len()),
            Err(StorageError::Unavailable) => {
                tracing::debug!("Slot {:?}: no storage medium, save skipped", self.key)
            }
            Err(e) => tracing::error!("Slot {:?}: failed to save collection: {}", self.key, e),
        }
    }
}

/// Parse a stored JSON array, upgrading legacy record shapes first.
///
/// Elements that still fail to decode are skipped, so one malformed record
/// never hides the rest of the collection.
fn decode_collection<T: Record>(key: &str, raw: &str) -> Result<Vec<T>, StorageError> {
    let value: Value =
        serde_json::from_str(raw).map_err(|e| StorageError::Corrupted(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(StorageError::Corrupted(
            "stored value is not a sequence".to_string(),
        ));
    };

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(position, mut item)| {
            T::upgrade(&mut item);
            match serde_json::from_value(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    tracing::warn!(
                        "Slot {:?}: skipping undecodable {} at position {}: {}",
                        key,
                        T::ENTITY,
                        position,
                        e
                    );
                    None
                }
            }
        })
        .collect();

    Ok(records)
}
