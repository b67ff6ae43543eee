//! Storage media that hold serialized collections under string keys.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tokio::sync::RwLock;

use super::StorageError;

/// The medium behind a [`super::Collection`].
#[derive(Clone)]
pub enum StorageSlot {
    /// Process memory; reset on restart.
    Memory(MemorySlot),
    /// A row per key in the SQLite `storage_slots` table.
    Sqlite(SqliteSlot),
    /// No medium attached: reads report unavailable, writes are dropped.
    Detached,
}

impl StorageSlot {
    pub fn memory() -> Self {
        StorageSlot::Memory(MemorySlot::default())
    }

    pub fn sqlite(pool: SqlitePool) -> Self {
        StorageSlot::Sqlite(SqliteSlot::new(pool))
    }

    /// Raw stored value for `key`, if any.
    pub async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self {
            StorageSlot::Memory(slot) => Ok(slot.read(key).await),
            StorageSlot::Sqlite(slot) => slot.read(key).await,
            StorageSlot::Detached => Err(StorageError::Unavailable),
        }
    }

    /// Replace the stored value for `key`.
    pub async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        match self {
            StorageSlot::Memory(slot) => {
                slot.write(key, value).await;
                Ok(())
            }
            StorageSlot::Sqlite(slot) => slot.write(key, value).await,
            StorageSlot::Detached => Err(StorageError::Unavailable),
        }
    }
}

/// In-process key/value slots.
#[derive(Clone, Default)]
pub struct MemorySlot {
    values: Arc<RwLock<HashMap<String, String>>>,
}

impl MemorySlot {
    async fn read(&self, key: &str) -> Option<String> {
        self.values.read().await.get(key).cloned()
    }

    async fn write(&self, key: &str, value: &str) {
        self.values
            .write()
            .await
            .insert(key.to_string(), value.to_string());
    }
}

/// Key/value slots stored in SQLite.
#[derive(Clone)]
pub struct SqliteSlot {
    pool: SqlitePool,
}

impl SqliteSlot {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let row = sqlx::query("SELECT value FROM storage_slots WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|r| r.get("value")))
    }

    async fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let now = Utc::now().to_rfc3339();

        // Single-statement upsert so readers never see a partial collection
        sqlx::query(
            "INSERT INTO storage_slots (key, value, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
