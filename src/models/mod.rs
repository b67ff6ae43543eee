//! Data models for the tribute application.
//!
//! Field names serialize in camelCase so stored collections and API payloads
//! share one JSON shape.

mod tribute;
mod vendor;

pub use tribute::*;
pub use vendor::*;

use serde::{Deserialize, Deserializer};

/// Deserialize an explicit `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
