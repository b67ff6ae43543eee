//! Shallow record merge used by updates.

use serde_json::{Map, Value};

use crate::storage::Record;

/// Overlay the top-level fields of `patch` onto `existing`.
///
/// `id` is never taken from the patch, and a blank `createdBy` leaves the
/// stored owner in place.
pub fn shallow_merge<T: Record>(
    existing: &T,
    patch: Map<String, Value>,
) -> Result<T, serde_json::Error> {
    let mut merged = match serde_json::to_value(existing)? {
        Value::Object(fields) => fields,
        _ => Map::new(),
    };

    for (key, value) in patch {
        match key.as_str() {
            "id" => continue,
            "createdBy" if is_blank(&value) => continue,
            _ => {
                merged.insert(key, value);
            }
        }
    }

    serde_json::from_value(Value::Object(merged))
}

/// Serialize a record into its field map.
pub(crate) fn to_fields<T: Record>(record: &T) -> Result<Map<String, Value>, serde_json::Error> {
    match serde_json::to_value(record)? {
        Value::Object(fields) => Ok(fields),
        _ => Ok(Map::new()),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
