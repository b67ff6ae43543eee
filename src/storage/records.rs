//! Record identity hooks and the legacy-shape upgrade applied on read.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::models::{Tribute, VendorListing};

/// A record that lives in a [`super::Collection`].
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Human-readable entity name used in error messages.
    const ENTITY: &'static str;

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn owner(&self) -> Option<&str>;
    fn set_owner(&mut self, owner: String);
    fn set_created_at(&mut self, at: String);

    /// Called on every save with the current instant.
    fn touch(&mut self, _at: &str) {}

    /// Rewrite a stored legacy shape into the current one before decoding.
    fn upgrade(_value: &mut Value) {}
}

impl Record for Tribute {
    const ENTITY: &'static str = "Tribute";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn owner(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    fn set_owner(&mut self, owner: String) {
        self.created_by = Some(owner);
    }

    fn set_created_at(&mut self, at: String) {
        self.created_at = Some(at);
    }

    fn upgrade(value: &mut Value) {
        if let Value::Object(record) = value {
            upgrade_photo(record);
            upgrade_funeral_fields(record);
        }
    }
}

impl Record for VendorListing {
    const ENTITY: &'static str = "Vendor listing";

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn owner(&self) -> Option<&str> {
        self.created_by.as_deref()
    }

    fn set_owner(&mut self, owner: String) {
        self.created_by = Some(owner);
    }

    fn set_created_at(&mut self, at: String) {
        self.created_at = Some(at);
    }

    fn touch(&mut self, at: &str) {
        self.updated_at = Some(at.to_string());
    }
}

/// Top-level funeral fields written by older forms, and their nested homes.
const LEGACY_FUNERAL_FIELDS: [(&str, &str); 3] = [
    ("funeralDate", "dateTime"),
    ("funeralLocation", "location"),
    ("funeralRsvpLink", "rsvpLink"),
];

/// Fold `photoBase64` into `photoUrl` as a data URL.
fn upgrade_photo(record: &mut Map<String, Value>) {
    let Some(legacy) = record.remove("photoBase64") else {
        return;
    };
    if non_empty_str(record.get("photoUrl")).is_some() {
        return;
    }
    if let Some(encoded) = non_empty_str(Some(&legacy)) {
        let url = if encoded.starts_with("data:") {
            encoded.to_string()
        } else {
            format!("data:{};base64,{}", sniff_media_type(encoded), encoded)
        };
        record.insert("photoUrl".to_string(), Value::String(url));
    }
}

/// Move legacy top-level funeral fields into `funeralDetails`.
fn upgrade_funeral_fields(record: &mut Map<String, Value>) {
    for (legacy_key, nested_key) in LEGACY_FUNERAL_FIELDS {
        let Some(legacy) = record.remove(legacy_key) else {
            continue;
        };
        let Some(text) = non_empty_str(Some(&legacy)).map(str::to_string) else {
            continue;
        };

        let details = record
            .entry("funeralDetails")
            .or_insert_with(|| Value::Object(Map::new()));
        if details.is_null() {
            *details = Value::Object(Map::new());
        }
        if let Value::Object(details) = details {
            if non_empty_str(details.get(nested_key)).is_none() {
                details.insert(nested_key.to_string(), Value::String(text));
            }
        }
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
}

/// Guess an image media type from the leading bytes of a base64 payload.
fn sniff_media_type(encoded: &str) -> &'static str {
    const SIGNATURES: [(&str, &str); 4] = [
        ("/9j/", "image/jpeg"),
        ("iVBORw0KGgo", "image/png"),
        ("R0lGOD", "image/gif"),
        ("UklGR", "image/webp"),
    ];

    SIGNATURES
        .iter()
        .find(|(prefix, _)| encoded.starts_with(*prefix))
        .map(|(_, media_type)| *media_type)
        .unwrap_or("application/octet-stream")
}
