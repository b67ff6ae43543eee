//! Form state and validation for the create, edit and RSVP flows.
//!
//! Drafts hold transient editable copies of records. Validation runs here,
//! before anything reaches a repository; failures carry the message shown
//! next to the form.

mod tribute;
mod vendor;

pub use tribute::*;
pub use vendor::*;

use chrono::NaiveDate;

use crate::errors::AppError;

/// Parse an optional `YYYY-MM-DD` field; blank counts as absent.
fn parse_date(label: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| AppError::Validation(format!("{} must be a date (YYYY-MM-DD).", label))),
    }
}

fn require(value: &str, message: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(message.to_string()));
    }
    Ok(())
}
