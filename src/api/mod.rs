//! REST API module.
//!
//! Handlers reply with bare JSON records on success and an
//! [`crate::errors::ErrorResponse`] body on failure.

mod search;
mod tributes;
mod vendors;

pub use search::*;
pub use tributes::*;
pub use vendors::*;

use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Response type for API handlers.
pub type ApiResult<T> = Result<Json<T>, AppError>;

/// Body of a successful delete.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Require a JSON object body.
fn object_body(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(fields) => Ok(fields),
        _ => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}
