//! Vendor listing API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::{object_body, ApiResult, DeleteResponse};
use crate::auth::ActingUser;
use crate::errors::AppError;
use crate::forms::{validate_listing, VendorListingDraft};
use crate::models::VendorListing;
use crate::AppState;

/// GET /api/vendor/listings - List all vendor listings.
pub async fn list_listings(State(state): State<AppState>) -> ApiResult<Vec<VendorListing>> {
    Ok(Json(state.vendors.get_all().await))
}

/// GET /api/vendor/listings/{id} - Get a single listing.
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<VendorListing> {
    state
        .vendors
        .get_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Vendor listing {} not found", id)))
}

/// POST /api/vendor/listings - Create a listing.
pub async fn create_listing(
    State(state): State<AppState>,
    user: ActingUser,
    Json(draft): Json<VendorListingDraft>,
) -> ApiResult<VendorListing> {
    Ok(Json(draft.submit_create(&state.vendors, user.id()).await?))
}

/// PUT /api/vendor/listings/{id} - Shallow-merge a partial listing.
pub async fn update_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<VendorListing> {
    let merged = state.vendors.merge_patch(&id, object_body(body)?).await?;
    validate_listing(&merged)?;

    Ok(Json(state.vendors.replace(merged).await?))
}

/// DELETE /api/vendor/listings/{id} - Delete a listing.
pub async fn delete_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    state.vendors.delete(&id).await;
    Ok(Json(DeleteResponse { success: true }))
}
