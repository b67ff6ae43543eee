//! Tribute API endpoints.

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use super::{object_body, ApiResult, DeleteResponse};
use crate::auth::ActingUser;
use crate::errors::AppError;
use crate::forms::{validate_tribute, RsvpForm, TributeDraft};
use crate::models::{RsvpRequest, Tribute};
use crate::AppState;

/// GET /api/tributes - List all tributes.
pub async fn list_tributes(State(state): State<AppState>) -> ApiResult<Vec<Tribute>> {
    Ok(Json(state.tributes.get_all().await))
}

/// GET /api/tributes/{id} - Get a single tribute.
pub async fn get_tribute(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Tribute> {
    state
        .tributes
        .get_by_id(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Tribute {} not found", id)))
}

/// POST /api/tributes - Create a new tribute.
pub async fn create_tribute(
    State(state): State<AppState>,
    user: ActingUser,
    Json(body): Json<Value>,
) -> ApiResult<Tribute> {
    let draft = TributeDraft::from_payload(object_body(body)?)?;
    draft.validate()?;

    // A known acting user always owns what they create
    let mut record = draft.form().clone();
    if let Some(owner) = user.id() {
        record.created_by = Some(owner.to_string());
    }

    let tribute = state.tributes.create(record, user.id()).await;
    reindex(&state, &tribute).await;

    Ok(Json(tribute))
}

/// PUT /api/tributes/{id} - Shallow-merge a partial tribute.
pub async fn update_tribute(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<Value>,
) -> ApiResult<Tribute> {
    let merged = state.tributes.merge_patch(&id, object_body(body)?).await?;
    validate_tribute(&merged)?;

    let tribute = state.tributes.replace(merged).await?;
    reindex(&state, &tribute).await;

    Ok(Json(tribute))
}

/// DELETE /api/tributes/{id} - Delete a tribute.
pub async fn delete_tribute(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeleteResponse> {
    if state.tributes.delete(&id).await {
        if let Err(e) = state.search.remove_tribute(&id).await {
            tracing::warn!("Failed to remove tribute from index: {}", e);
        }
    }

    Ok(Json(DeleteResponse { success: true }))
}

/// POST /api/tributes/{id}/rsvp - Record an attendance response.
pub async fn submit_rsvp(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<RsvpRequest>,
) -> ApiResult<Tribute> {
    let form = RsvpForm::new(request.name, request.attending);
    Ok(Json(form.submit(&state.tributes, &id).await?))
}

/// GET /api/users/{user_id}/tributes - Tributes created by one user.
pub async fn list_user_tributes(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<Vec<Tribute>> {
    Ok(Json(state.tributes.list_by_owner(&user_id).await))
}

async fn reindex(state: &AppState, tribute: &Tribute) {
    if let Err(e) = state.search.index_tribute(tribute).await {
        tracing::warn!("Failed to index tribute {}: {}", tribute.id, e);
    }
}
