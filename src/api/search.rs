//! Search API endpoints.

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::ApiResult;
use crate::models::Tribute;
use crate::AppState;

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    /// Search query string.
    pub q: String,
    /// Maximum number of results (default: 20).
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Offset for pagination (default: 0).
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    20
}

/// Search result with tributes and metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub results: Vec<SearchResultItem>,
    /// Matches across all pages.
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

/// Single search result item.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResultItem {
    pub tribute: Tribute,
    pub score: f32,
}

/// Maximum number of search results allowed.
const MAX_SEARCH_LIMIT: usize = 100;

/// GET /api/tributes/search - Search for tributes.
pub async fn search_tributes(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> ApiResult<SearchResponse> {
    let limit = params.limit.min(MAX_SEARCH_LIMIT);
    let page = state.search.search(&params.q, limit, params.offset)?;

    // Hits whose tribute is gone from the collection are dropped
    let tributes = state.tributes.get_all().await;
    let results: Vec<SearchResultItem> = page
        .hits
        .into_iter()
        .filter_map(|hit| {
            let tribute = tributes.iter().find(|t| t.id == hit.tribute_id)?.clone();
            Some(SearchResultItem {
                tribute,
                score: hit.score,
            })
        })
        .collect();

    Ok(Json(SearchResponse {
        results,
        total: page.total,
        limit,
        offset: params.offset,
    }))
}
