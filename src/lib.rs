//! Memorial Tribute Backend
//!
//! Tribute pages with funeral RSVPs and vendor listings, persisted as whole
//! collections in a single storage slot and served over a REST API.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod forms;
pub mod models;
pub mod search;
pub mod storage;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::{Config, StorageKind};
use db::{IdGenerator, Repository, TributeRepository, VendorRepository};
use search::SearchIndex;
use storage::{mock_tributes, Collection, StorageSlot, TRIBUTES_KEY, VENDOR_LISTINGS_KEY};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub tributes: Arc<TributeRepository>,
    pub vendors: Arc<VendorRepository>,
    pub search: Arc<SearchIndex>,
    pub config: Arc<Config>,
}

/// Wire repositories and the search index to the configured storage medium.
pub async fn build_state(config: Config) -> Result<AppState, Box<dyn std::error::Error>> {
    let (slot, search) = match config.storage {
        StorageKind::Memory => (StorageSlot::memory(), SearchIndex::in_memory()?),
        StorageKind::Sqlite => {
            tracing::info!("Database path: {:?}", config.db_path);
            tracing::info!("Index path: {:?}", config.index_path);
            let pool = db::init_database(&config.db_path).await?;
            (StorageSlot::sqlite(pool), SearchIndex::open(&config.index_path)?)
        }
    };

    let ids = Arc::new(IdGenerator::new(config.id_scheme));
    let seed = if config.seed {
        mock_tributes()
    } else {
        Vec::new()
    };

    let tributes = Repository::new(
        Collection::with_seed(slot.clone(), TRIBUTES_KEY, seed),
        ids.clone(),
    );
    let vendors = Repository::new(Collection::new(slot, VENDOR_LISTINGS_KEY), ids);

    let all = tributes.get_all().await;
    search.rebuild(&all).await?;

    Ok(AppState {
        tributes: Arc::new(tributes),
        vendors: Arc::new(vendors),
        search: Arc::new(search),
        config: Arc::new(config),
    })
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let psk = state.config.api_psk.clone();

    let api_routes = Router::new()
        // Tributes
        .route(
            "/tributes",
            get(api::list_tributes).post(api::create_tribute),
        )
        .route("/tributes/search", get(api::search_tributes))
        .route(
            "/tributes/{id}",
            get(api::get_tribute)
                .put(api::update_tribute)
                .delete(api::delete_tribute),
        )
        .route("/tributes/{id}/rsvp", post(api::submit_rsvp))
        .route("/users/{user_id}/tributes", get(api::list_user_tributes))
        // Vendor listings
        .route(
            "/vendor/listings",
            get(api::list_listings).post(api::create_listing),
        )
        .route(
            "/vendor/listings/{id}",
            get(api::get_listing)
                .put(api::update_listing)
                .delete(api::delete_listing),
        )
        .layer(middleware::from_fn(move |req, next| {
            auth::psk_auth_layer(psk.clone(), req, next)
        }));

    // Health check (no auth required)
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
