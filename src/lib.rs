//! sweather - AI wardrobe assistant
//!
//! Self-hosted web service: photograph clothing items, let a hosted
//! vision-language model classify them, and combine a live weather lookup
//! with the stored wardrobe into an outfit recommendation. The wardrobe
//! persists as a single JSON array in a key-value SQLite table; the two-view
//! browser UI is embedded in the binary.

use axum::routing::{delete, get, post};
use axum::Router;
use sqlx::SqlitePool;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod gateway;
pub mod imaging;
pub mod types;

pub use error::{ApiError, ApiResult, Error, Result};
use gateway::OutfitAdvisor;

/// Application state shared across HTTP handlers.
///
/// Wardrobe mutations go through `db::wardrobe`; the recommendation busy
/// flag enforces the single-in-flight rule for the two-call AI pipeline.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// AI gateway (Gemini in production, a stub in tests)
    pub advisor: Arc<dyn OutfitAdvisor>,
    /// True while a recommendation request is in flight
    pub recommend_busy: Arc<AtomicBool>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, advisor: Arc<dyn OutfitAdvisor>) -> Self {
        Self {
            db,
            advisor,
            recommend_busy: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes())
        .route(
            "/api/wardrobe",
            get(api::list_wardrobe).post(api::add_wardrobe_item),
        )
        .route("/api/wardrobe/:id", delete(api::delete_wardrobe_item))
        .route("/api/analyze", post(api::analyze_image))
        .route("/api/recommend", post(api::recommend_outfit))
        .with_state(state)
}
