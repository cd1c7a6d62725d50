//! Outfit recommendation endpoint
//!
//! Only one recommendation request is in flight at a time: a second submit
//! while one is pending gets 409 Conflict. The UI additionally tags each
//! request with a sequence number so a stale completion cannot overwrite
//! newer view state.

use crate::error::{ApiError, ApiResult};
use crate::types::{resolve_outfit, ClothingItem, Recommendation};
use crate::{db, AppState};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

/// Request payload: the location to fetch weather for
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub location: String,
}

/// Response: the recommendation plus the hydrated outfit.
///
/// Selected ids with no matching wardrobe item are silently omitted from
/// `outfit`.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub recommendation: Recommendation,
    pub outfit: Vec<ClothingItem>,
}

/// Clears the busy flag when the request completes, including on error paths
struct BusyGuard(Arc<AtomicBool>);

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

/// POST /api/recommend
pub async fn recommend_outfit(
    State(state): State<AppState>,
    Json(payload): Json<RecommendRequest>,
) -> ApiResult<Json<RecommendResponse>> {
    let location = payload.location.trim().to_string();
    if location.is_empty() {
        return Err(ApiError::BadRequest("Location cannot be empty".to_string()));
    }

    if state
        .recommend_busy
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_err()
    {
        return Err(ApiError::Conflict(
            "A recommendation request is already in progress".to_string(),
        ));
    }
    let _busy = BusyGuard(state.recommend_busy.clone());

    let wardrobe = db::wardrobe::load(&state.db).await?;
    let recommendation = state.advisor.recommend(&location, &wardrobe).await?;
    let outfit = resolve_outfit(&wardrobe, &recommendation.selected_item_ids);

    info!(
        location = %location,
        sweater_weather = recommendation.weather.is_sweater_weather,
        selected = recommendation.selected_item_ids.len(),
        resolved = outfit.len(),
        "Recommendation ready"
    );

    Ok(Json(RecommendResponse {
        recommendation,
        outfit,
    }))
}
