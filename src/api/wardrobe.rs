//! Wardrobe API endpoints
//!
//! Every mutation delegates to the persistence layer and returns the full
//! updated list, which the UI swaps in wholesale.

use crate::error::{ApiError, ApiResult};
use crate::imaging::{self, MAX_IMAGE_WIDTH};
use crate::types::ClothingItem;
use crate::{db, AppState};
use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

/// Request payload for adding a wardrobe item.
///
/// The id is server-assigned; insulation is stored as given (no range
/// clamping).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub image_data: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub insulation: i64,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// GET /api/wardrobe
pub async fn list_wardrobe(State(state): State<AppState>) -> ApiResult<Json<Vec<ClothingItem>>> {
    let items = db::wardrobe::load(&state.db).await?;
    Ok(Json(items))
}

/// POST /api/wardrobe
///
/// Adds an item, downsampling its photo to the storage width bound first.
/// Returns the full updated list.
pub async fn add_wardrobe_item(
    State(state): State<AppState>,
    Json(payload): Json<AddItemRequest>,
) -> ApiResult<Json<Vec<ClothingItem>>> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::BadRequest("Item name cannot be empty".to_string()));
    }

    let item = ClothingItem {
        id: Uuid::new_v4().to_string(),
        image_data: imaging::resize_data_uri(&payload.image_data, MAX_IMAGE_WIDTH),
        name: payload.name,
        kind: payload.kind,
        insulation: payload.insulation,
        tags: payload.tags,
    };

    info!(id = %item.id, name = %item.name, "Adding wardrobe item");
    let items = db::wardrobe::add(&state.db, item).await?;
    Ok(Json(items))
}

/// DELETE /api/wardrobe/:id
///
/// Removes an item and returns the full updated list. 404 when the id is
/// unknown.
pub async fn delete_wardrobe_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<ClothingItem>>> {
    let items = db::wardrobe::load(&state.db).await?;
    if !items.iter().any(|item| item.id == id) {
        return Err(ApiError::NotFound(format!("No wardrobe item with id {}", id)));
    }

    info!(id = %id, "Deleting wardrobe item");
    let items = db::wardrobe::remove(&state.db, &id).await?;
    Ok(Json(items))
}
