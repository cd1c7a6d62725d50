//! Image classification endpoint

use crate::error::{ApiError, ApiResult};
use crate::types::AnalysisResult;
use crate::AppState;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use tracing::info;

/// Request payload: a clothing photo as a base64 data URI
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub image_data: String,
}

/// POST /api/analyze
///
/// Classifies a clothing photo into structured attributes via the AI
/// gateway. Gateway failures surface as a generic error the UI alerts on.
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(payload): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalysisResult>> {
    if payload.image_data.trim().is_empty() {
        return Err(ApiError::BadRequest("Image data cannot be empty".to_string()));
    }

    let result = state.advisor.classify_image(&payload.image_data).await?;
    info!(name = %result.name, insulation = result.insulation, "Image classified");
    Ok(Json(result))
}
