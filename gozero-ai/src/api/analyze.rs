//! Image analysis endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::Deserialize;
use tracing::Instrument;
use uuid::Uuid;

use crate::recognition::{RecognitionResult, ResolutionSource};
use crate::{ApiError, ApiResult, AppState};

/// POST /api/analyze-image request body
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeImageRequest {
    pub image_base64: Option<String>,
}

/// POST /api/analyze-image
///
/// Returns a canonical result for any non-empty payload; only a missing
/// `imageBase64` is rejected.
pub async fn analyze_image(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeImageRequest>,
) -> ApiResult<Json<RecognitionResult>> {
    let image = request
        .image_base64
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Image data is required".to_string()))?;

    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("analyze_image", %request_id, payload_len = image.len());

    let resolution = state.resolver.resolve_detailed(&image).instrument(span).await;

    match resolution.source {
        ResolutionSource::Live => {
            tracing::info!(%request_id, item = %resolution.result.item_name, "Analysis served from live model")
        }
        ResolutionSource::Sampled(reason) => {
            tracing::info!(%request_id, %reason, item = %resolution.result.item_name, "Analysis served from sample catalog")
        }
    }

    Ok(Json(resolution.result))
}

/// Build image analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/analyze-image", post(analyze_image))
}
