//! Chatbot endpoint

use axum::{extract::State, routing::post, Json, Router};

use crate::chat::{ChatReply, ChatRequest};
use crate::{ApiError, ApiResult, AppState};

/// POST /api/chatbot
pub async fn chatbot(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> ApiResult<Json<ChatReply>> {
    if request.message.trim().is_empty() {
        return Err(ApiError::BadRequest("Message is required".to_string()));
    }

    Ok(Json(state.chat.reply(&request).await))
}

/// Build chatbot routes
pub fn chatbot_routes() -> Router<AppState> {
    Router::new().route("/chatbot", post(chatbot))
}
