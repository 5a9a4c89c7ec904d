//! gozero-ai library interface
//!
//! Exposes the recognition core, chatbot, and router for the binary and for
//! integration testing.

pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod recognition;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::chat::ChatResponder;
use crate::config::VisionConfig;
use crate::recognition::{InferenceError, ResultResolver, SampleCatalog};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Recognition entry point (read-only after startup)
    pub resolver: Arc<ResultResolver>,
    /// Chatbot responder
    pub chat: Arc<ChatResponder>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(resolver: ResultResolver, chat: ChatResponder) -> Self {
        Self {
            resolver: Arc::new(resolver),
            chat: Arc::new(chat),
            startup_time: Utc::now(),
        }
    }

    /// Wire resolver and chatbot from resolved configuration
    pub fn from_config(
        config: &VisionConfig,
        catalog: Arc<SampleCatalog>,
    ) -> Result<Self, InferenceError> {
        let resolver = ResultResolver::from_config(config, catalog)?;
        let chat = ChatResponder::from_config(config)?;
        Ok(Self::new(resolver, chat))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(api::analyze_routes())
        .merge(api::chatbot_routes());

    Router::new()
        .nest("/api", api)
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
