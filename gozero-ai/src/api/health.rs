//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service status ("ok")
    pub status: String,
    /// Module name ("gozero-ai")
    pub module: String,
    /// Crate version from Cargo.toml
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    /// "live" when an inference credential is configured, else "sample-catalog"
    pub inference_mode: String,
    pub catalog_version: u32,
    pub catalog_entries: usize,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);
    let uptime_seconds = uptime.num_seconds().max(0) as u64;

    let inference_mode = if state.resolver.is_live() {
        "live"
    } else {
        "sample-catalog"
    };
    let catalog = state.resolver.sampler().catalog();

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "gozero-ai".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds,
        inference_mode: inference_mode.to_string(),
        catalog_version: catalog.version(),
        catalog_entries: catalog.len(),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
