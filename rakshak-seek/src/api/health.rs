//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::AppState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Module name ("rakshak-seek")
    pub module: String,
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
    pub external_platform_base_url: String,
    /// Whether a classifier API key is set
    pub classifier_configured: bool,
    pub audit_dir: String,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "rakshak-seek".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
        external_platform_base_url: state.fuser.records().base_url().to_string(),
        classifier_configured: state.fuser.classifier().is_configured(),
        audit_dir: state.fuser.audit().dir().display().to_string(),
    })
}

/// `/__health` is kept for older dashboards
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_check))
        .route("/__health", get(health_check))
}
