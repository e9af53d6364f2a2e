//! Service banner, health check and full database dump

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use rakshak_common::models::DatabaseSnapshot;
use serde::Serialize;
use serde_json::{json, Value};

use crate::{db, ApiResult, AppState};

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// Module name ("rakshak-sim")
    pub module: String,
    pub version: String,
    /// Seconds since service started
    pub uptime_seconds: u64,
}

/// GET /
pub async fn banner() -> Json<Value> {
    Json(json!({ "ok": true, "service": "rakshak-sim" }))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = Utc::now().signed_duration_since(state.startup_time);

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "rakshak-sim".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime.num_seconds().max(0) as u64,
    })
}

/// GET /db/print
pub async fn print_database(State(state): State<AppState>) -> ApiResult<Json<DatabaseSnapshot>> {
    Ok(Json(db::snapshot::dump(&state.db).await?))
}

/// Build banner, health and dump routes
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health_check))
        .route("/db/print", get(print_database))
}
