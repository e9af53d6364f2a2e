//! Termination status (one per worker) and termination log endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use rakshak_common::models::{TerminationLog, TerminationStatus};
use serde_json::{json, Value};

use super::{ok, parse_body};
use crate::db::{self, InsertOutcome};
use crate::{ApiError, ApiResult, AppState};

fn unknown_worker(worker_id: &str) -> ApiError {
    ApiError::NotFound(format!("worker {} not found", worker_id))
}

/// POST /termination_status (insert or replace)
pub async fn upsert_status(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let status: TerminationStatus = parse_body(payload, &["worker_id"])?;

    match db::termination::upsert_status(&state.db, &status).await? {
        InsertOutcome::MissingWorker => Err(unknown_worker(&status.worker_id)),
        _ => Ok(ok()),
    }
}

/// DELETE /termination_status/:worker_id
pub async fn delete_status(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> ApiResult<Json<Value>> {
    if db::termination::remove_status(&state.db, &worker_id).await? {
        Ok(ok())
    } else {
        Err(ApiError::NotFound("termination_status not found".to_string()))
    }
}

/// POST /termination_logs
pub async fn create_log(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let log: TerminationLog = parse_body(payload, &["worker_id"])?;

    let log_id = db::termination::add_log(&state.db, &log)
        .await?
        .ok_or_else(|| unknown_worker(&log.worker_id))?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "log_id": log_id })),
    ))
}

/// DELETE /termination_logs/:log_id
pub async fn delete_log(
    State(state): State<AppState>,
    Path(log_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    if db::termination::remove_log(&state.db, log_id).await? {
        Ok(ok())
    } else {
        Err(ApiError::NotFound("log not found".to_string()))
    }
}

pub fn termination_routes() -> Router<AppState> {
    Router::new()
        .route("/termination_status", post(upsert_status))
        .route("/termination_status/:worker_id", delete(delete_status))
        .route("/termination_logs", post(create_log))
        .route("/termination_logs/:log_id", delete(delete_log))
}
