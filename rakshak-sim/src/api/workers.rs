//! Worker endpoints
//!
//! Creating a worker accepts arbitrary extra keys; they are validated and
//! kept as extension fields. `POST /workers/{id}/fields` edits those
//! extensions one key at a time.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use rakshak_common::models::{Worker, WorkerSummary};
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use super::{ok, parse_body};
use crate::db::{self, InsertOutcome};
use crate::{ApiError, ApiResult, AppState};

/// GET /workers
pub async fn list_workers(State(state): State<AppState>) -> ApiResult<Json<Vec<Worker>>> {
    Ok(Json(db::workers::list_workers(&state.db).await?))
}

/// GET /workers/:worker_id
pub async fn get_worker_summary(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> ApiResult<Json<WorkerSummary>> {
    db::snapshot::worker_summary(&state.db, &worker_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("worker not found".to_string()))
}

/// POST /workers
pub async fn create_worker(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(body) =
        payload.map_err(|e| ApiError::BadRequest(format!("JSON body required: {}", e)))?;
    let worker = Worker::from_payload(body).map_err(|e| ApiError::BadRequest(e.to_string()))?;

    match db::workers::add_worker(&state.db, &worker).await? {
        InsertOutcome::Inserted => {
            info!(worker_id = %worker.worker_id, "Worker created");
            Ok((StatusCode::CREATED, ok()))
        }
        InsertOutcome::Duplicate | InsertOutcome::MissingWorker => Err(ApiError::Conflict(
            "worker_id already exists".to_string(),
        )),
    }
}

/// DELETE /workers/:worker_id
///
/// Removes the worker and every dependent row.
pub async fn delete_worker(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> ApiResult<Json<Value>> {
    if db::workers::remove_worker(&state.db, &worker_id).await? {
        info!(worker_id = %worker_id, "Worker removed");
        Ok(ok())
    } else {
        Err(ApiError::NotFound("worker not found".to_string()))
    }
}

/// Extension field edit
#[derive(Debug, Deserialize)]
pub struct FieldEdit {
    pub op: String,
    pub field: String,
    #[serde(default)]
    pub value: Value,
}

/// POST /workers/:worker_id/fields
pub async fn modify_worker_fields(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let edit: FieldEdit = parse_body(payload, &["op", "field"])?;

    let found = match edit.op.as_str() {
        "add" => db::workers::set_extension(&state.db, &worker_id, &edit.field, edit.value).await?,
        "remove" => db::workers::remove_extension(&state.db, &worker_id, &edit.field).await?,
        other => return Err(ApiError::BadRequest(format!("unknown op: {}", other))),
    };

    if found {
        Ok(ok())
    } else {
        Err(ApiError::NotFound("worker not found".to_string()))
    }
}

/// Build worker routes
pub fn worker_routes() -> Router<AppState> {
    Router::new()
        .route("/workers", get(list_workers).post(create_worker))
        .route(
            "/workers/:worker_id",
            get(get_worker_summary).delete(delete_worker),
        )
        .route("/workers/:worker_id/fields", post(modify_worker_fields))
}
