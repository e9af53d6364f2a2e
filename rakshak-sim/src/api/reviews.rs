//! Review count endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{delete, post},
    Json, Router,
};
use rakshak_common::models::ReviewCounts;
use serde_json::Value;

use super::{ok, parse_body};
use crate::db::{self, InsertOutcome};
use crate::{ApiError, ApiResult, AppState};

/// POST /review_counts (insert or replace)
pub async fn upsert_counts(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let counts: ReviewCounts = parse_body(payload, &["worker_id"])?;

    match db::reviews::upsert_counts(&state.db, &counts).await? {
        InsertOutcome::MissingWorker => Err(ApiError::NotFound(format!(
            "worker {} not found",
            counts.worker_id
        ))),
        _ => Ok(ok()),
    }
}

/// DELETE /review_counts/:worker_id
pub async fn delete_counts(
    State(state): State<AppState>,
    Path(worker_id): Path<String>,
) -> ApiResult<Json<Value>> {
    if db::reviews::remove_counts(&state.db, &worker_id).await? {
        Ok(ok())
    } else {
        Err(ApiError::NotFound("review_counts not found".to_string()))
    }
}

pub fn review_routes() -> Router<AppState> {
    Router::new()
        .route("/review_counts", post(upsert_counts))
        .route("/review_counts/:worker_id", delete(delete_counts))
}
