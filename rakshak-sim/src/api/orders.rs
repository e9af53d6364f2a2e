//! Order endpoints

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use rakshak_common::models::Order;
use serde_json::Value;

use super::{ok, parse_body};
use crate::db::{self, InsertOutcome};
use crate::{ApiError, ApiResult, AppState};

/// POST /orders
pub async fn create_order(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let order: Order = parse_body(payload, &["order_id", "worker_id"])?;

    match db::orders::add_order(&state.db, &order).await? {
        InsertOutcome::Inserted => Ok((StatusCode::CREATED, ok())),
        InsertOutcome::Duplicate => Err(ApiError::Conflict("order_id already exists".to_string())),
        InsertOutcome::MissingWorker => Err(ApiError::Conflict(format!(
            "worker {} does not exist",
            order.worker_id
        ))),
    }
}

/// DELETE /orders/:order_id
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> ApiResult<Json<Value>> {
    if db::orders::remove_order(&state.db, &order_id).await? {
        Ok(ok())
    } else {
        Err(ApiError::NotFound("order not found".to_string()))
    }
}

pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", post(create_order))
        .route("/orders/:order_id", delete(delete_order))
}
