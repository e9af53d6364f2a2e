//! HTTP API handlers for rakshak-sim

pub mod health;
pub mod orders;
pub mod reviews;
pub mod termination;
pub mod workers;

pub use health::health_routes;
pub use orders::order_routes;
pub use reviews::review_routes;
pub use termination::termination_routes;
pub use workers::worker_routes;

use crate::{ApiError, ApiResult};
use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

/// Decode a JSON request body into a record type.
///
/// Missing body or missing/null `required` keys are reported by name
/// before serde sees the payload, so clients get a readable 400.
pub(crate) fn parse_body<T: DeserializeOwned>(
    payload: Result<Json<Value>, JsonRejection>,
    required: &[&str],
) -> ApiResult<T> {
    let Json(value) =
        payload.map_err(|e| ApiError::BadRequest(format!("JSON body required: {}", e)))?;

    let object = value
        .as_object()
        .ok_or_else(|| ApiError::BadRequest("JSON object required".to_string()))?;

    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|k| object.get(*k).map_or(true, Value::is_null))
        .collect();
    if !missing.is_empty() {
        return Err(ApiError::BadRequest(format!("{} required", missing.join(" and "))));
    }

    serde_json::from_value(value).map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// `{"ok": true}`
pub(crate) fn ok() -> Json<Value> {
    Json(json!({ "ok": true }))
}
