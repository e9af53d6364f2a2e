//! Error types for rakshak-sim
//!
//! Every failure answers `{"ok": false, "error": "..."}` so callers can
//! treat all record-store replies uniformly.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Conflict (409) - duplicate key or dangling worker reference
    #[error("{0}")]
    Conflict(String),

    /// rakshak-common error
    #[error(transparent)]
    Common(#[from] rakshak_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Common(rakshak_common::Error::InvalidInput(msg)) => {
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Common(rakshak_common::Error::NotFound(msg)) => (StatusCode::NOT_FOUND, msg),
            ApiError::Common(err) => {
                tracing::error!("Record store failure: {}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(json!({ "ok": false, "error": message }))).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
