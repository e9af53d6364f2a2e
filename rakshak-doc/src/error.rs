//! Error types for rakshak-doc

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rakshak_common::llm::LlmError;
use serde_json::json;
use thiserror::Error;

use crate::pdf::PdfError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Model call failed or returned no text (502)
    #[error("Model error: {0}")]
    Model(#[from] LlmError),

    /// PDF rendering failed (500)
    #[error(transparent)]
    Pdf(#[from] PdfError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::Model(ref err) => {
                tracing::warn!("Statement generation failed: {}", err);
                (StatusCode::BAD_GATEWAY, "MODEL_ERROR", err.to_string())
            }
            ApiError::Pdf(ref err) => {
                tracing::error!("{}", err);
                (StatusCode::INTERNAL_SERVER_ERROR, "PDF_ERROR", err.to_string())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
