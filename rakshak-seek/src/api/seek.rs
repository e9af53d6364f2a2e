//! POST /seek

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use crate::decision::{SeekRequest, SeekResponse};
use crate::{ApiError, ApiResult, AppState};

/// POST /seek
///
/// Decide one complaint and return the label with the relevant record
/// fields.
pub async fn seek(
    State(state): State<AppState>,
    payload: Result<Json<SeekRequest>, JsonRejection>,
) -> ApiResult<Json<SeekResponse>> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(Json(state.fuser.decide(&request).await?))
}

pub fn seek_routes() -> Router<AppState> {
    Router::new().route("/seek", post(seek))
}
