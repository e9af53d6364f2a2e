//! rakshak-doc library - worker statement service
//!
//! Turns a worker's own account of an issue plus their evidence text into
//! a one-page legal summary PDF drafted by the generative model.

use axum::Router;
use chrono::{DateTime, Utc};
use rakshak_common::llm::GenerativeClient;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pdf;
pub mod prompt;

pub use crate::error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<GenerativeClient>,
    /// Per-call model timeout
    pub timeout: Duration,
    /// Service startup timestamp
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(client: GenerativeClient, timeout: Duration) -> Self {
        Self {
            client: Arc::new(client),
            timeout,
            startup_time: Utc::now(),
        }
    }

    /// `models/<name>` from the client endpoint, or the endpoint itself
    pub fn model_name(&self) -> String {
        model_name_from_endpoint(self.client.endpoint())
    }
}

/// `.../models/gemini-2.5-flash:generateContent` -> `models/gemini-2.5-flash`
pub fn model_name_from_endpoint(endpoint: &str) -> String {
    endpoint
        .rfind("/models/")
        .map(|start| &endpoint[start + 1..])
        .map(|tail| tail.split(':').next().unwrap_or(tail))
        .unwrap_or(endpoint)
        .to_string()
}

/// Build application router
///
/// CORS is permissive: the statement form is served from another origin.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::generate_routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_name_from_endpoint() {
        assert_eq!(
            model_name_from_endpoint(
                "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
            ),
            "models/gemini-2.5-flash"
        );
        assert_eq!(
            model_name_from_endpoint("http://127.0.0.1:9000/generate"),
            "http://127.0.0.1:9000/generate"
        );
    }
}
