//! rakshak-seek library - complaint decision service
//!
//! Labels a gig-worker complaint "Valid complaint" or "Invalid complaint"
//! using the worker's platform record, keyword heuristics and an optional
//! generative classifier.

use axum::Router;
use chrono::{DateTime, Utc};
use rakshak_common::llm::GenerativeClient;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod audit;
pub mod classifier;
pub mod config;
pub mod decision;
pub mod error;
pub mod heuristics;
pub mod record;
pub mod record_client;

pub use crate::config::SeekConfig;
pub use crate::error::{ApiError, ApiResult};

use crate::audit::AuditSink;
use crate::classifier::Classifier;
use crate::decision::DecisionFuser;
use crate::record_client::RecordClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub fuser: Arc<DecisionFuser>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(fuser: DecisionFuser) -> Self {
        Self {
            fuser: Arc::new(fuser),
            startup_time: Utc::now(),
        }
    }

    /// Wire the pipeline from resolved configuration
    pub fn from_config(config: &SeekConfig) -> anyhow::Result<Self> {
        let records = RecordClient::new(&config.platform)?;
        let classifier = Classifier::new(GenerativeClient::new(&config.llm)?);
        let audit = AuditSink::new(config.audit_dir.clone());
        Ok(Self::new(DecisionFuser::new(records, audit, classifier)))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::seek_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
