//! HTTP client for the external platform record store
//!
//! One GET per complaint, no retries. Anything other than a 2xx JSON
//! object is a fetch failure.

use rakshak_common::config::PlatformConfig;
use reqwest::Url;
use serde_json::{Map, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

const USER_AGENT: &str = concat!("rakshak-seek/", env!("CARGO_PKG_VERSION"));

/// Record store fetch errors
#[derive(Debug, Error)]
pub enum RecordFetchError {
    #[error("Invalid platform base URL {0}")]
    InvalidBaseUrl(String),

    #[error("Failed to fetch from external ({url}): {message}")]
    Network { url: String, message: String },

    #[error("Failed to fetch from external ({url}): HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Malformed record from external ({url}): {message}")]
    Malformed { url: String, message: String },
}

/// Record store client
#[derive(Debug, Clone)]
pub struct RecordClient {
    http_client: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl RecordClient {
    pub fn new(config: &PlatformConfig) -> Result<Self, RecordFetchError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| RecordFetchError::InvalidBaseUrl(format!("{}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(RecordFetchError::InvalidBaseUrl(config.base_url.clone()));
        }

        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| RecordFetchError::Network {
                url: config.base_url.clone(),
                message: e.to_string(),
            })?;

        Ok(Self {
            http_client,
            base_url,
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// `{base}/workers/{id}`, with the id percent-encoded as one segment
    pub fn worker_url(&self, worker_id: &str) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push("workers").push(worker_id);
        }
        url
    }

    /// Fetch the aggregated record for one worker
    pub async fn fetch_worker(&self, worker_id: &str) -> Result<Map<String, Value>, RecordFetchError> {
        let url = self.worker_url(worker_id);
        debug!(url = %url, "Fetching worker record");

        let response = self
            .http_client
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| RecordFetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RecordFetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| RecordFetchError::Network {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        match serde_json::from_str::<Value>(&body) {
            Ok(Value::Object(record)) => Ok(record),
            Ok(other) => Err(RecordFetchError::Malformed {
                url: url.to_string(),
                message: format!("expected a JSON object, got {}", json_kind(&other)),
            }),
            Err(e) => Err(RecordFetchError::Malformed {
                url: url.to_string(),
                message: e.to_string(),
            }),
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
