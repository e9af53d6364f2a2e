//! Generative-language API client
//!
//! One `generateContent` client shared by the complaint classifier and the
//! statement service. The request envelope is fixed; reply text is pulled
//! out of the few response shapes the API has been seen to return.

use crate::config::LlmConfig;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const USER_AGENT: &str = concat!("rakshak/", env!("CARGO_PKG_VERSION"));

/// Longest error body kept in [`LlmError::Api`]
const MAX_ERROR_BODY: usize = 500;

/// Generative client errors
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model not configured (api key missing)")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No usable model: {0}")]
    NoModel(String),
}

/// Per-call generation settings
#[derive(Debug, Clone)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub max_output_tokens: u32,
    /// Overrides the client timeout for this call
    pub timeout: Option<Duration>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.0,
            max_output_tokens: 128,
            timeout: None,
        }
    }
}

/// Model reply
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    /// Reply text, when the response had a recognised shape
    pub text: Option<String>,
    /// Decoded JSON body, or the raw body as a JSON string if it was not JSON
    pub raw: Value,
}

/// generateContent client
#[derive(Debug, Clone)]
pub struct GenerativeClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    timeout: Duration,
}

impl GenerativeClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LlmError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| LlmError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            endpoint: config.endpoint(),
            api_key: config.key().map(str::to_string),
            timeout: config.timeout(),
        })
    }

    /// Replace the default per-call timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one prompt.
    ///
    /// Non-2xx replies are errors. A 2xx body that is not JSON is returned
    /// as the reply text.
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<Generation, LlmError> {
        let key = self.api_key.as_deref().ok_or(LlmError::NotConfigured)?;
        let body = build_request_body(prompt, options);

        debug!(
            endpoint = %self.endpoint,
            prompt_chars = prompt.len(),
            max_output_tokens = options.max_output_tokens,
            "Calling generative model"
        );

        let response = self
            .http_client
            .post(&self.endpoint)
            .query(&[("key", key)])
            .timeout(options.timeout.unwrap_or(self.timeout))
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(LlmError::Api(status.as_u16(), truncate(&text, MAX_ERROR_BODY)));
        }

        Ok(match serde_json::from_str::<Value>(&text) {
            Ok(json) => Generation {
                text: extract_text(&json),
                raw: json,
            },
            Err(_) => Generation {
                text: Some(text.trim().to_string()),
                raw: Value::String(text),
            },
        })
    }

    /// List models under `api_root` and point the client at the first
    /// preferred model that supports generateContent.
    pub async fn select_model(
        &mut self,
        api_root: &str,
        preferred: &[String],
    ) -> Result<String, LlmError> {
        let key = self.api_key.clone().ok_or(LlmError::NotConfigured)?;
        let api_root = api_root.trim_end_matches('/');

        let response = self
            .http_client
            .get(format!("{}/models", api_root))
            .query(&[("key", key.as_str())])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LlmError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::Api(status.as_u16(), truncate(&text, MAX_ERROR_BODY)));
        }

        let listing: Value = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        let model = pick_model(&listing, preferred)
            .ok_or_else(|| LlmError::NoModel(preferred.join(", ")))?;

        self.endpoint = format!("{}/{}:generateContent", api_root, model);
        info!(model = %model, "Selected generative model");
        Ok(model)
    }
}

/// Request envelope for generateContent
pub fn build_request_body(prompt: &str, options: &GenerationOptions) -> Value {
    json!({
        "contents": [
            { "role": "user", "parts": [ { "text": prompt } ] }
        ],
        "generationConfig": {
            "temperature": options.temperature,
            "maxOutputTokens": options.max_output_tokens,
        }
    })
}

/// Pull reply text out of a response body.
///
/// Recognised shapes:
/// - `candidates[0].content.parts[0]` as a string or `{ "text": ... }`
/// - `candidates[0].content` as a string
/// - `outputs[0].content[*].text` (first entry with text)
pub fn extract_text(body: &Value) -> Option<String> {
    if let Some(candidate) = body.get("candidates").and_then(|c| c.get(0)) {
        let content = candidate.get("content");

        let from_parts = content
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|part| match part {
                Value::String(s) => Some(s.as_str()),
                other => other.get("text").and_then(Value::as_str),
            });

        let from_content = content.and_then(Value::as_str);

        if let Some(text) = from_parts.or(from_content) {
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    body.get("outputs")
        .and_then(|o| o.get(0))
        .and_then(|out| out.get("content"))
        .and_then(Value::as_array)
        .and_then(|entries| {
            entries
                .iter()
                .find_map(|e| e.get("text").and_then(Value::as_str))
        })
        .map(|t| t.trim().to_string())
}

/// First preferred model in a ListModels response that supports generateContent
pub fn pick_model(listing: &Value, preferred: &[String]) -> Option<String> {
    let models = listing.get("models")?.as_array()?;

    preferred
        .iter()
        .find(|wanted| {
            models.iter().any(|m| {
                m.get("name").and_then(Value::as_str) == Some(wanted.as_str())
                    && m.get("supportedGenerationMethods")
                        .and_then(Value::as_array)
                        .map(|methods| methods.iter().any(|x| x == "generateContent"))
                        .unwrap_or(false)
            })
        })
        .cloned()
}

/// Truncate on a char boundary
pub fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
