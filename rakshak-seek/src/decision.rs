//! Decision fusion for `/seek`
//!
//! fetch record -> audit -> discrepancy check -> classifier -> fallback.
//! Record evidence beats the transcript and the model: a discrepancy ends
//! the request before the classifier is called.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::audit::AuditSink;
use crate::classifier::{parse_label, Classifier};
use crate::heuristics::{check_discrepancy, fallback_decision, relevant_fields, Transcript};
use crate::record::WorkerRecord;
use crate::record_client::{RecordClient, RecordFetchError};

/// Final complaint label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    #[serde(rename = "Valid complaint")]
    Valid,
    #[serde(rename = "Invalid complaint")]
    Invalid,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Valid => "Valid complaint",
            Decision::Invalid => "Invalid complaint",
        }
    }
}

/// Which stage produced the decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecisionSource {
    Discrepancy,
    Classifier,
    Fallback,
}

impl DecisionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionSource::Discrepancy => "discrepancy",
            DecisionSource::Classifier => "classifier",
            DecisionSource::Fallback => "fallback",
        }
    }
}

/// `POST /seek` request body
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeekRequest {
    #[serde(rename = "workerId", default)]
    pub worker_id: Option<String>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(rename = "platformName", default)]
    pub platform_name: Option<String>,
    #[serde(default)]
    pub entities: Option<Value>,
}

/// `POST /seek` response body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeekResponse {
    pub final_decision: Decision,
    pub relevant_db: Map<String, Value>,
    pub decision_source: DecisionSource,
    /// Classifier response body, when it answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier_raw: Option<Value>,
    /// Why the classifier could not be used
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classifier_error: Option<String>,
}

/// Request-level failures
#[derive(Debug, Error)]
pub enum DecisionError {
    #[error("workerId is required")]
    MissingWorkerId,

    #[error(transparent)]
    Fetch(#[from] RecordFetchError),

    #[error("{0}")]
    Audit(rakshak_common::Error),
}

/// Runs one complaint through the decision pipeline
#[derive(Debug, Clone)]
pub struct DecisionFuser {
    records: RecordClient,
    audit: AuditSink,
    classifier: Classifier,
}

impl DecisionFuser {
    pub fn new(records: RecordClient, audit: AuditSink, classifier: Classifier) -> Self {
        Self {
            records,
            audit,
            classifier,
        }
    }

    pub fn records(&self) -> &RecordClient {
        &self.records
    }

    pub fn audit(&self) -> &AuditSink {
        &self.audit
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    pub async fn decide(&self, request: &SeekRequest) -> Result<SeekResponse, DecisionError> {
        let worker_id = request
            .worker_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(DecisionError::MissingWorkerId)?;

        let record = self.records.fetch_worker(worker_id).await?;

        let called_at = rakshak_common::time::now();
        let payload = json!({
            "meta": {
                "called_at": rakshak_common::time::iso_utc(called_at),
                "requested_worker": worker_id,
                "transcript": request.transcript,
                "platformName": request.platform_name,
                "entities": request.entities,
            },
            "worker_db": record,
        });
        self.audit
            .write(worker_id, called_at, &payload)
            .await
            .map_err(DecisionError::Audit)?;

        let view = WorkerRecord::new(&record);
        let transcript = Transcript::new(request.transcript.as_deref());
        let relevant_db = relevant_fields(&transcript, &view);

        let response = if check_discrepancy(&transcript, &view) {
            SeekResponse {
                final_decision: Decision::Invalid,
                relevant_db,
                decision_source: DecisionSource::Discrepancy,
                classifier_raw: None,
                classifier_error: None,
            }
        } else {
            let complaint = request.transcript.as_deref().unwrap_or_default();
            match self.classifier.classify(complaint, &payload).await {
                Ok(reply) => {
                    let (final_decision, decision_source) = match parse_label(&reply.text) {
                        Some(label) => (label, DecisionSource::Classifier),
                        None => (
                            fallback_decision(&transcript, &view),
                            DecisionSource::Fallback,
                        ),
                    };
                    SeekResponse {
                        final_decision,
                        relevant_db,
                        decision_source,
                        classifier_raw: Some(reply.raw),
                        classifier_error: None,
                    }
                }
                Err(e) => {
                    warn!(worker_id = %worker_id, error = %e, "Classifier unavailable, using fallback");
                    SeekResponse {
                        final_decision: fallback_decision(&transcript, &view),
                        relevant_db,
                        decision_source: DecisionSource::Fallback,
                        classifier_raw: None,
                        classifier_error: Some(e.to_string()),
                    }
                }
            }
        };

        info!(
            worker_id = %worker_id,
            decision = response.final_decision.as_str(),
            source = response.decision_source.as_str(),
            "Complaint decided"
        );
        Ok(response)
    }
}
