//! Complaint classifier backed by the generative model

use rakshak_common::llm::{truncate, GenerationOptions, GenerativeClient, LlmError};
use serde_json::Value;

use crate::decision::Decision;

/// Reply budget; the model is asked for a two-word label
const MAX_OUTPUT_TOKENS: u32 = 128;

/// Characters of an unrecognised JSON reply kept as the label text
const MAX_FALLBACK_REPLY: usize = 2000;

/// Classifier reply
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierReply {
    /// Label text as returned by the model
    pub text: String,
    /// Full response body
    pub raw: Value,
}

/// Valid/invalid complaint classifier
#[derive(Debug, Clone)]
pub struct Classifier {
    client: GenerativeClient,
}

impl Classifier {
    pub fn new(client: GenerativeClient) -> Self {
        Self { client }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_configured()
    }

    /// Ask the model to label the complaint.
    ///
    /// `payload` is the audit document (request metadata plus the fetched
    /// record).
    pub async fn classify(&self, transcript: &str, payload: &Value) -> Result<ClassifierReply, LlmError> {
        let prompt = build_prompt(transcript, payload)?;
        let options = GenerationOptions {
            temperature: 0.0,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            timeout: None,
        };

        let generation = self.client.generate(&prompt, &options).await?;
        let text = match generation.text {
            Some(text) => text.trim().to_string(),
            None => truncate(&generation.raw.to_string(), MAX_FALLBACK_REPLY),
        };

        Ok(ClassifierReply {
            text,
            raw: generation.raw,
        })
    }
}

/// Classification prompt: precedence rule, the complaint and the record
pub fn build_prompt(transcript: &str, payload: &Value) -> Result<String, LlmError> {
    let db = serde_json::to_string_pretty(payload).map_err(|e| LlmError::Parse(e.to_string()))?;

    Ok(format!(
        "You are a legal assistant. Given a gig-worker complaint (TEXT) and a company database (DB), \
         decide whether the complaint is VALID or INVALID under the Karnataka Gig Workers Act.\n\n\
         Important rules:\n\
         1) If any contradiction exists between the worker's claim and the company DB, the DB has precedence => INVALID.\n\
         2) Otherwise evaluate lawfully and return only one of these exact phrases: \"Valid complaint\" or \"Invalid complaint\".\n\n\
         Now evaluate and answer with only the phrase (no explanation):\n\n\
         COMPLAINT:\n{}\n\n\
         COMPANY_DB:\n{}\n\n\
         Answer:",
        transcript, db
    ))
}

/// Read a label out of free-form model text.
///
/// Prefixes are checked before substrings, and "invalid" before "valid"
/// since the latter is a substring of the former.
pub fn parse_label(reply: &str) -> Option<Decision> {
    let reply = reply.trim().to_lowercase();

    if reply.starts_with("valid") {
        Some(Decision::Valid)
    } else if reply.starts_with("invalid") || reply.contains("invalid") {
        Some(Decision::Invalid)
    } else if reply.contains("valid") {
        Some(Decision::Valid)
    } else {
        None
    }
}
