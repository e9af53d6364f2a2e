//! Platform record models
//!
//! Rows of the record store (workers, orders, termination status and logs,
//! review counts) and the aggregated per-worker summary served to the
//! decision service.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

/// Longest accepted extension key, in bytes
pub const MAX_EXTENSION_KEY_LEN: usize = 64;

/// Extension key holding `notes` text that was not a JSON object
pub const LEGACY_NOTES_KEY: &str = "legacy_notes";

/// Worker column names; extension keys may not shadow them
pub const WORKER_COLUMNS: [&str; 7] = [
    "worker_id",
    "name",
    "phone",
    "email",
    "joined_at",
    "current_status",
    "notes",
];

static EXTENSION_KEY: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z][a-z0-9_]*$").unwrap());

/// Model validation errors
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("{0} required")]
    MissingField(&'static str),

    #[error("extension key must not be empty")]
    EmptyKey,

    #[error("extension key '{0}' exceeds 64 bytes")]
    KeyTooLong(String),

    #[error("extension key '{0}' must be lowercase snake_case")]
    MalformedKey(String),

    #[error("extension key '{0}' is a reserved worker column")]
    ReservedKey(String),

    #[error("extensions must be a JSON object")]
    NotAnObject,

    #[error("invalid payload: {0}")]
    Payload(String),

    #[error("{0} must be a non-negative count")]
    NegativeCount(&'static str),

    #[error("review counts overflow")]
    CountOverflow,
}

/// Check an extension key against the documented namespace
pub fn validate_extension_key(key: &str) -> Result<(), ModelError> {
    if key.is_empty() {
        return Err(ModelError::EmptyKey);
    }
    if key.len() > MAX_EXTENSION_KEY_LEN {
        return Err(ModelError::KeyTooLong(key.to_string()));
    }
    if WORKER_COLUMNS.contains(&key) {
        return Err(ModelError::ReservedKey(key.to_string()));
    }
    if !EXTENSION_KEY.is_match(key) {
        return Err(ModelError::MalformedKey(key.to_string()));
    }
    Ok(())
}

/// Typed per-worker extension map, stored in the `notes` column.
///
/// Keys follow [`validate_extension_key`]. Well-known keys read by the
/// decision service:
/// - `payouts`: array of `{ "amount": number, "date": "YYYY-MM-DD..." }`
/// - `penalties`: array of penalty entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerExtensions(BTreeMap<String, Value>);

impl WorkerExtensions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode the `notes` column.
    ///
    /// A JSON object becomes the map as-is; any other non-empty text is
    /// kept under [`LEGACY_NOTES_KEY`].
    pub fn from_notes(notes: Option<&str>) -> Self {
        let text = match notes.map(str::trim) {
            Some(t) if !t.is_empty() => t,
            _ => return Self::default(),
        };

        match serde_json::from_str::<Value>(text) {
            Ok(Value::Object(map)) => Self(map.into_iter().collect()),
            _ => {
                let mut map = BTreeMap::new();
                map.insert(LEGACY_NOTES_KEY.to_string(), Value::String(text.to_string()));
                Self(map)
            }
        }
    }

    /// Encode for the `notes` column; `None` when empty
    pub fn to_notes(&self) -> Option<String> {
        if self.0.is_empty() {
            None
        } else {
            serde_json::to_string(&self.0).ok()
        }
    }

    /// Build from an untrusted JSON object, validating every key
    pub fn from_object(map: Map<String, Value>) -> Result<Self, ModelError> {
        let mut ext = Self::default();
        for (key, value) in map {
            ext.insert(key, value)?;
        }
        Ok(ext)
    }

    /// Add or replace a key; returns the previous value
    pub fn insert(&mut self, key: String, value: Value) -> Result<Option<Value>, ModelError> {
        validate_extension_key(&key)?;
        Ok(self.0.insert(key, value))
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read a loosely typed flag: booleans, numbers (zero is false), and the
/// strings "true"/"false" or integers. Anything else is unknown.
pub fn parse_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_f64().map(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            if s.eq_ignore_ascii_case("true") {
                Some(true)
            } else if s.eq_ignore_ascii_case("false") {
                Some(false)
            } else {
                s.parse::<i64>().ok().map(|i| i != 0)
            }
        }
        _ => None,
    }
}

/// Serde adapters for loosely typed flag fields
pub mod flag {
    use super::parse_flag;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// `Option<bool>` field: null/absent is `None`
    pub fn optional<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => Ok(None),
            Some(v) => parse_flag(&v)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid flag value: {}", v))),
        }
    }

    /// `bool` field: null/absent is `false`
    pub fn or_false<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        optional(deserializer).map(|v| v.unwrap_or(false))
    }
}

/// Worker row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Worker {
    pub worker_id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub joined_at: Option<String>,
    #[serde(default)]
    pub current_status: Option<String>,
    /// Flattened into the worker object on output
    #[serde(flatten)]
    pub extensions: WorkerExtensions,
}

impl Worker {
    /// Build a worker from a create request body.
    ///
    /// Column fields are read by name. Extensions come from an
    /// `extensions` object and/or a legacy `notes` value (object or text);
    /// any other top-level key is rejected by key validation.
    pub fn from_payload(payload: Value) -> Result<Self, ModelError> {
        let mut object = match payload {
            Value::Object(map) => map,
            _ => return Err(ModelError::Payload("JSON object required".to_string())),
        };

        let worker_id = match object.remove("worker_id") {
            Some(Value::String(id)) if !id.trim().is_empty() => id,
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(ModelError::MissingField("worker_id")),
        };

        let mut take = |key: &str| -> Result<Option<String>, ModelError> {
            match object.remove(key) {
                None | Some(Value::Null) => Ok(None),
                Some(Value::String(s)) => Ok(Some(s)),
                Some(other) => Err(ModelError::Payload(format!(
                    "{} must be a string, got {}",
                    key, other
                ))),
            }
        };

        let name = take("name")?;
        let phone = take("phone")?;
        let email = take("email")?;
        let joined_at = take("joined_at")?;
        let current_status = take("current_status")?;

        let mut extensions = match object.remove("notes") {
            None | Some(Value::Null) => WorkerExtensions::default(),
            Some(Value::String(text)) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Object(map)) => WorkerExtensions::from_object(map)?,
                _ => WorkerExtensions::from_notes(Some(&text)),
            },
            Some(Value::Object(map)) => WorkerExtensions::from_object(map)?,
            Some(_) => return Err(ModelError::NotAnObject),
        };

        match object.remove("extensions") {
            None | Some(Value::Null) => {}
            Some(Value::Object(map)) => {
                for (key, value) in map {
                    extensions.insert(key, value)?;
                }
            }
            Some(_) => return Err(ModelError::NotAnObject),
        }

        for (key, value) in object {
            extensions.insert(key, value)?;
        }

        Ok(Self {
            worker_id,
            name,
            phone,
            email,
            joined_at,
            current_status,
            extensions,
        })
    }
}

/// Order row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub worker_id: String,
    #[serde(default)]
    pub order_date: Option<String>,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub duration_min: Option<f64>,
    #[serde(default)]
    pub payout_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub flags: Option<String>,
    #[serde(default, deserialize_with = "flag::optional")]
    pub payment_compliant: Option<bool>,
    #[serde(default)]
    pub reduction_reason: Option<String>,
}

/// Termination status (one per worker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationStatus {
    pub worker_id: String,
    #[serde(default, deserialize_with = "flag::or_false")]
    pub is_terminated: bool,
    #[serde(default)]
    pub terminated_at: Option<String>,
    #[serde(default)]
    pub termination_reason_code: Option<String>,
    #[serde(default)]
    pub termination_reason_text: Option<String>,
    #[serde(default, deserialize_with = "flag::or_false")]
    pub appeal_allowed: bool,
    #[serde(default)]
    pub appeal_deadline: Option<String>,
}

/// Termination log entry (append-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerminationLog {
    /// Assigned by the store
    #[serde(default)]
    pub log_id: Option<i64>,
    pub worker_id: String,
    #[serde(default)]
    pub logged_at: Option<String>,
    #[serde(default)]
    pub reason_code: Option<String>,
    #[serde(default)]
    pub reason_text: Option<String>,
    #[serde(default)]
    pub related_order_id: Option<String>,
    #[serde(default)]
    pub evidence: Option<String>,
    #[serde(default)]
    pub severity: i64,
    #[serde(default)]
    pub action_taken: Option<String>,
    #[serde(default)]
    pub recorded_by: Option<String>,
}

/// Rating histogram (one per worker)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewCounts {
    pub worker_id: String,
    #[serde(default)]
    pub count_5: i64,
    #[serde(default)]
    pub count_4: i64,
    #[serde(default)]
    pub count_3: i64,
    #[serde(default)]
    pub count_2: i64,
    #[serde(default)]
    pub count_1: i64,
    /// Sum of the counts when not supplied
    #[serde(default)]
    pub total_reviews: Option<i64>,
}

impl ReviewCounts {
    /// `total_reviews` if supplied, else the sum of the counts.
    ///
    /// Negative counts and sums beyond `i64` are rejected.
    pub fn total(&self) -> Result<i64, ModelError> {
        let counts = [
            ("count_5", self.count_5),
            ("count_4", self.count_4),
            ("count_3", self.count_3),
            ("count_2", self.count_2),
            ("count_1", self.count_1),
            ("total_reviews", self.total_reviews.unwrap_or(0)),
        ];
        if let Some((field, _)) = counts.iter().find(|(_, n)| *n < 0) {
            return Err(ModelError::NegativeCount(*field));
        }

        let sum = counts[..5]
            .iter()
            .try_fold(0i64, |acc, (_, n)| acc.checked_add(*n))
            .ok_or(ModelError::CountOverflow)?;
        Ok(self.total_reviews.unwrap_or(sum))
    }
}

/// Aggregated worker record served by `GET /workers/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkerSummary {
    pub worker: Worker,
    /// Newest first
    pub orders: Vec<Order>,
    pub termination_status: Option<TerminationStatus>,
    /// Newest first
    pub termination_logs: Vec<TerminationLog>,
    pub review_counts: Option<ReviewCounts>,
}

/// Every row of every table, for `GET /db/print`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DatabaseSnapshot {
    pub workers: Vec<Worker>,
    pub orders: Vec<Order>,
    pub termination_status: Vec<TerminationStatus>,
    pub termination_logs: Vec<TerminationLog>,
    pub review_counts: Vec<ReviewCounts>,
}
