//! Read-only view over a fetched worker record
//!
//! The external platform is not guaranteed to be the simulator, so every
//! accessor tolerates missing keys and unexpected value types.

use rakshak_common::models::parse_flag;
use serde_json::{Map, Value};

/// Borrowed view of an aggregated worker record
#[derive(Debug, Clone, Copy)]
pub struct WorkerRecord<'a> {
    inner: &'a Map<String, Value>,
}

impl<'a> WorkerRecord<'a> {
    pub fn new(inner: &'a Map<String, Value>) -> Self {
        Self { inner }
    }

    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.inner.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// `termination_status`, or its camelCase alias
    pub fn termination_status(&self) -> Option<&'a Map<String, Value>> {
        self.inner
            .get("termination_status")
            .and_then(Value::as_object)
            .or_else(|| {
                self.inner
                    .get("terminationStatus")
                    .and_then(Value::as_object)
            })
    }

    /// `None` when the flag is absent or unreadable
    pub fn is_terminated(&self) -> Option<bool> {
        self.termination_status()?
            .get("is_terminated")
            .and_then(parse_flag)
    }

    /// `is_terminated` read from `termination_status` only, ignoring the
    /// camelCase alias
    pub fn declared_terminated(&self) -> Option<bool> {
        self.inner
            .get("termination_status")?
            .as_object()?
            .get("is_terminated")
            .and_then(parse_flag)
    }

    /// Non-empty termination reason
    pub fn termination_reason_text(&self) -> Option<&'a str> {
        self.termination_status()?
            .get("termination_reason_text")
            .and_then(Value::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Top-level `payouts`, else the worker's `payouts` extension
    pub fn payouts(&self) -> Option<&'a Vec<Value>> {
        let top_level = self
            .inner
            .get("payouts")
            .and_then(Value::as_array)
            .filter(|p| !p.is_empty());

        top_level.or_else(|| {
            self.inner
                .get("worker")?
                .get("payouts")?
                .as_array()
                .filter(|p| !p.is_empty())
        })
    }

    pub fn orders(&self) -> Option<&'a Vec<Value>> {
        self.inner.get("orders").and_then(Value::as_array)
    }
}
