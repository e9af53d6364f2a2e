//! Subset of the worker record shown alongside a decision

use rakshak_common::models::parse_flag;
use serde_json::{Map, Value};

use super::keywords::{Transcript, PAYOUT, RATING, TERMINATION};
use crate::record::WorkerRecord;

/// Order lists longer than this are filtered down
pub const MAX_UNFILTERED_ORDERS: usize = 10;

/// Worker columns used to synthesise a `worker` object for flat records
const WORKER_KEYS: &[&str] = &["name", "phone", "email", "joined_at", "current_status"];

/// Pick the parts of `record` the complaint is about
pub fn relevant_fields(transcript: &Transcript, record: &WorkerRecord<'_>) -> Map<String, Value> {
    let mut relevant = Map::new();
    let rating = transcript.mentions_any(RATING);

    if transcript.mentions_any(TERMINATION)
        || transcript.mentions("termination")
        || transcript.mentions("appeal")
    {
        copy(record, &mut relevant, "termination_status");
        copy(record, &mut relevant, "termination_logs");
    }

    if transcript.mentions_any(PAYOUT) {
        copy(record, &mut relevant, "payouts");
        if let Some(orders) = record.get("orders") {
            relevant.insert("orders".to_string(), payout_orders(orders));
        }
    }

    if rating {
        copy(record, &mut relevant, "penalties");
        if !relevant.contains_key("orders") {
            copy(record, &mut relevant, "orders");
        }
    }

    if transcript.mentions("review") || rating {
        copy(record, &mut relevant, "review_counts");
    }

    if let Some(worker) = worker_info(record) {
        relevant.insert("worker".to_string(), worker);
    }

    relevant
}

fn copy(record: &WorkerRecord<'_>, relevant: &mut Map<String, Value>, key: &str) {
    if let Some(value) = record.get(key) {
        relevant.insert(key.to_string(), value.clone());
    }
}

/// Short order lists pass through. Long ones keep orders that say
/// something about pay; when none do, the first ten.
fn payout_orders(orders: &Value) -> Value {
    let Some(list) = orders.as_array() else {
        return orders.clone();
    };
    if list.len() <= MAX_UNFILTERED_ORDERS {
        return orders.clone();
    }

    let flagged: Vec<Value> = list.iter().filter(|o| is_pay_relevant(o)).cloned().collect();
    if flagged.is_empty() {
        Value::Array(list.iter().take(MAX_UNFILTERED_ORDERS).cloned().collect())
    } else {
        Value::Array(flagged)
    }
}

fn is_pay_relevant(order: &Value) -> bool {
    let Some(order) = order.as_object() else {
        return false;
    };

    let non_compliant = order.get("payment_compliant").and_then(parse_flag) == Some(false);
    let reduced = match order.get("reduction_reason") {
        None | Some(Value::Null) => false,
        Some(Value::String(reason)) => !reason.is_empty(),
        Some(_) => true,
    };
    let has_payout = order.get("payout_amount").is_some_and(|v| !v.is_null());

    non_compliant || reduced || has_payout
}

fn worker_info(record: &WorkerRecord<'_>) -> Option<Value> {
    if let Some(worker) = record.get("worker") {
        return Some(worker.clone());
    }

    let flat: Map<String, Value> = WORKER_KEYS
        .iter()
        .filter_map(|key| Some((key.to_string(), record.get(key)?.clone())))
        .collect();
    (!flat.is_empty()).then_some(Value::Object(flat))
}
