//! Contradictions between a complaint and the platform record
//!
//! The record store is authoritative: when any rule fires, the complaint
//! is answered "Invalid complaint" without consulting the classifier.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rakshak_common::models::parse_flag;
use serde_json::Value;

use super::amount::extract_amount;
use super::keywords::{Transcript, NOT_PAID, NO_NOTICE, TERMINATION};
use crate::record::WorkerRecord;

/// Largest tolerated gap between a claimed and a recorded payout
pub const PAYOUT_TOLERANCE: f64 = 100.0;

/// Payout date keys, in lookup order
const PAYOUT_DATE_KEYS: &[&str] = &["date", "paid_at", "payout_date"];

/// True when the transcript contradicts the record
pub fn check_discrepancy(transcript: &Transcript, record: &WorkerRecord<'_>) -> bool {
    let rules = [
        claims_termination_while_active(transcript, record),
        claims_wrong_payout(transcript, record),
        claims_no_notice_despite_reason(transcript, record),
        claims_unpaid_despite_compliance(transcript, record),
    ];
    rules.iter().any(|fired| *fired)
}

/// Rule 1: termination claimed, record says not terminated
fn claims_termination_while_active(transcript: &Transcript, record: &WorkerRecord<'_>) -> bool {
    transcript.mentions_any(TERMINATION) && record.is_terminated() == Some(false)
}

/// Rule 2: claimed amount far from the most recent payout
fn claims_wrong_payout(transcript: &Transcript, record: &WorkerRecord<'_>) -> bool {
    let Some(claimed) = extract_amount(transcript.as_str()) else {
        return false;
    };
    let Some(latest) = record.payouts().and_then(|p| most_recent_payout(p)) else {
        return false;
    };

    match payout_amount(latest) {
        Some(recorded) => (recorded - claimed).abs() > PAYOUT_TOLERANCE,
        None => false,
    }
}

/// Rule 3: "no notice" claimed, record carries a termination reason
fn claims_no_notice_despite_reason(transcript: &Transcript, record: &WorkerRecord<'_>) -> bool {
    transcript.mentions_any(NO_NOTICE) && record.termination_reason_text().is_some()
}

/// Rule 4: non-payment claimed, every flagged order is payment compliant
fn claims_unpaid_despite_compliance(transcript: &Transcript, record: &WorkerRecord<'_>) -> bool {
    if !transcript.mentions_any(NOT_PAID) {
        return false;
    }
    let Some(orders) = record.orders() else {
        return false;
    };

    let mut flags = orders
        .iter()
        .filter_map(|order| order.as_object()?.get("payment_compliant"))
        .peekable();

    flags.peek().is_some() && flags.all(|flag| parse_flag(flag) == Some(true))
}

/// Dated entry with the greatest date, else the first entry
pub fn most_recent_payout(payouts: &[Value]) -> Option<&Value> {
    let newest_dated = payouts
        .iter()
        .enumerate()
        .filter_map(|(index, payout)| payout_date(payout).map(|date| (date, index, payout)))
        // Earlier entry wins a tie
        .max_by(|a, b| a.0.cmp(&b.0).then(b.1.cmp(&a.1)))
        .map(|(_, _, payout)| payout);

    newest_dated.or_else(|| payouts.first())
}

fn payout_date(payout: &Value) -> Option<NaiveDateTime> {
    let object = payout.as_object()?;
    PAYOUT_DATE_KEYS
        .iter()
        .find_map(|key| object.get(*key)?.as_str())
        .and_then(parse_date)
}

fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.naive_utc());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S%.f") {
        return Some(dt);
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// An object entry without `amount` reads as 0. Null amounts, non-numeric
/// amounts and entries that are not objects are `None`.
fn payout_amount(payout: &Value) -> Option<f64> {
    match payout.as_object()?.get("amount") {
        None => Some(0.0),
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        Some(_) => None,
    }
}
