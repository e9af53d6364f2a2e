//! Timestamp utilities

use chrono::{DateTime, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// ISO-8601 timestamp with a trailing `Z`, as stored in audit metadata
pub fn iso_utc(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(chrono::SecondsFormat::Millis, true)
}

/// Compact filename-safe timestamp: `YYYYMMDDTHHMMSS.mmmZ`
pub fn compact_utc(ts: DateTime<Utc>) -> String {
    ts.format("%Y%m%dT%H%M%S%.3fZ").to_string()
}
