//! Transcript heuristics
//!
//! Keyword groups, amount extraction, the discrepancy rules, the
//! relevance filter and the local fallback label. All pure functions over
//! the transcript and the fetched record.

pub mod amount;
pub mod discrepancy;
pub mod fallback;
pub mod keywords;
pub mod relevance;

pub use discrepancy::check_discrepancy;
pub use fallback::fallback_decision;
pub use keywords::Transcript;
pub use relevance::relevant_fields;
