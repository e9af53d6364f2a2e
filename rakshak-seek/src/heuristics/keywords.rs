//! Keyword groups and the lower-cased transcript they are matched against

/// Termination or suspension claims
pub const TERMINATION: &[&str] = &[
    "terminate",
    "terminated",
    "suspend",
    "suspended",
    "deactivated",
    "blocked",
    "banned",
];

/// Payout or payment claims
pub const PAYOUT: &[&str] = &[
    "payout",
    "paid",
    "not paid",
    "unpaid",
    "payment",
    "paid ₹",
    "paid rs",
    "rupees",
    "rs.",
];

/// Rating, algorithm and penalty claims
pub const RATING: &[&str] = &["rating", "algo", "algorithm", "penalty", "deduct", "deduction"];

/// Claims of termination without notice
pub const NO_NOTICE: &[&str] = &["no notice", "sudden", "immediately", "without notice"];

/// Claims of unpaid work
pub const NOT_PAID: &[&str] = &[
    "not paid",
    "didn't get paid",
    "unpaid",
    "not received",
    "not paid to me",
];

/// Complaint triggers for the local fallback label
pub const FALLBACK_TRIGGERS: &[&str] = &[
    "suspend",
    "suspended",
    "terminated",
    "termination",
    "no notice",
    "deduct",
    "penalty",
    "reduced",
    "unpaid",
    "not paid",
    "appeal",
];

/// Lower-cased complaint transcript; a missing transcript is empty
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    lower: String,
}

impl Transcript {
    pub fn new(text: Option<&str>) -> Self {
        Self {
            lower: text.unwrap_or_default().to_lowercase(),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.lower
    }

    /// Case-insensitive substring match
    pub fn mentions(&self, phrase: &str) -> bool {
        self.lower.contains(phrase)
    }

    pub fn mentions_any(&self, phrases: &[&str]) -> bool {
        phrases.iter().any(|p| self.mentions(p))
    }
}
