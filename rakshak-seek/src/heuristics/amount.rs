//! Monetary amount extraction from free text

use once_cell::sync::Lazy;
use regex::Regex;

/// Maximal runs of decimal digits (any script) and dots
static RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d.]+").unwrap());

/// A whole run shaped like an amount
static AMOUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,6}(?:\.\d{1,2})?$").unwrap());

static DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d$").unwrap());

/// First standalone amount in `text`.
///
/// Text is split into maximal runs of decimal digits and dots; the first
/// run shaped `\d{1,6}(\.\d{1,2})?` wins. A run that touches another digit
/// or dot (`1234567`, `500.`, `1.2.3`) is not an amount. Digits from other
/// scripts (`४५०`, `٤٥٠`) count like ASCII digits.
pub fn extract_amount(text: &str) -> Option<f64> {
    RUN.find_iter(text)
        .map(|m| m.as_str())
        .find(|run| AMOUNT.is_match(run))
        .and_then(|run| to_ascii(run).parse().ok())
}

fn to_ascii(run: &str) -> String {
    run.chars()
        .map(|c| match digit_value(c) {
            Some(d) => char::from(b'0' + d as u8),
            None => c,
        })
        .collect()
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    DIGIT.is_match(c.encode_utf8(&mut buf))
}

/// Decimal digits come in contiguous blocks of ten starting at zero, so
/// the offset from the start of the run of digit code points gives the
/// value.
fn digit_value(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    if !is_decimal_digit(c) {
        return None;
    }

    let mut zero = c as u32;
    while let Some(prev) = zero.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        zero -= 1;
    }
    Some((c as u32 - zero) % 10)
}
