//! Local label used when the classifier is unavailable or unclear

use super::keywords::{Transcript, FALLBACK_TRIGGERS};
use crate::decision::Decision;
use crate::record::WorkerRecord;

/// A complaint trigger plus a record that does not deny termination is
/// valid; everything else is invalid.
pub fn fallback_decision(transcript: &Transcript, record: &WorkerRecord<'_>) -> Decision {
    if transcript.mentions_any(FALLBACK_TRIGGERS) && record.declared_terminated() != Some(false) {
        Decision::Valid
    } else {
        Decision::Invalid
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map, Value};

    fn decide(transcript: &str, record: Value) -> Decision {
        let map: Map<String, Value> = serde_json::from_value(record).unwrap();
        fallback_decision(&Transcript::new(Some(transcript)), &WorkerRecord::new(&map))
    }

    #[test]
    fn test_trigger_with_terminated_record() {
        let record = json!({"termination_status": {"is_terminated": true}});
        assert_eq!(decide("I was suspended without reason", record), Decision::Valid);
    }

    #[test]
    fn test_trigger_without_status_is_valid() {
        assert_eq!(decide("my payout was reduced", json!({})), Decision::Valid);
    }

    #[test]
    fn test_record_denies_termination() {
        let record = json!({"termination_status": {"is_terminated": "0"}});
        assert_eq!(decide("I was suspended", record), Decision::Invalid);
    }

    #[test]
    fn test_camel_case_status_is_ignored() {
        let record = json!({"terminationStatus": {"is_terminated": false}});
        assert_eq!(decide("I was suspended", record), Decision::Valid);
    }

    #[test]
    fn test_no_trigger() {
        let record = json!({"termination_status": {"is_terminated": true}});
        assert_eq!(decide("app is slow", record), Decision::Invalid);
    }
}
