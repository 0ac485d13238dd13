//! Patient identifier allocation.
//!
//! Identifiers are year-scoped and sequential: `P-<year>-<seq>` with a
//! zero-padded 4-digit sequence starting at 1 each year. Allocation scans
//! the full history; it is pure and idempotent for a given snapshot, and
//! assumes a single writer (no cross-process mutual exclusion).

use chrono::{Datelike, NaiveDateTime};

use crate::domain::AssessmentRecord;
use crate::ports::HistoryStore;

/// Next identifier for the year of `now`, given a history snapshot.
///
/// Scans identifiers matching `P-<year>-*`; suffixes that do not parse as
/// an integer are skipped per-record, never fatal to the scan. Other years'
/// identifiers are ignored.
#[must_use]
pub fn next_patient_id(history: &[AssessmentRecord], now: NaiveDateTime) -> String {
    let year = now.year();
    let prefix = format!("P-{year}-");

    let max_sequence = history
        .iter()
        .filter_map(|record| record.patient_id.strip_prefix(&prefix))
        .filter_map(|suffix| suffix.parse::<u32>().ok())
        .max()
        .unwrap_or(0);

    format!("P-{year}-{:04}", max_sequence + 1)
}

/// First identifier of the year, used when the history cannot be read.
///
/// Known risk: if the read failure was transient, this can collide with an
/// existing identifier. Identifier generation is advisory, so the caller
/// gets a usable value rather than a failure.
#[must_use]
pub fn fallback_patient_id(now: NaiveDateTime) -> String {
    format!("P-{}-0001", now.year())
}

/// Allocate the next identifier against a store, degrading on read failure.
pub fn allocate<S: HistoryStore>(store: &S, now: NaiveDateTime) -> Result<String, String> {
    match store.load_all() {
        Ok(history) => Ok(next_patient_id(&history, now)),
        Err(e) => {
            tracing::warn!("History unreadable during id allocation: {e}");
            Err(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AssessmentResult, ClassProbabilities, ModelVariant, RiskLevel};

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").expect("Valid timestamp")
    }

    fn record_with_id(patient_id: &str) -> AssessmentRecord {
        let result = AssessmentResult {
            risk_level: RiskLevel::Low,
            confidence: 90.0,
            probabilities: ClassProbabilities {
                low: 90.0,
                moderate: 7.0,
                high: 3.0,
            },
            bmi: 22.0,
            model_used: ModelVariant::Basic.label().to_string(),
            lab_available: false,
        };
        AssessmentRecord::new(
            ts("2025-01-05 09:00:00"),
            Some(patient_id),
            Some("Amina"),
            27,
            110.0,
            70.0,
            None,
            None,
            &result,
        )
    }

    #[test]
    fn test_next_id_ignores_other_years() {
        let history = vec![
            record_with_id("P-2025-0001"),
            record_with_id("P-2025-0007"),
            record_with_id("P-2024-0099"),
        ];
        let id = next_patient_id(&history, ts("2025-06-01 12:00:00"));
        assert_eq!(id, "P-2025-0008");
    }

    #[test]
    fn test_empty_history_starts_at_one() {
        let id = next_patient_id(&[], ts("2025-06-01 12:00:00"));
        assert_eq!(id, "P-2025-0001");
    }

    #[test]
    fn test_unparseable_suffixes_are_skipped() {
        let history = vec![
            record_with_id("P-2025-xyz"),
            record_with_id("P-2025-0003"),
            record_with_id("N/A"),
        ];
        let id = next_patient_id(&history, ts("2025-06-01 12:00:00"));
        assert_eq!(id, "P-2025-0004");
    }

    #[test]
    fn test_sequence_grows_past_four_digits() {
        let history = vec![record_with_id("P-2025-9999")];
        let id = next_patient_id(&history, ts("2025-06-01 12:00:00"));
        assert_eq!(id, "P-2025-10000");
    }

    #[test]
    fn test_fallback_id() {
        assert_eq!(fallback_patient_id(ts("2026-02-01 08:00:00")), "P-2026-0001");
    }
}
