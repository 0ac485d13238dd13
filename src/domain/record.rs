//! Persisted assessment records.
//!
//! One `AssessmentRecord` is one immutable row of the history store.
//! Field names and value formats mirror the store's fixed tabular header,
//! so a record serializes identically to CSV and to JSON: absent lab values
//! appear as `N/A`, the lab flag as `Yes`/`No`, and confidence as a
//! one-decimal percentage string.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::assessment::{AssessmentResult, RiskLevel};

/// Placeholder for blank patient ids and health-worker names.
pub const NOT_AVAILABLE: &str = "N/A";

/// An immutable, persisted assessment.
///
/// The store is append-only; records are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    /// Commit time, second precision, local naive
    #[serde(rename = "Timestamp", with = "timestamp_format")]
    pub timestamp: NaiveDateTime,

    /// Patient identifier, `N/A` when absent
    #[serde(rename = "Patient_ID")]
    pub patient_id: String,

    #[serde(rename = "Age")]
    pub age: u32,

    #[serde(rename = "BMI")]
    pub bmi: f64,

    #[serde(rename = "SystolicBP")]
    pub systolic: f64,

    #[serde(rename = "DiastolicBP")]
    pub diastolic: f64,

    /// Blood sugar in mmol/L; `None` means "not measured", never 0
    #[serde(rename = "Blood_Sugar", with = "optional_measurement")]
    pub blood_sugar: Option<f64>,

    /// Hemoglobin in g/dL; `None` means "not measured", never 0
    #[serde(rename = "Hemoglobin", with = "optional_measurement")]
    pub hemoglobin: Option<f64>,

    #[serde(rename = "Risk_Level")]
    pub risk_level: RiskLevel,

    /// Confidence formatted to one decimal with a percent suffix, e.g. `87.5%`
    #[serde(rename = "Confidence")]
    pub confidence: String,

    #[serde(rename = "Model_Used")]
    pub model_used: String,

    #[serde(rename = "Lab_Available", with = "yes_no")]
    pub lab_available: bool,

    /// Health worker name, `N/A` when absent
    #[serde(rename = "Health_Worker")]
    pub health_worker: String,
}

impl AssessmentRecord {
    /// Build a record from a committed assessment.
    ///
    /// Lab fields are stored only when the assessment actually used them;
    /// stale values supplied alongside a basic-model result are dropped.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        timestamp: NaiveDateTime,
        patient_id: Option<&str>,
        health_worker: Option<&str>,
        age: u32,
        systolic: f64,
        diastolic: f64,
        blood_sugar: Option<f64>,
        hemoglobin: Option<f64>,
        result: &AssessmentResult,
    ) -> Self {
        Self {
            timestamp,
            patient_id: or_not_available(patient_id),
            age,
            bmi: result.bmi,
            systolic,
            diastolic,
            blood_sugar: blood_sugar.filter(|_| result.lab_available),
            hemoglobin: hemoglobin.filter(|_| result.lab_available),
            risk_level: result.risk_level,
            confidence: format!("{:.1}%", result.confidence),
            model_used: result.model_used.clone(),
            lab_available: result.lab_available,
            health_worker: or_not_available(health_worker),
        }
    }

    /// Numeric confidence parsed back out of the formatted string.
    ///
    /// `None` for a malformed value; callers skip such records rather
    /// than failing a whole scan.
    #[must_use]
    pub fn confidence_value(&self) -> Option<f64> {
        self.confidence
            .trim()
            .trim_end_matches('%')
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
    }
}

fn or_not_available(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Timestamp codec matching the store format `YYYY-MM-DD HH:MM:SS`.
mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&ts.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(raw.trim(), FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Codec for optional lab measurements: `None` round-trips as `N/A`.
///
/// An explicit absence marker keeps "not measured" distinguishable from
/// "measured as 0" in analytics.
mod optional_measurement {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<f64>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => s.serialize_f64(*v),
            None => s.serialize_str(super::NOT_AVAILABLE),
        }
    }

    /// Accepts either a numeric value or a textual marker, so records
    /// round-trip through both CSV and JSON representations.
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
        match Raw::deserialize(d)? {
            Raw::Number(v) => Ok(Some(v)),
            Raw::Text(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
                    return Ok(None);
                }
                trimmed
                    .parse::<f64>()
                    .map(Some)
                    .map_err(serde::de::Error::custom)
            }
        }
    }
}

/// Codec for the lab-availability flag: `Yes`/`No` in the store.
mod yes_no {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(if *value { "Yes" } else { "No" })
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
        let raw = String::deserialize(d)?;
        match raw.trim() {
            v if v.eq_ignore_ascii_case("yes") => Ok(true),
            v if v.eq_ignore_ascii_case("no") => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "Invalid lab flag: {other:?} (expected Yes or No)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::assessment::{ClassProbabilities, ModelVariant};

    fn sample_result(lab_available: bool) -> AssessmentResult {
        let variant = if lab_available {
            ModelVariant::Full
        } else {
            ModelVariant::Basic
        };
        AssessmentResult {
            risk_level: RiskLevel::High,
            confidence: 87.46,
            probabilities: ClassProbabilities {
                low: 4.0,
                moderate: 8.54,
                high: 87.46,
            },
            bmi: 31.2,
            model_used: variant.label().to_string(),
            lab_available,
        }
    }

    fn sample_timestamp() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2025-03-14 10:30:00", "%Y-%m-%d %H:%M:%S")
            .expect("Valid timestamp")
    }

    #[test]
    fn test_confidence_is_formatted_to_one_decimal() {
        let record = AssessmentRecord::new(
            sample_timestamp(),
            Some("P-2025-0001"),
            Some("Amina"),
            32,
            150.0,
            95.0,
            Some(7.8),
            Some(9.1),
            &sample_result(true),
        );

        assert_eq!(record.confidence, "87.5%");
        assert_eq!(record.confidence_value(), Some(87.5));
    }

    #[test]
    fn test_blank_identity_fields_become_not_available() {
        let record = AssessmentRecord::new(
            sample_timestamp(),
            Some("  "),
            None,
            32,
            150.0,
            95.0,
            None,
            None,
            &sample_result(false),
        );

        assert_eq!(record.patient_id, "N/A");
        assert_eq!(record.health_worker, "N/A");
    }

    #[test]
    fn test_stale_labs_dropped_for_basic_model_record() {
        let record = AssessmentRecord::new(
            sample_timestamp(),
            Some("P-2025-0002"),
            Some("Amina"),
            32,
            150.0,
            95.0,
            Some(7.8),
            Some(9.1),
            &sample_result(false),
        );

        assert_eq!(record.blood_sugar, None);
        assert_eq!(record.hemoglobin, None);
        assert!(!record.lab_available);
    }

    #[test]
    fn test_json_serialization_uses_na_markers() {
        let record = AssessmentRecord::new(
            sample_timestamp(),
            None,
            None,
            32,
            150.0,
            95.0,
            None,
            None,
            &sample_result(false),
        );

        let json = serde_json::to_value(&record).expect("Should serialize");
        assert_eq!(json["Blood_Sugar"], "N/A");
        assert_eq!(json["Hemoglobin"], "N/A");
        assert_eq!(json["Lab_Available"], "No");
        assert_eq!(json["Timestamp"], "2025-03-14 10:30:00");
        assert_eq!(json["Risk_Level"], "High");
    }

    #[test]
    fn test_malformed_confidence_parses_as_none() {
        let mut record = AssessmentRecord::new(
            sample_timestamp(),
            None,
            None,
            32,
            150.0,
            95.0,
            None,
            None,
            &sample_result(false),
        );
        record.confidence = "garbage".to_string();
        assert_eq!(record.confidence_value(), None);
    }
}
