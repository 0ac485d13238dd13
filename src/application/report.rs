//! Report content assembly.
//!
//! Resolves an assessment result plus its raw measurements into the
//! fully-formatted, classified content a document renderer consumes.
//! Pure; the renderer owns file naming and layout.

use chrono::NaiveDateTime;

use crate::domain::report::{
    recommendations_for, BloodPressureStatus, BloodSugarStatus, BmiStatus, HemoglobinStatus,
    ReportContent, ReportLine,
};
use crate::domain::{AssessmentResult, MeasurementInput, NOT_AVAILABLE};

fn or_not_available(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_AVAILABLE.to_string(),
    }
}

/// Assemble report content from a committed or in-memory assessment.
///
/// Lab measurement lines appear only when the result actually used labs;
/// a basic-model report carries no blood sugar or hemoglobin line even if
/// stale values are present on the input.
#[must_use]
pub fn build_report_content(
    result: &AssessmentResult,
    input: &MeasurementInput,
    patient_id: Option<&str>,
    health_worker: Option<&str>,
    generated_at: NaiveDateTime,
) -> ReportContent {
    let mut measurements = vec![
        ReportLine {
            name: "BMI",
            value: format!("{:.1} kg/m²", result.bmi),
            status: BmiStatus::classify(result.bmi).label(),
        },
        ReportLine {
            name: "Blood pressure",
            value: format!("{:.0}/{:.0} mmHg", input.systolic, input.diastolic),
            status: BloodPressureStatus::classify(input.systolic, input.diastolic).label(),
        },
    ];

    if result.lab_available {
        if let Some(sugar) = input.blood_sugar {
            measurements.push(ReportLine {
                name: "Blood sugar",
                value: format!("{sugar:.1} mmol/L"),
                status: BloodSugarStatus::classify(sugar).label(),
            });
        }
        if let Some(hb) = input.hemoglobin {
            measurements.push(ReportLine {
                name: "Hemoglobin",
                value: format!("{hb:.1} g/dL"),
                status: HemoglobinStatus::classify(hb).label(),
            });
        }
    }

    ReportContent {
        generated_at,
        patient_id: or_not_available(patient_id),
        health_worker: or_not_available(health_worker),
        age: input.age,
        risk_level: result.risk_level,
        risk_description: result.risk_level.description(),
        confidence: result.confidence,
        probabilities: result.probabilities,
        model_used: result.model_used.clone(),
        measurements,
        recommendations: recommendations_for(result.risk_level).to_vec(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassProbabilities, ModelVariant, RiskLevel};

    fn ts(raw: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").expect("Valid timestamp")
    }

    fn input() -> MeasurementInput {
        MeasurementInput {
            age: 31,
            weight_kg: 82.0,
            height_cm: 158.0,
            systolic: 142.0,
            diastolic: 92.0,
            blood_sugar: Some(7.4),
            hemoglobin: Some(9.1),
            lab_available: true,
        }
    }

    fn result(lab_available: bool) -> AssessmentResult {
        let variant = if lab_available {
            ModelVariant::Full
        } else {
            ModelVariant::Basic
        };
        AssessmentResult {
            risk_level: RiskLevel::High,
            confidence: 87.2,
            probabilities: ClassProbabilities {
                low: 4.1,
                moderate: 8.7,
                high: 87.2,
            },
            bmi: 32.8,
            model_used: variant.label().to_string(),
            lab_available,
        }
    }

    #[test]
    fn test_full_report_carries_all_measurement_lines() {
        let content = build_report_content(
            &result(true),
            &input(),
            Some("P-2025-0042"),
            Some("Amina"),
            ts("2025-03-14 10:30:00"),
        );

        assert_eq!(content.patient_id, "P-2025-0042");
        assert_eq!(content.measurements.len(), 4);
        assert_eq!(content.measurements[0].value, "32.8 kg/m²");
        assert_eq!(content.measurements[0].status, "Obese");
        assert_eq!(content.measurements[1].value, "142/92 mmHg");
        assert_eq!(content.measurements[1].status, "Hypertensive");
        assert_eq!(content.measurements[2].status, "High (diabetic range)");
        assert_eq!(content.measurements[3].status, "Low (anemic)");
        assert!(!content.recommendations.is_empty());
    }

    #[test]
    fn test_basic_report_omits_lab_lines() {
        // Stale lab values on the input must not surface in a basic report.
        let content = build_report_content(
            &result(false),
            &input(),
            Some("P-2025-0042"),
            None,
            ts("2025-03-14 10:30:00"),
        );

        assert_eq!(content.measurements.len(), 2);
        assert!(content
            .measurements
            .iter()
            .all(|line| line.name == "BMI" || line.name == "Blood pressure"));
    }

    #[test]
    fn test_blank_identity_becomes_not_available() {
        let content = build_report_content(
            &result(true),
            &input(),
            Some("   "),
            None,
            ts("2025-03-14 10:30:00"),
        );
        assert_eq!(content.patient_id, "N/A");
        assert_eq!(content.health_worker, "N/A");
    }

    #[test]
    fn test_risk_description_matches_level() {
        let content = build_report_content(
            &result(true),
            &input(),
            None,
            None,
            ts("2025-03-14 10:30:00"),
        );
        assert_eq!(content.risk_description, RiskLevel::High.description());
    }
}
