//! Report content rules: pure classification tables for printable reports.
//!
//! These functions map raw measurements to categorical status labels and
//! risk-keyed recommendation lists. They have no side effects; the external
//! document renderer consumes their output as fully-resolved content.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use serde::Serialize;

use super::assessment::RiskLevel;

/// BMI status per the clinical cut-offs used on printed reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BmiStatus {
    Underweight,
    Normal,
    Overweight,
    Obese,
}

impl BmiStatus {
    /// Classify a BMI value (kg/m²).
    #[must_use]
    pub fn classify(bmi: f64) -> Self {
        if bmi < 18.5 {
            Self::Underweight
        } else if bmi < 25.0 {
            Self::Normal
        } else if bmi < 30.0 {
            Self::Overweight
        } else {
            Self::Obese
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Underweight => "Underweight",
            Self::Normal => "Normal",
            Self::Overweight => "Overweight",
            Self::Obese => "Obese",
        }
    }
}

/// Blood pressure status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BloodPressureStatus {
    Normal,
    Prehypertensive,
    Hypertensive,
}

impl BloodPressureStatus {
    /// Classify a systolic/diastolic pair (mmHg).
    #[must_use]
    pub fn classify(systolic: f64, diastolic: f64) -> Self {
        if systolic >= 140.0 || diastolic >= 90.0 {
            Self::Hypertensive
        } else if systolic >= 120.0 || diastolic >= 80.0 {
            Self::Prehypertensive
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Prehypertensive => "Prehypertensive",
            Self::Hypertensive => "Hypertensive",
        }
    }
}

/// Blood sugar status (mmol/L).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BloodSugarStatus {
    Normal,
    Borderline,
    High,
}

impl BloodSugarStatus {
    #[must_use]
    pub fn classify(mmol_per_l: f64) -> Self {
        if mmol_per_l >= 7.0 {
            Self::High
        } else if mmol_per_l >= 5.6 {
            Self::Borderline
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::Borderline => "Borderline",
            Self::High => "High (diabetic range)",
        }
    }
}

/// Hemoglobin status (g/dL).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HemoglobinStatus {
    Normal,
    MildAnemia,
    Low,
}

impl HemoglobinStatus {
    #[must_use]
    pub fn classify(g_per_dl: f64) -> Self {
        if g_per_dl < 9.5 {
            Self::Low
        } else if g_per_dl < 11.0 {
            Self::MildAnemia
        } else {
            Self::Normal
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Normal => "Normal",
            Self::MildAnemia => "Mild anemia",
            Self::Low => "Low (anemic)",
        }
    }
}

/// Recommendation lists are domain data, shipped verbatim as an asset and
/// embedded at compile time. Parsed once.
static RECOMMENDATIONS: OnceLock<BTreeMap<String, Vec<String>>> = OnceLock::new();

const RECOMMENDATIONS_JSON: &str = include_str!("../../assets/recommendations.json");

fn recommendation_table() -> &'static BTreeMap<String, Vec<String>> {
    RECOMMENDATIONS.get_or_init(|| {
        // The asset is part of the build; a parse failure is a packaging bug,
        // caught by tests rather than deferred to callers.
        serde_json::from_str(RECOMMENDATIONS_JSON).unwrap_or_default()
    })
}

/// Ordered clinical guidance for a risk level.
#[must_use]
pub fn recommendations_for(level: RiskLevel) -> &'static [String] {
    recommendation_table()
        .get(&level.to_string())
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// One measurement line on a report: name, formatted value, status label.
#[derive(Debug, Clone, Serialize)]
pub struct ReportLine {
    pub name: &'static str,
    pub value: String,
    pub status: &'static str,
}

/// Fully-resolved report content handed to the external renderer.
///
/// Everything here is already classified and formatted; the renderer only
/// lays it out.
#[derive(Debug, Clone, Serialize)]
pub struct ReportContent {
    /// Content assembly time, second precision
    pub generated_at: chrono::NaiveDateTime,
    pub patient_id: String,
    pub health_worker: String,
    pub age: u32,
    pub risk_level: RiskLevel,
    pub risk_description: &'static str,
    /// Confidence as a percentage (0-100)
    pub confidence: f64,
    pub probabilities: super::assessment::ClassProbabilities,
    pub model_used: String,
    pub measurements: Vec<ReportLine>,
    pub recommendations: Vec<String>,
}
