//! Assessment result types.
//!
//! Represents the normalized output of the maternal risk classifiers.

use serde::{Deserialize, Serialize};

/// Risk level classification for a pregnancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    /// Low risk, routine antenatal care
    Low,
    /// Moderate risk, closer monitoring recommended
    Moderate,
    /// High risk, referral recommended
    High,
}

impl RiskLevel {
    /// All levels in class-index order. The external classifiers are trained
    /// with class indices {0, 1, 2} aligned to this order.
    pub const ALL: [Self; 3] = [Self::Low, Self::Moderate, Self::High];

    /// Map a classifier class index to a risk level.
    #[must_use]
    pub fn from_class_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Get a human-readable description.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Low => "Low risk - Routine antenatal care",
            Self::Moderate => "Moderate risk - Closer monitoring recommended",
            Self::High => "High risk - Referral to a clinician advised",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "Low"),
            Self::Moderate => write!(f, "Moderate"),
            Self::High => write!(f, "High"),
        }
    }
}

/// Which of the two pre-trained classifiers is used for an assessment.
///
/// Determined solely by lab availability, never partially.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelVariant {
    /// 3-feature model: BMI, SystolicBP, DiastolicBP
    Basic,
    /// 5-feature model: BMI, SystolicBP, BloodSugar, Hemoglobin, DiastolicBP
    Full,
}

impl ModelVariant {
    /// Feature arity the variant was trained on.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        match self {
            Self::Basic => 3,
            Self::Full => 5,
        }
    }

    /// Human-readable label surfaced in results and records.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Basic => "Basic Model (3 features)",
            Self::Full => "Full Model (5 features)",
        }
    }
}

/// Per-class probabilities on the 0-100 scale, aligned to
/// {Low, Moderate, High}.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub low: f64,
    pub moderate: f64,
    pub high: f64,
}

impl ClassProbabilities {
    /// Probability of a specific level.
    #[must_use]
    pub fn for_level(&self, level: RiskLevel) -> f64 {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::High => self.high,
        }
    }

    /// Sum of the three class probabilities (≈ 100 for a valid result).
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.low + self.moderate + self.high
    }
}

/// Normalized result of one assessment.
///
/// Transient unless explicitly committed to the history store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssessmentResult {
    /// Predicted risk level
    pub risk_level: RiskLevel,

    /// Probability of the predicted class, as a percentage (0-100)
    pub confidence: f64,

    /// Full class probability triple (0-100 each)
    pub probabilities: ClassProbabilities,

    /// Computed body-mass index
    pub bmi: f64,

    /// Human-readable variant label, e.g. "Full Model (5 features)"
    pub model_used: String,

    /// Whether lab values participated in this assessment
    pub lab_available: bool,
}

/// Coerce a non-finite value to 0.0.
///
/// Model output must never surface NaN or infinity to a consumer.
#[must_use]
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

impl AssessmentResult {
    /// Build a result from raw classifier output on the 0-1 probability scale.
    ///
    /// Scales probabilities to 0-100 and coerces any non-finite numeric to 0.0.
    #[must_use]
    pub fn from_classification(
        risk_level: RiskLevel,
        probabilities: [f64; 3],
        bmi: f64,
        variant: ModelVariant,
    ) -> Self {
        let probabilities = ClassProbabilities {
            low: finite_or_zero(probabilities[0] * 100.0),
            moderate: finite_or_zero(probabilities[1] * 100.0),
            high: finite_or_zero(probabilities[2] * 100.0),
        };

        Self {
            risk_level,
            confidence: probabilities.for_level(risk_level),
            probabilities,
            bmi: finite_or_zero(bmi),
            model_used: variant.label().to_string(),
            lab_available: variant == ModelVariant::Full,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_index_mapping() {
        assert_eq!(RiskLevel::from_class_index(0), Some(RiskLevel::Low));
        assert_eq!(RiskLevel::from_class_index(1), Some(RiskLevel::Moderate));
        assert_eq!(RiskLevel::from_class_index(2), Some(RiskLevel::High));
        assert_eq!(RiskLevel::from_class_index(3), None);
    }

    #[test]
    fn test_confidence_matches_predicted_class() {
        let result = AssessmentResult::from_classification(
            RiskLevel::Moderate,
            [0.2, 0.5, 0.3],
            23.4,
            ModelVariant::Full,
        );

        assert!((result.confidence - 50.0).abs() < 1e-9);
        assert!((result.probabilities.sum() - 100.0).abs() < 0.5);
        assert_eq!(result.model_used, "Full Model (5 features)");
        assert!(result.lab_available);
    }

    #[test]
    fn test_non_finite_values_coerced_to_zero() {
        let result = AssessmentResult::from_classification(
            RiskLevel::Low,
            [f64::NAN, 0.5, f64::INFINITY],
            f64::NAN,
            ModelVariant::Basic,
        );

        assert_eq!(result.probabilities.low, 0.0);
        assert_eq!(result.probabilities.high, 0.0);
        assert_eq!(result.bmi, 0.0);
        assert_eq!(result.confidence, 0.0);
        assert!(!result.lab_available);
    }
}
