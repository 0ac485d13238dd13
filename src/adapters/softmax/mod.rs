//! Softmax adapter: Implementation of Classifier from model exports.
//!
//! The two pre-trained classifiers arrive as JSON exports produced by the
//! training pipeline, one per variant. Each export bundles a standard scaler
//! (mean, scale) with multinomial logistic-regression parameters
//! (coefficients, intercepts) over the variant's feature set.
//!
//! Inference is a pure function: z-score scaling, linear logits, numerically
//! stable softmax, argmax. No model state is mutated between invocations.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::{ModelVariant, RiskLevel};
use crate::ports::{Classification, Classifier, ClassifierError};

/// Number of risk classes. Class indices {0,1,2} align to {Low,Moderate,High}
/// by the external training contract.
const NUM_CLASSES: usize = 3;

/// Model parameters exported by the training pipeline.
///
/// This matches the JSON structure of `models/model_full.json` and
/// `models/model_basic.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportedModel {
    pub feature_names: Vec<String>,
    /// Class labels in index order; checked against the training contract
    /// when present.
    #[serde(default)]
    pub classes: Vec<String>,
    pub scaler_mean: Vec<f64>,
    pub scaler_scale: Vec<f64>,
    /// One coefficient row per class, each of feature arity
    pub coefficients: Vec<Vec<f64>>,
    pub intercepts: Vec<f64>,
}

impl ExportedModel {
    /// Feature arity this export was trained on.
    #[must_use]
    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Sanity-check parameter dimensions against each other.
    fn validate(&self) -> Result<(), ClassifierError> {
        let n = self.feature_count();
        if n == 0 {
            return Err(ClassifierError::ModelFormat(
                "Model export has no features".into(),
            ));
        }
        if self.scaler_mean.len() != n || self.scaler_scale.len() != n {
            return Err(ClassifierError::ModelFormat(format!(
                "Scaler parameter lengths do not match {n} features"
            )));
        }
        if self.scaler_scale.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(ClassifierError::ModelFormat(
                "Scaler scale values must be positive".into(),
            ));
        }
        if self.coefficients.len() != NUM_CLASSES || self.intercepts.len() != NUM_CLASSES {
            return Err(ClassifierError::ModelFormat(format!(
                "Expected {NUM_CLASSES} coefficient rows and intercepts"
            )));
        }
        if self.coefficients.iter().any(|row| row.len() != n) {
            return Err(ClassifierError::ModelFormat(format!(
                "Coefficient row length does not match {n} features"
            )));
        }
        if !self.classes.is_empty() {
            let expected: Vec<String> = RiskLevel::ALL.iter().map(ToString::to_string).collect();
            if self.classes != expected {
                return Err(ClassifierError::ModelFormat(format!(
                    "Class order {:?} does not match the training contract {:?}",
                    self.classes, expected
                )));
            }
        }
        Ok(())
    }

    /// Scaled logits -> softmax probabilities for one feature vector.
    fn predict(&self, features: &[f64]) -> Result<(usize, [f64; NUM_CLASSES]), ClassifierError> {
        let scaled: Vec<f64> = features
            .iter()
            .zip(self.scaler_mean.iter().zip(self.scaler_scale.iter()))
            .map(|(x, (mean, scale))| (x - mean) / scale)
            .collect();

        let mut logits = [0.0f64; NUM_CLASSES];
        for (class, row) in self.coefficients.iter().enumerate() {
            let dot: f64 = row.iter().zip(scaled.iter()).map(|(w, x)| w * x).sum();
            logits[class] = self.intercepts[class] + dot;
        }

        if logits.iter().any(|l| !l.is_finite()) {
            return Err(ClassifierError::Inference(
                "Non-finite logit produced by model parameters".into(),
            ));
        }

        // Stable softmax: shift by the max logit before exponentiating.
        let max_logit = logits.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
        let mut probabilities = [0.0f64; NUM_CLASSES];
        let mut denom = 0.0;
        for (p, l) in probabilities.iter_mut().zip(logits.iter()) {
            *p = (l - max_logit).exp();
            denom += *p;
        }
        for p in &mut probabilities {
            *p /= denom;
        }

        let predicted = probabilities
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(i, _)| i)
            .unwrap_or_default();

        Ok((predicted, probabilities))
    }
}

/// Classifier adapter wrapping the two variant exports.
#[derive(Debug)]
pub struct SoftmaxClassifier {
    full: ExportedModel,
    basic: ExportedModel,
}

impl SoftmaxClassifier {
    /// Build an adapter from already-loaded exports.
    ///
    /// # Errors
    /// Returns error if either export fails its dimension sanity checks.
    pub fn new(full: ExportedModel, basic: ExportedModel) -> Result<Self, ClassifierError> {
        full.validate()?;
        basic.validate()?;

        if full.feature_count() != ModelVariant::Full.feature_count() {
            return Err(ClassifierError::ModelFormat(format!(
                "Full model export has {} features, expected {}",
                full.feature_count(),
                ModelVariant::Full.feature_count()
            )));
        }
        if basic.feature_count() != ModelVariant::Basic.feature_count() {
            return Err(ClassifierError::ModelFormat(format!(
                "Basic model export has {} features, expected {}",
                basic.feature_count(),
                ModelVariant::Basic.feature_count()
            )));
        }

        Ok(Self { full, basic })
    }

    /// Load both variant exports from a model directory.
    ///
    /// Expects `model_full.json` and `model_basic.json` under `model_dir`.
    ///
    /// # Errors
    /// Returns error if an export is missing, unparseable, or fails its
    /// sanity checks.
    pub fn load(model_dir: &Path) -> Result<Self, ClassifierError> {
        let full = Self::load_export(&model_dir.join("model_full.json"))?;
        let basic = Self::load_export(&model_dir.join("model_basic.json"))?;

        tracing::info!(
            "Loaded classifier exports from {:?} (full: {} features, basic: {} features)",
            model_dir,
            full.feature_count(),
            basic.feature_count()
        );

        Self::new(full, basic)
    }

    fn load_export(path: &Path) -> Result<ExportedModel, ClassifierError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ClassifierError::ModelFormat(format!("Failed to read {path:?}: {e}"))
        })?;
        serde_json::from_str(&content)
            .map_err(|e| ClassifierError::ModelFormat(format!("Invalid export {path:?}: {e}")))
    }

    fn export_for(&self, variant: ModelVariant) -> &ExportedModel {
        match variant {
            ModelVariant::Full => &self.full,
            ModelVariant::Basic => &self.basic,
        }
    }
}

impl Classifier for SoftmaxClassifier {
    fn classify(
        &self,
        features: &[f64],
        variant: ModelVariant,
    ) -> Result<Classification, ClassifierError> {
        let export = self.export_for(variant);

        if features.len() != export.feature_count() {
            return Err(ClassifierError::FeatureShape {
                variant,
                expected: export.feature_count(),
                got: features.len(),
            });
        }
        if features.iter().any(|f| !f.is_finite()) {
            return Err(ClassifierError::Inference(
                "Feature vector contains a non-finite value".into(),
            ));
        }

        let (class_index, probabilities) = export.predict(features)?;
        let risk_level = RiskLevel::from_class_index(class_index).ok_or_else(|| {
            ClassifierError::Inference(format!("Class index {class_index} out of range"))
        })?;

        tracing::debug!(
            "Classified with {:?}: {} ({:.1}%)",
            variant,
            risk_level,
            probabilities[class_index] * 100.0
        );

        Ok(Classification {
            risk_level,
            probabilities,
        })
    }
}


#[cfg(test)]
mod tests {
    use super::testing::{test_basic_model, test_classifier, test_full_model};
    use super::*;

    #[test]
    fn test_probabilities_are_a_distribution() {
        let classifier = test_classifier();
        let result = classifier
            .classify(&[23.4, 118.0, 5.2, 11.8, 76.0], ModelVariant::Full)
            .expect("Should classify");

        let sum: f64 = result.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
        assert!(result.probabilities.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_healthy_profile_classifies_low() {
        let classifier = test_classifier();
        let result = classifier
            .classify(&[22.0, 110.0, 5.0, 12.0, 70.0], ModelVariant::Full)
            .expect("Should classify");
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_risky_profile_classifies_high() {
        let classifier = test_classifier();
        let result = classifier
            .classify(&[35.0, 160.0, 9.0, 8.5, 100.0], ModelVariant::Full)
            .expect("Should classify");
        assert_eq!(result.risk_level, RiskLevel::High);

        let basic = classifier
            .classify(&[35.0, 160.0, 100.0], ModelVariant::Basic)
            .expect("Should classify");
        assert_eq!(basic.risk_level, RiskLevel::High);
    }

    #[test]
    fn test_feature_shape_mismatch_is_rejected() {
        let classifier = test_classifier();
        let err = classifier
            .classify(&[23.4, 118.0, 76.0], ModelVariant::Full)
            .expect_err("Should reject 3 features for the full variant");

        match err {
            ClassifierError::FeatureShape { expected, got, .. } => {
                assert_eq!(expected, 5);
                assert_eq!(got, 3);
            }
            other => panic!("Unexpected error: {other}"),
        }
    }

    #[test]
    fn test_misaligned_class_order_is_rejected() {
        let mut full = test_full_model();
        full.classes = ["High", "Moderate", "Low"].map(String::from).to_vec();
        let err = SoftmaxClassifier::new(full, test_basic_model())
            .expect_err("Should reject misaligned classes");
        assert!(matches!(err, ClassifierError::ModelFormat(_)));
    }

    #[test]
    fn test_shipped_exports_load_and_validate() {
        let model_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("models");
        let classifier = SoftmaxClassifier::load(&model_dir).expect("Shipped exports should load");

        let result = classifier
            .classify(&[23.4, 118.0, 5.2, 11.8, 76.0], ModelVariant::Full)
            .expect("Should classify");
        let sum: f64 = result.probabilities.iter().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }
}
