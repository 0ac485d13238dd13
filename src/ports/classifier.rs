//! Classifier port: Trait for the pre-trained risk classifiers.
//!
//! The classifiers themselves are opaque collaborators; this trait captures
//! the one capability the engine depends on: given a numeric feature vector,
//! return a class index and a probability distribution over the three classes.

use crate::domain::{ModelVariant, RiskLevel};

/// Errors that can occur during classification.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClassifierError {
    #[error("Feature count mismatch for {variant:?}: expected {expected}, got {got}")]
    FeatureShape {
        variant: ModelVariant,
        expected: usize,
        got: usize,
    },

    #[error("Invalid model export: {0}")]
    ModelFormat(String),

    #[error("Model inference failed: {0}")]
    Inference(String),
}

/// Raw classifier output before normalization.
#[derive(Debug, Clone, Copy)]
pub struct Classification {
    /// Predicted risk level (class indices {0,1,2} map to {Low,Moderate,High};
    /// this alignment is part of the external training contract)
    pub risk_level: RiskLevel,

    /// Per-class probabilities on the 0-1 scale, aligned to {Low,Moderate,High}
    pub probabilities: [f64; 3],
}

/// Trait for the pre-trained classifier pair.
///
/// Implementations are pure functions over already-loaded model parameters;
/// no state is mutated between invocations. A failed call must not return
/// a partial result.
pub trait Classifier: Send + Sync {
    /// Classify a feature vector with the chosen variant.
    ///
    /// # Errors
    /// Returns `ClassifierError::FeatureShape` if the feature count does not
    /// match the variant's trained arity, or `ClassifierError::Inference` if
    /// the underlying capability fails.
    fn classify(
        &self,
        features: &[f64],
        variant: ModelVariant,
    ) -> Result<Classification, ClassifierError>;
}
