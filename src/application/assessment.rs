//! Assessment pipeline: Orchestrates one screening.
//!
//! Validates raw measurements, computes derived features, selects the
//! classifier variant from lab availability, and normalizes the classifier
//! output into a stable result contract. Committing a result to history is
//! a separate, explicit step; this service has no persistence side effect.

use std::sync::Arc;

use crate::domain::{AssessmentResult, MeasurementInput};
use crate::ports::Classifier;
use crate::{MaternaError, Result};

/// Service for running one risk assessment.
pub struct AssessmentService<C>
where
    C: Classifier,
{
    classifier: Arc<C>,
}

impl<C> AssessmentService<C>
where
    C: Classifier,
{
    /// Create a new assessment service.
    pub fn new(classifier: Arc<C>) -> Self {
        Self { classifier }
    }

    /// Assess maternal risk from raw measurements.
    ///
    /// Performs the full pipeline:
    /// 1. Validate input (a zero height is rejected here, not divided by)
    /// 2. Compute BMI and build the variant's feature vector
    /// 3. Invoke the classifier
    /// 4. Normalize probabilities to 0-100 and coerce non-finite values to 0.0
    ///
    /// # Errors
    /// Returns `MaternaError::Validation` for bad input and
    /// `MaternaError::Classifier` when the underlying capability fails.
    /// A failed call carries no partial result.
    pub fn assess(&self, input: &MeasurementInput) -> Result<AssessmentResult> {
        let features = input
            .feature_vector()
            .map_err(|errors| MaternaError::Validation(errors.join("; ")))?;
        let variant = input.variant();

        tracing::debug!(
            "Scoring {} features with {:?}",
            features.len(),
            variant
        );

        let classification = self.classifier.classify(&features, variant)?;
        let result = AssessmentResult::from_classification(
            classification.risk_level,
            classification.probabilities,
            input.bmi(),
            variant,
        );

        tracing::info!(
            "Assessment complete: {} ({:.1}%) via {}",
            result.risk_level,
            result.confidence,
            result.model_used
        );

        Ok(result)
    }
}
