//! Measurement input types for maternal risk screening.
//!
//! One `MeasurementInput` is created transiently per assessment request;
//! it is never persisted directly.

use serde::{Deserialize, Serialize};

use super::assessment::ModelVariant;

/// Raw clinical measurements entered by a health worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementInput {
    /// Age in years
    pub age: u32,

    /// Weight in kg (must be > 0)
    pub weight_kg: f64,

    /// Height in cm (must be > 0)
    pub height_cm: f64,

    /// Systolic blood pressure in mmHg
    pub systolic: f64,

    /// Diastolic blood pressure in mmHg
    pub diastolic: f64,

    /// Blood sugar in mmol/L (only honored when `lab_available`)
    pub blood_sugar: Option<f64>,

    /// Hemoglobin in g/dL (only honored when `lab_available`)
    pub hemoglobin: Option<f64>,

    /// Whether lab values were measured for this patient
    pub lab_available: bool,
}

impl MeasurementInput {
    /// Validate all measurements, collecting every violation.
    ///
    /// A height of 0 is rejected here so BMI never divides by zero.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.weight_kg.is_finite() && self.weight_kg > 0.0) {
            errors.push(format!("Weight {} kg must be positive", self.weight_kg));
        }
        if !(self.height_cm.is_finite() && self.height_cm > 0.0) {
            errors.push(format!("Height {} cm must be positive", self.height_cm));
        }
        if !(self.systolic.is_finite() && self.systolic >= 0.0) {
            errors.push(format!("Systolic BP {} must be non-negative", self.systolic));
        }
        if !(self.diastolic.is_finite() && self.diastolic >= 0.0) {
            errors.push(format!(
                "Diastolic BP {} must be non-negative",
                self.diastolic
            ));
        }

        if self.lab_available {
            match self.blood_sugar {
                Some(v) if v.is_finite() && v >= 0.0 => {}
                Some(v) => errors.push(format!("Blood sugar {v} must be non-negative")),
                None => errors.push("Blood sugar required when labs are available".to_string()),
            }
            match self.hemoglobin {
                Some(v) if v.is_finite() && v >= 0.0 => {}
                Some(v) => errors.push(format!("Hemoglobin {v} must be non-negative")),
                None => errors.push("Hemoglobin required when labs are available".to_string()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Body-mass index: weight / (height in meters)².
    ///
    /// Callers must `validate()` first; height is assumed positive here.
    #[must_use]
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        self.weight_kg / (height_m * height_m)
    }

    /// Which classifier variant this input can feed.
    ///
    /// Selection is binary: labs are either fully honored or fully ignored.
    #[must_use]
    pub fn variant(&self) -> ModelVariant {
        if self.lab_available {
            ModelVariant::Full
        } else {
            ModelVariant::Basic
        }
    }

    /// Build the model-ready feature vector for this input's variant.
    ///
    /// Order matches the exported models:
    /// - Full: BMI, SystolicBP, BloodSugar, Hemoglobin, DiastolicBP
    /// - Basic: BMI, SystolicBP, DiastolicBP
    ///
    /// # Errors
    /// Returns validation errors if the input is invalid.
    pub fn feature_vector(&self) -> Result<Vec<f64>, Vec<String>> {
        self.validate()?;

        let bmi = self.bmi();
        let features = match self.variant() {
            ModelVariant::Full => vec![
                bmi,
                self.systolic,
                self.blood_sugar.unwrap_or_default(),
                self.hemoglobin.unwrap_or_default(),
                self.diastolic,
            ],
            ModelVariant::Basic => vec![bmi, self.systolic, self.diastolic],
        };

        debug_assert_eq!(features.len(), self.variant().feature_count());
        Ok(features)
    }
}
