//! Engine facade: The single entry point consumers call.
//!
//! Wires the assessment service, history store, analytics and renderer
//! behind one typed surface. Commit and report operations take the
//! assessment result explicitly; the engine holds no per-patient session
//! state between calls.

use std::sync::Arc;

use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::adapters::{RenderError, StoreError};
use crate::application::analytics::{AnalyticsService, DashboardStats};
use crate::application::assessment::AssessmentService;
use crate::application::{identity, report};
use crate::domain::{AssessmentRecord, AssessmentResult, MeasurementInput};
use crate::ports::{Classifier, HistoryStore, ReportRenderer};
use crate::{MaternaError, Result};

/// A request to commit an assessment to the history.
///
/// The result being committed is passed explicitly by the caller; unknown
/// fields are rejected so a malformed client payload fails loudly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SaveRequest {
    pub patient_id: Option<String>,
    pub health_worker: Option<String>,
    pub age: u32,
    pub systolic: f64,
    pub diastolic: f64,
    pub blood_sugar: Option<f64>,
    pub hemoglobin: Option<f64>,
    pub result: AssessmentResult,
}

impl SaveRequest {
    fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !(self.systolic.is_finite() && self.systolic >= 0.0) {
            errors.push(format!("Systolic BP {} must be non-negative", self.systolic));
        }
        if !(self.diastolic.is_finite() && self.diastolic >= 0.0) {
            errors.push(format!(
                "Diastolic BP {} must be non-negative",
                self.diastolic
            ));
        }

        if self.result.lab_available {
            match self.blood_sugar {
                Some(v) if v.is_finite() && v >= 0.0 => {}
                Some(v) => errors.push(format!("Blood sugar {v} must be non-negative")),
                None => errors.push("Blood sugar required for a full-model result".to_string()),
            }
            match self.hemoglobin {
                Some(v) if v.is_finite() && v >= 0.0 => {}
                Some(v) => errors.push(format!("Hemoglobin {v} must be non-negative")),
                None => errors.push("Hemoglobin required for a full-model result".to_string()),
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Outcome of a commit attempt. Never an Err at the facade boundary.
#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome {
    pub success: bool,
    /// Identifier as recorded, `N/A` normalization applied
    pub patient_id: Option<String>,
    pub error: Option<String>,
}

/// Outcome of identifier allocation.
///
/// Always carries a usable identifier: when the history cannot be read,
/// `success` is false, `patient_id` is the first-of-year fallback and
/// `error` explains the degradation.
#[derive(Debug, Clone, Serialize)]
pub struct PatientIdOutcome {
    pub success: bool,
    pub patient_id: String,
    pub error: Option<String>,
}

/// A request to produce a printable report for an assessment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportRequest {
    pub result: AssessmentResult,
    pub input: MeasurementInput,
    pub patient_id: Option<String>,
    pub health_worker: Option<String>,
}

/// Outcome of report generation.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub success: bool,
    pub filename: Option<String>,
    pub error: Option<String>,
}

/// Facade over the whole assessment engine.
pub struct Engine<C, S, R>
where
    C: Classifier,
    S: HistoryStore,
    R: ReportRenderer,
    S::Error: Into<StoreError>,
    R::Error: Into<RenderError>,
{
    assessment: AssessmentService<C>,
    analytics: AnalyticsService<S>,
    store: Arc<S>,
    renderer: R,
}

impl<C, S, R> Engine<C, S, R>
where
    C: Classifier,
    S: HistoryStore,
    R: ReportRenderer,
    S::Error: Into<StoreError>,
    R::Error: Into<RenderError>,
{
    /// Wire an engine from its collaborators.
    pub fn new(classifier: Arc<C>, store: Arc<S>, renderer: R) -> Self {
        Self {
            assessment: AssessmentService::new(classifier),
            analytics: AnalyticsService::new(Arc::clone(&store)),
            store,
            renderer,
        }
    }

    /// Run one risk assessment. The result is transient until committed
    /// with [`Engine::save_assessment`].
    ///
    /// # Errors
    /// Returns `MaternaError::Validation` for bad measurements and
    /// `MaternaError::Classifier` for model failures.
    pub fn assess_risk(&self, input: &MeasurementInput) -> Result<AssessmentResult> {
        self.assessment.assess(input)
    }

    /// Allocate the next year-scoped patient identifier.
    #[must_use]
    pub fn generate_patient_id(&self) -> PatientIdOutcome {
        let now = Local::now().naive_local();
        match identity::allocate(self.store.as_ref(), now) {
            Ok(patient_id) => PatientIdOutcome {
                success: true,
                patient_id,
                error: None,
            },
            Err(message) => PatientIdOutcome {
                success: false,
                patient_id: identity::fallback_patient_id(now),
                error: Some(message),
            },
        }
    }

    /// Commit an assessment to the append-only history.
    ///
    /// Validation failures and write failures both surface as a failed
    /// outcome; a failed commit writes nothing.
    pub fn save_assessment(&self, request: &SaveRequest) -> SaveOutcome {
        if let Err(errors) = request.validate() {
            return SaveOutcome {
                success: false,
                patient_id: None,
                error: Some(errors.join("; ")),
            };
        }

        let record = AssessmentRecord::new(
            Local::now().naive_local(),
            request.patient_id.as_deref(),
            request.health_worker.as_deref(),
            request.age,
            request.systolic,
            request.diastolic,
            request.blood_sugar,
            request.hemoglobin,
            &request.result,
        );

        match self.store.append(&record) {
            Ok(()) => {
                tracing::info!("Committed assessment ({})", record.risk_level);
                SaveOutcome {
                    success: true,
                    patient_id: Some(record.patient_id),
                    error: None,
                }
            }
            Err(e) => {
                let e: StoreError = e.into();
                tracing::error!("Failed to commit assessment: {e}");
                SaveOutcome {
                    success: false,
                    patient_id: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Load the full history in insertion order.
    ///
    /// # Errors
    /// Propagates store failures; history reads are not degraded.
    pub fn load_history(&self) -> Result<Vec<AssessmentRecord>> {
        self.store
            .load_all()
            .map_err(|e| MaternaError::Store(e.into()))
    }

    /// Current dashboard statistics, recomputed from the history.
    #[must_use]
    pub fn dashboard_stats(&self) -> DashboardStats {
        self.analytics.dashboard(Local::now().naive_local())
    }

    /// Produce a printable report for an assessment.
    ///
    /// Content is resolved here (status labels, recommendations); the
    /// renderer only lays it out.
    pub fn generate_report(&self, request: &ReportRequest) -> ReportOutcome {
        let content = report::build_report_content(
            &request.result,
            &request.input,
            request.patient_id.as_deref(),
            request.health_worker.as_deref(),
            Local::now().naive_local(),
        );

        match self.renderer.render(&content) {
            Ok(path) => ReportOutcome {
                success: true,
                filename: Some(path.to_string_lossy().into_owned()),
                error: None,
            },
            Err(e) => {
                let e: RenderError = e.into();
                tracing::error!("Failed to render report: {e}");
                ReportOutcome {
                    success: false,
                    filename: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::csv_store::CsvHistoryStore;
    use crate::adapters::softmax::testing::test_classifier;
    use crate::adapters::softmax::SoftmaxClassifier;
    use crate::adapters::text_report::TextReportRenderer;
    use tempfile::{tempdir, TempDir};

    fn engine(dir: &TempDir) -> Engine<SoftmaxClassifier, CsvHistoryStore, TextReportRenderer> {
        Engine::new(
            Arc::new(test_classifier()),
            Arc::new(CsvHistoryStore::new(dir.path().join("history.csv"))),
            TextReportRenderer::new(dir.path().join("reports")),
        )
    }

    fn input() -> MeasurementInput {
        MeasurementInput {
            age: 28,
            weight_kg: 60.0,
            height_cm: 160.0,
            systolic: 118.0,
            diastolic: 76.0,
            blood_sugar: Some(5.2),
            hemoglobin: Some(11.8),
            lab_available: true,
        }
    }

    #[test]
    fn test_assess_then_save_then_load_roundtrip() {
        let dir = tempdir().expect("Should create tempdir");
        let engine = engine(&dir);

        let result = engine.assess_risk(&input()).expect("Should assess");
        let outcome = engine.save_assessment(&SaveRequest {
            patient_id: Some("P-2025-0001".to_string()),
            health_worker: Some("Amina".to_string()),
            age: 28,
            systolic: 118.0,
            diastolic: 76.0,
            blood_sugar: Some(5.2),
            hemoglobin: Some(11.8),
            result: result.clone(),
        });

        assert!(outcome.success, "{:?}", outcome.error);
        assert_eq!(outcome.patient_id.as_deref(), Some("P-2025-0001"));

        let history = engine.load_history().expect("Should load");
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].risk_level, result.risk_level);
        assert_eq!(history[0].blood_sugar, Some(5.2));
    }

    #[test]
    fn test_save_rejects_missing_labs_for_full_model_result() {
        let dir = tempdir().expect("Should create tempdir");
        let engine = engine(&dir);

        let result = engine.assess_risk(&input()).expect("Should assess");
        let outcome = engine.save_assessment(&SaveRequest {
            patient_id: None,
            health_worker: None,
            age: 28,
            systolic: 118.0,
            diastolic: 76.0,
            blood_sugar: None,
            hemoglobin: None,
            result,
        });

        assert!(!outcome.success);
        assert!(outcome.error.expect("Should explain").contains("required"));
        assert!(engine.load_history().expect("Should load").is_empty());
    }

    #[test]
    fn test_save_request_rejects_unknown_fields() {
        let payload = serde_json::json!({
            "patient_id": "P-2025-0001",
            "health_worker": "Amina",
            "age": 28,
            "systolic": 118.0,
            "diastolic": 76.0,
            "blood_sugar": 5.2,
            "hemoglobin": 11.8,
            "result": {
                "risk_level": "Low",
                "confidence": 90.0,
                "probabilities": {"low": 90.0, "moderate": 7.0, "high": 3.0},
                "bmi": 23.4,
                "model_used": "Full Model (5 features)",
                "lab_available": true
            },
            "surprise": true
        });

        let parsed: std::result::Result<SaveRequest, _> = serde_json::from_value(payload);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_generate_patient_id_scans_history() {
        let dir = tempdir().expect("Should create tempdir");
        let engine = engine(&dir);

        let first = engine.generate_patient_id();
        assert!(first.success);
        assert!(first.patient_id.ends_with("-0001"));

        let result = engine.assess_risk(&input()).expect("Should assess");
        let outcome = engine.save_assessment(&SaveRequest {
            patient_id: Some(first.patient_id.clone()),
            health_worker: None,
            age: 28,
            systolic: 118.0,
            diastolic: 76.0,
            blood_sugar: Some(5.2),
            hemoglobin: Some(11.8),
            result,
        });
        assert!(outcome.success, "{:?}", outcome.error);

        let second = engine.generate_patient_id();
        assert!(second.success);
        assert!(second.patient_id.ends_with("-0002"));
    }

    #[test]
    fn test_generate_report_writes_artifact() {
        let dir = tempdir().expect("Should create tempdir");
        let engine = engine(&dir);

        let result = engine.assess_risk(&input()).expect("Should assess");
        let outcome = engine.generate_report(&ReportRequest {
            result,
            input: input(),
            patient_id: Some("P-2025-0001".to_string()),
            health_worker: Some("Amina".to_string()),
        });

        assert!(outcome.success, "{:?}", outcome.error);
        let filename = outcome.filename.expect("Should name the artifact");
        assert!(filename.contains("maternal_risk_report_P-2025-0001_"));
        let text = std::fs::read_to_string(&filename).expect("Should read report");
        assert!(text.contains("RISK LEVEL:"));
    }

    #[test]
    fn test_dashboard_reflects_committed_assessments() {
        let dir = tempdir().expect("Should create tempdir");
        let engine = engine(&dir);

        assert_eq!(engine.dashboard_stats().total_assessments, 0);

        let result = engine.assess_risk(&input()).expect("Should assess");
        let outcome = engine.save_assessment(&SaveRequest {
            patient_id: Some("P-2025-0001".to_string()),
            health_worker: None,
            age: 28,
            systolic: 118.0,
            diastolic: 76.0,
            blood_sugar: Some(5.2),
            hemoglobin: Some(11.8),
            result,
        });
        assert!(outcome.success, "{:?}", outcome.error);

        let stats = engine.dashboard_stats();
        assert_eq!(stats.total_assessments, 1);
        assert_eq!(stats.last_7_days, 1);
    }
}
