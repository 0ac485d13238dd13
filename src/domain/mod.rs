//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no external collaborators.
//! All types are serializable and implement strict validation.

mod assessment;
mod measurement;
mod record;
pub mod report;

pub use assessment::{AssessmentResult, ClassProbabilities, ModelVariant, RiskLevel};
pub use measurement::MeasurementInput;
pub use record::{AssessmentRecord, NOT_AVAILABLE};
