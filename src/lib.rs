//! # Materna
//!
//! Maternal risk assessment engine for community health workers.
//!
//! This crate provides:
//! - A screening pipeline turning vital-sign measurements into a risk classification
//! - An append-only assessment history with deterministic patient identifiers
//! - Dashboard analytics (trends, risk-factor prevalence) derived from that history
//! - Report content rules consumed by an external document renderer
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (measurements, assessments, records, report rules)
//! - `ports`: Trait definitions for external collaborators (classifier, storage, renderer)
//! - `adapters`: Concrete implementations (softmax model exports, CSV store, text renderer)
//! - `application`: Use cases orchestrating domain and ports

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use domain::{AssessmentRecord, AssessmentResult, MeasurementInput, ModelVariant, RiskLevel};

/// Result type for Materna operations
pub type Result<T> = std::result::Result<T, MaternaError>;

/// Main error type for Materna
#[derive(Debug, thiserror::Error)]
pub enum MaternaError {
    #[error("Invalid measurement input: {0}")]
    Validation(String),

    #[error("Classification failed: {0}")]
    Classifier(#[from] ports::ClassifierError),

    #[error("History store operation failed: {0}")]
    Store(#[from] adapters::StoreError),

    #[error("Report rendering failed: {0}")]
    Render(#[from] adapters::RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
