//! Application layer: Use cases orchestrating domain and ports.

pub mod analytics;
pub mod api;
pub mod assessment;
pub mod identity;
pub mod report;

pub use analytics::{AnalyticsService, DashboardStats};
pub use api::{Engine, PatientIdOutcome, ReportOutcome, ReportRequest, SaveOutcome, SaveRequest};
pub use assessment::AssessmentService;
