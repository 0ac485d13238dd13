//! Renderer port: Trait for the external document renderer.
//!
//! The engine resolves report content fully (status labels, recommendation
//! text, probabilities); layout, pagination and typography belong to the
//! renderer behind this seam.

use std::path::PathBuf;

use crate::domain::report::ReportContent;

/// Trait for rendering a resolved report into a printable artifact.
pub trait ReportRenderer: Send + Sync {
    /// Error type for rendering operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Render the content and return the path of the produced artifact.
    ///
    /// # Errors
    /// Returns error if the artifact cannot be produced.
    fn render(&self, content: &ReportContent) -> Result<PathBuf, Self::Error>;
}
