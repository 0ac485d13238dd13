//! Ports layer: Trait definitions for external collaborators.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and external systems (the pre-trained
//! classifiers, the history store, the document renderer).

mod classifier;
mod history;
mod renderer;

pub use classifier::{Classification, Classifier, ClassifierError};
pub use history::HistoryStore;
pub use renderer::ReportRenderer;
