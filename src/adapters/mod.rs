//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integrations:
//! - `softmax`: the pre-trained scaler + multinomial-logistic model exports
//! - `csv_store`: flat-file CSV history store
//! - `text_report`: plain-text report renderer
//! - `sanitize`: PII filtering for logs

pub mod csv_store;
pub mod sanitize;
pub mod softmax;
pub mod text_report;

// Re-export adapter errors for lib.rs
pub use csv_store::StoreError;
pub use text_report::RenderError;
