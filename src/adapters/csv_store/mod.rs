//! CSV adapter: Implementation of HistoryStore.
//!
//! The history is one flat CSV file with a fixed 13-column header:
//! Timestamp, Patient_ID, Age, BMI, SystolicBP, DiastolicBP, Blood_Sugar,
//! Hemoglobin, Risk_Level, Confidence, Model_Used, Lab_Available,
//! Health_Worker. Appends grow the file in place; nothing is ever rewritten.
//!
//! Absent lab values are stored as an explicit `N/A` marker, never a numeric
//! 0, so analytics can distinguish "not measured" from "measured as 0".
//!
//! The store assumes a single writer at a time; cross-process append races
//! are out of scope.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use crate::domain::AssessmentRecord;
use crate::ports::HistoryStore;

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on history store: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed history content: {0}")]
    Malformed(#[from] csv::Error),
}

/// CSV-file history store adapter.
pub struct CsvHistoryStore {
    path: PathBuf,
}

impl CsvHistoryStore {
    /// Create a store backed by the given CSV path.
    ///
    /// The file is created lazily on first append.
    #[must_use]
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the underlying CSV file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for CsvHistoryStore {
    type Error = StoreError;

    fn append(&self, record: &AssessmentRecord) -> Result<(), Self::Error> {
        let is_new = !self.path.exists();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        // The header row is written exactly once, when the file is born.
        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;

        tracing::debug!(
            "Appended assessment for patient {} to {:?}",
            record.patient_id,
            self.path
        );
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<AssessmentRecord>, Self::Error> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::Reader::from_path(&self.path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            // A malformed row fails the whole load; rows are never dropped.
            let record: AssessmentRecord = row?;
            records.push(record);
        }
        Ok(records)
    }
}
