//! History store port: Trait for the append-only assessment log.

use crate::domain::AssessmentRecord;

/// Trait for the persistent assessment history.
///
/// The store is append-only: no update or delete operation exists, and
/// `load_all` returns records in insertion order. A single writer at a time
/// is assumed; cross-process mutual exclusion is out of scope.
pub trait HistoryStore: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Append one record to durable storage, creating it on first write.
    ///
    /// # Errors
    /// Returns error if the record cannot be durably written.
    fn append(&self, record: &AssessmentRecord) -> Result<(), Self::Error>;

    /// Load every record in insertion order.
    ///
    /// A store that does not exist yet yields an empty sequence, not an
    /// error. A malformed row is a store-level error; rows are never
    /// silently dropped.
    ///
    /// # Errors
    /// Returns error if the store exists but cannot be parsed.
    fn load_all(&self) -> Result<Vec<AssessmentRecord>, Self::Error>;
}
