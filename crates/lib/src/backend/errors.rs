//! Error types for the filedesk backends.
//!
//! Structured errors for storage operations, so callers can tell a constraint
//! violation apart from an unreachable or failing store.

use thiserror::Error;

/// Errors that can occur during storage operations.
///
/// # Stability
///
/// - New variants may be added in minor versions (enum is `#[non_exhaustive]`)
/// - Helper methods like `is_*()` provide stable APIs
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum BackendError {
    /// A user with this email already exists.
    #[error("Email already registered: {email}")]
    DuplicateEmail {
        /// The email that collided
        email: String,
    },

    /// A file with this composite id already exists.
    #[error("File id already in use: {file_id}")]
    DuplicateFileId {
        /// The composite file id that collided
        file_id: String,
    },

    /// A stored row could not be turned back into a record.
    #[error("Corrupt record in {table}: {reason}")]
    CorruptRecord {
        /// Table or collection the record came from
        table: &'static str,
        /// Description of what failed to decode
        reason: String,
    },

    /// An in-process lock was poisoned by a panicking writer.
    #[error("Storage lock poisoned")]
    LockPoisoned,

    /// Serialization failed.
    #[error("Serialization failed")]
    SerializationFailed {
        /// The underlying serialization error
        #[source]
        source: serde_json::Error,
    },

    /// Deserialization failed.
    #[error("Deserialization failed")]
    DeserializationFailed {
        /// The underlying deserialization error
        #[source]
        source: serde_json::Error,
    },

    /// File I/O error.
    #[error("File I/O error")]
    FileIo {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// SQL database error from sqlx.
    #[cfg(any(feature = "sqlite", feature = "postgres"))]
    #[error("SQL error: {reason}")]
    SqlxError {
        /// Description of the failed operation
        reason: String,
        /// The underlying sqlx error, when there is one
        #[source]
        source: Option<sqlx::Error>,
    },
}

impl BackendError {
    /// Check if this error is a uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            BackendError::DuplicateEmail { .. } | BackendError::DuplicateFileId { .. }
        )
    }

    /// Check if this error means the store itself failed (unreachable, I/O,
    /// undecodable data).
    pub fn is_store_failure(&self) -> bool {
        !self.is_conflict()
    }

    /// Check if this error is related to I/O operations.
    pub fn is_io_error(&self) -> bool {
        matches!(
            self,
            BackendError::FileIo { .. }
                | BackendError::SerializationFailed { .. }
                | BackendError::DeserializationFailed { .. }
        )
    }
}

// Conversion from BackendError to the main Error type
impl From<BackendError> for crate::Error {
    fn from(err: BackendError) -> Self {
        crate::Error::Backend(err)
    }
}
