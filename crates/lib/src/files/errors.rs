//! Error types for the file record store
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("File not found: {reference}")]
    FileNotFound { reference: String },

    /// Requester does not own the file
    #[error("Not the owner of file {file_id}")]
    Forbidden { file_id: String },

    #[error("Upload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("Declared size {declared} does not match payload length {actual}")]
    SizeMismatch { declared: u64, actual: u64 },

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },
}

impl FileError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FileError::FileNotFound { .. })
    }

    pub fn is_forbidden(&self) -> bool {
        matches!(self, FileError::Forbidden { .. })
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            FileError::SizeMismatch { .. } | FileError::MissingField { .. }
        )
    }
}

impl From<FileError> for crate::Error {
    fn from(err: FileError) -> Self {
        crate::Error::File(err)
    }
}
