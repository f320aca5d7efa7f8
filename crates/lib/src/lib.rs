//!
//! filedesk: personal file storage behind a cookie session.
//! This library provides the core components used by the `filedesk` server.
//!
//! ## Core Concepts
//!
//! * **Backends (`backend::Backend`)**: A pluggable document store holding users, files
//!   and atomic sequence counters.
//! * **Credential Store (`user::CredentialStore`)**: Registration, login and admin
//!   management of user accounts.
//! * **Sessions (`session::SessionStore`)**: Server-held identity snapshots keyed by an
//!   opaque cookie token, expiring 24 hours after creation.
//! * **Authorization Gate (`auth`)**: The "authenticated" and "administrator" guards.
//! * **Sequential IDs (`ids::IdAllocator`)**: Monotonic user ids and per-owner file ids,
//!   combined into composite file identifiers.
//! * **File Record Store (`files::FileStore`)**: Ownership-checked file CRUD.

pub mod auth;
pub mod backend;
pub mod clock;
pub mod constants;
pub mod files;
pub mod ids;
pub mod session;
pub mod user;

pub use clock::{Clock, FixedClock, SystemClock};

/// Result type used throughout the filedesk library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the filedesk library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Structured storage errors from the backend module
    #[error(transparent)]
    Backend(backend::BackendError),

    /// Structured user errors from the user module
    #[error(transparent)]
    User(user::UserError),

    /// Structured session errors from the session module
    #[error(transparent)]
    Session(session::SessionError),

    /// Structured file errors from the files module
    #[error(transparent)]
    File(files::FileError),
}

impl Error {
    /// Get the originating module for this error.
    pub fn module(&self) -> &'static str {
        match self {
            Error::Backend(_) => "backend",
            Error::User(_) => "user",
            Error::Session(_) => "session",
            Error::File(_) => "files",
        }
    }

    /// Check if this error indicates a user or file was not found.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::User(err) => err.is_not_found(),
            Error::File(err) => err.is_not_found(),
            _ => false,
        }
    }

    /// Check if this error indicates an ownership or role mismatch.
    pub fn is_forbidden(&self) -> bool {
        match self {
            Error::File(err) => err.is_forbidden(),
            _ => false,
        }
    }

    /// Check if this error indicates rejected input (mismatched passwords,
    /// duplicate email, missing fields, bad identifiers).
    pub fn is_validation_error(&self) -> bool {
        match self {
            Error::User(err) => err.is_validation_error(),
            Error::File(err) => err.is_validation_error(),
            Error::Backend(err) => err.is_conflict(),
            _ => false,
        }
    }

    /// Check if this error indicates an upload over the size limit.
    pub fn is_payload_too_large(&self) -> bool {
        matches!(self, Error::File(files::FileError::PayloadTooLarge { .. }))
    }

    /// Check if this error indicates the credentials were rejected.
    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, Error::User(user::UserError::InvalidCredentials))
    }

    /// Check if this error came from the underlying store being unreachable or
    /// failing a write.
    pub fn is_store_failure(&self) -> bool {
        match self {
            Error::Backend(err) => err.is_store_failure(),
            Error::Session(err) => err.is_store_failure(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_follows_module_errors() {
        let err: Error = files::FileError::Forbidden {
            file_id: "a_1".to_string(),
        }
        .into();
        assert!(err.is_forbidden());
        assert!(!err.is_not_found());
        assert_eq!(err.module(), "files");

        let err: Error = user::UserError::EmailAlreadyRegistered {
            email: "alice@x.com".to_string(),
        }
        .into();
        assert!(err.is_validation_error());
        assert!(!err.is_store_failure());

        let err: Error = files::FileError::PayloadTooLarge {
            size: 11,
            limit: 10,
        }
        .into();
        assert!(err.is_payload_too_large());
    }
}
