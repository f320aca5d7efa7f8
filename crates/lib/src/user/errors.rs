//! Error types for the user system
use thiserror::Error;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("User not found: {reference}")]
    UserNotFound { reference: String },

    #[error("Email already registered: {email}")]
    EmailAlreadyRegistered { email: String },

    #[error("Passwords do not match")]
    PasswordMismatch,

    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("Invalid role: {role}")]
    InvalidRole { role: String },

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password verification failed")]
    PasswordVerificationFailed,

    #[error("Password hashing failed: {reason}")]
    HashingFailed { reason: String },
}

impl UserError {
    /// Check if this error indicates a user was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, UserError::UserNotFound { .. })
    }

    /// Check if this error indicates rejected registration input.
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            UserError::EmailAlreadyRegistered { .. }
                | UserError::PasswordMismatch
                | UserError::MissingField { .. }
                | UserError::InvalidRole { .. }
        )
    }
}

impl From<UserError> for crate::Error {
    fn from(err: UserError) -> Self {
        crate::Error::User(err)
    }
}
