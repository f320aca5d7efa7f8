//! User system for filedesk
//!
//! Provides account storage with Argon2 password hashing, sequential user ids
//! and the identity snapshot carried by sessions.

pub mod crypto;
pub mod errors;
pub mod store;
pub mod types;

pub use errors::UserError;
pub use store::{CredentialStore, NewUser};
pub use types::*;
