//! Session management
//!
//! A session maps an opaque token (stored in the `sessionId` cookie) to the
//! [`Identity`] of the user who logged in. Sessions expire a fixed 24 hours
//! after creation; activity does not extend them.
//!
//! Request handling talks to sessions through the [`SessionStore`] trait so the
//! backing storage can be swapped. [`MemorySessionStore`] keeps them in
//! process memory; sessions are lost on restart.

mod memory;

use async_trait::async_trait;
use thiserror::Error;

use crate::Result;
use crate::user::Identity;

pub use memory::MemorySessionStore;

/// Session token (UUID stored in cookie)
pub type SessionToken = String;

/// A live session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: SessionToken,
    pub identity: Identity,
    /// Creation time, milliseconds since Unix epoch
    pub created_at: i64,
    /// Absolute expiry, milliseconds since Unix epoch
    pub expires_at: i64,
}

impl Session {
    pub fn is_expired(&self, now_millis: i64) -> bool {
        now_millis >= self.expires_at
    }
}

/// Create, resolve and destroy sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Start a session for `identity` and return it, token included.
    async fn create(&self, identity: Identity) -> Result<Session>;

    /// Identity behind `token`, or `None` if the token is unknown or expired.
    async fn resolve(&self, token: &str) -> Result<Option<Identity>>;

    /// Remove a session. Removing an unknown token is not an error.
    async fn destroy(&self, token: &str) -> Result<()>;

    /// Drop every expired session, returning how many were removed.
    async fn purge_expired(&self) -> Result<usize>;

    /// Number of sessions currently held, expired or not.
    async fn count(&self) -> Result<usize>;
}

#[derive(Error, Debug)]
pub enum SessionError {
    /// The backing session storage failed.
    #[error("Session storage failed: {reason}")]
    StorageFailed { reason: String },
}

impl SessionError {
    pub fn is_store_failure(&self) -> bool {
        matches!(self, SessionError::StorageFailed { .. })
    }
}

impl From<SessionError> for crate::Error {
    fn from(err: SessionError) -> Self {
        crate::Error::Session(err)
    }
}
