//! Backend implementations for filedesk storage
//!
//! This module provides the core `Backend` trait and its implementations.
//!
//! The `Backend` trait is the document store the rest of the library is written
//! against: user records, file records with their payloads, and named sequence
//! counters. Keeping it behind a trait lets the credential and file stores stay
//! independent of the storage mechanism.

use std::any::Any;

use async_trait::async_trait;
use uuid::Uuid;

use crate::Result;
use crate::files::{FileMeta, StoredFile};
use crate::ids::FileId;
use crate::user::User;

pub mod database;
pub mod errors;

pub use errors::BackendError;

/// Sort order for per-owner file listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileOrder {
    /// Most recent upload first (dashboard order).
    #[default]
    NewestFirst,
    /// Ascending per-owner sequential id (API order).
    Sequential,
}

/// Storage trait abstracting the underlying document store.
///
/// Implementations must provide per-record atomicity for single writes and an
/// atomic increment for [`Backend::next_sequence`]; nothing else in the library
/// relies on cross-record transactions.
///
/// All implementations must be `Send` and `Sync` to allow sharing across request
/// handlers, and implement `Any` to allow downcasting (e.g. to persist an
/// in-memory store on shutdown).
#[async_trait]
pub trait Backend: Send + Sync + Any {
    /// Atomically increments the named counter and returns the new value.
    ///
    /// The first call for a scope returns `1`. Values are never handed out twice,
    /// even when callers race.
    async fn next_sequence(&self, scope: &str) -> Result<i64>;

    /// Stores a new user record.
    ///
    /// Fails with [`BackendError::DuplicateEmail`] if a user with the same email
    /// already exists.
    async fn insert_user(&self, user: User) -> Result<()>;

    /// Looks up a user by its internal id.
    async fn get_user(&self, id: &Uuid) -> Result<Option<User>>;

    /// Looks up a user by exact (case-sensitive) email.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Returns all users ordered by ascending sequential `user_id`.
    async fn list_users(&self) -> Result<Vec<User>>;

    /// Removes a user record. Returns `false` if no such user existed.
    async fn delete_user(&self, id: &Uuid) -> Result<bool>;

    /// Number of stored users.
    async fn count_users(&self) -> Result<u64>;

    /// Stores a new file record with its payload.
    ///
    /// Fails with [`BackendError::DuplicateFileId`] if the composite id is taken.
    async fn insert_file(&self, file: StoredFile) -> Result<()>;

    /// Looks up a file (with payload) by internal id.
    async fn get_file(&self, id: &Uuid) -> Result<Option<StoredFile>>;

    /// Looks up a file (with payload) by composite file id.
    async fn find_file(&self, file_id: &FileId) -> Result<Option<StoredFile>>;

    /// Returns the metadata of every file owned by `owner`, in the given order.
    async fn list_files(&self, owner: &Uuid, order: FileOrder) -> Result<Vec<FileMeta>>;

    /// Replaces a file's display name. Returns `false` if no such file existed.
    async fn rename_file(&self, id: &Uuid, new_name: &str) -> Result<bool>;

    /// Removes a file record and its payload. Returns `false` if no such file existed.
    async fn delete_file(&self, id: &Uuid) -> Result<bool>;

    /// Removes every file owned by `owner`, returning how many were removed.
    async fn delete_files_by_owner(&self, owner: &Uuid) -> Result<u64>;

    /// Number of stored files.
    async fn count_files(&self) -> Result<u64>;

    /// Number of files owned by `owner`.
    async fn count_files_by_owner(&self, owner: &Uuid) -> Result<u64>;

    /// Short name of the storage engine, reported by the health endpoint.
    fn kind(&self) -> &'static str;

    /// Returns a reference to the backend as a `dyn Any` for downcasting.
    fn as_any(&self) -> &dyn Any;
}
