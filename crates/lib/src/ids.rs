//! Sequential identifiers for users and files.
//!
//! Users get a globally monotonic `user_id`; files get a `sequential_id` that is
//! monotonic per owner. A file's external handle, [`FileId`], is the owner's
//! internal id and the per-owner sequence joined by [`FILE_ID_SEPARATOR`].
//!
//! Allocation goes through [`Backend::next_sequence`], an atomic increment, so
//! two concurrent creations can never observe the same value. Values are
//! positive, strictly increasing in allocation order, and never reused after a
//! record is deleted.

use std::{fmt, str::FromStr, sync::Arc};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;
use crate::backend::Backend;
use crate::constants::{FILE_ID_SEPARATOR, FILE_SEQUENCE_PREFIX, USER_SEQUENCE};

/// A counter scope handed to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sequence {
    /// The global user id counter.
    Users,
    /// The file counter of a single owner.
    Files(Uuid),
}

impl Sequence {
    /// Storage key for this counter.
    pub fn scope(&self) -> String {
        match self {
            Sequence::Users => USER_SEQUENCE.to_string(),
            Sequence::Files(owner) => format!("{FILE_SEQUENCE_PREFIX}{owner}"),
        }
    }
}

/// Hands out user and per-owner file sequence numbers.
#[derive(Clone)]
pub struct IdAllocator {
    backend: Arc<dyn Backend>,
}

impl IdAllocator {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self { backend }
    }

    /// Next value of the given counter.
    pub async fn next(&self, sequence: Sequence) -> Result<i64> {
        self.backend.next_sequence(&sequence.scope()).await
    }

    /// Next globally unique user id.
    pub async fn next_user_id(&self) -> Result<i64> {
        self.next(Sequence::Users).await
    }

    /// Next per-owner file sequence number for `owner`.
    pub async fn next_file_id(&self, owner: Uuid) -> Result<i64> {
        self.next(Sequence::Files(owner)).await
    }
}

/// Composite external file handle: `<owner id>_<sequential id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct FileId {
    owner: Uuid,
    sequence: i64,
}

impl FileId {
    pub fn new(owner: Uuid, sequence: i64) -> Self {
        Self { owner, sequence }
    }

    /// Internal id of the owning user.
    pub fn owner(&self) -> Uuid {
        self.owner
    }

    /// Per-owner sequential id.
    pub fn sequence(&self) -> i64 {
        self.sequence
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.owner, FILE_ID_SEPARATOR, self.sequence)
    }
}

/// A string that is not a valid composite file id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid file id: {value}")]
pub struct ParseFileIdError {
    pub value: String,
}

impl FromStr for FileId {
    type Err = ParseFileIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || ParseFileIdError {
            value: s.to_string(),
        };
        let (owner, sequence) = s.rsplit_once(FILE_ID_SEPARATOR).ok_or_else(invalid)?;
        let owner = Uuid::parse_str(owner).map_err(|_| invalid())?;
        let sequence: i64 = sequence.parse().map_err(|_| invalid())?;
        if sequence < 1 {
            return Err(invalid());
        }
        Ok(Self { owner, sequence })
    }
}

impl From<FileId> for String {
    fn from(id: FileId) -> Self {
        id.to_string()
    }
}

impl TryFrom<String> for FileId {
    type Error = ParseFileIdError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

/// A reference to a file as it appears in a URL or form: either the store's
/// internal id or the composite [`FileId`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileRef {
    Internal(Uuid),
    Composite(FileId),
}

impl fmt::Display for FileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileRef::Internal(id) => write!(f, "{id}"),
            FileRef::Composite(id) => write!(f, "{id}"),
        }
    }
}

impl FromStr for FileRef {
    type Err = ParseFileIdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if let Ok(id) = Uuid::parse_str(s) {
            return Ok(FileRef::Internal(id));
        }
        s.parse().map(FileRef::Composite)
    }
}

impl From<FileId> for FileRef {
    fn from(id: FileId) -> Self {
        FileRef::Composite(id)
    }
}

impl From<Uuid> for FileRef {
    fn from(id: Uuid) -> Self {
        FileRef::Internal(id)
    }
}
