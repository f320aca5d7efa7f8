//! In-memory database backend implementation
//!
//! This module provides an in-memory implementation of the [`Backend`] trait,
//! suitable for testing, development, or single-process deployments where the
//! whole state can be written to a JSON file on shutdown.

mod persistence;

use std::any::Any;
use std::collections::HashMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::Result;
use crate::backend::errors::BackendError;
use crate::backend::{Backend, FileOrder};
use crate::files::{FileMeta, StoredFile};
use crate::ids::FileId;
use crate::user::User;

/// Everything the backend holds, behind one lock so that multi-map updates
/// (e.g. a file and its composite-id index) stay consistent.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub(crate) struct State {
    pub(crate) users: HashMap<Uuid, User>,
    pub(crate) files: HashMap<Uuid, StoredFile>,
    /// Named counters for [`Backend::next_sequence`]
    pub(crate) sequences: HashMap<String, i64>,
}

impl State {
    fn file_by_composite(&self, file_id: &FileId) -> Option<&StoredFile> {
        self.files.values().find(|f| f.meta.file_id == *file_id)
    }
}

/// A simple in-memory database implementation using `HashMap`s for storage.
///
/// It provides basic persistence via `save_to_file` and `load_from_file`,
/// serializing the state to JSON.
#[derive(Debug, Default)]
pub struct InMemory {
    pub(crate) state: RwLock<State>,
}

impl InMemory {
    /// Creates a new, empty `InMemory` database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Saves the entire database state to a specified file as JSON.
    pub async fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        persistence::save_to_file(self, path).await
    }

    /// Loads the database state from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemory` database is returned.
    pub async fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        persistence::load_from_file(path).await
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| BackendError::LockPoisoned.into())
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| BackendError::LockPoisoned.into())
    }
}

#[async_trait]
impl Backend for InMemory {
    async fn next_sequence(&self, scope: &str) -> Result<i64> {
        let mut state = self.write()?;
        let value = state.sequences.entry(scope.to_string()).or_insert(0);
        *value += 1;
        Ok(*value)
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        let mut state = self.write()?;
        if state.users.values().any(|u| u.email == user.email) {
            return Err(BackendError::DuplicateEmail { email: user.email }.into());
        }
        state.users.insert(user.id, user);
        Ok(())
    }

    async fn get_user(&self, id: &Uuid) -> Result<Option<User>> {
        Ok(self.read()?.users.get(id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .read()?
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let mut users: Vec<User> = self.read()?.users.values().cloned().collect();
        users.sort_by_key(|u| u.user_id);
        Ok(users)
    }

    async fn delete_user(&self, id: &Uuid) -> Result<bool> {
        Ok(self.write()?.users.remove(id).is_some())
    }

    async fn count_users(&self) -> Result<u64> {
        Ok(self.read()?.users.len() as u64)
    }

    async fn insert_file(&self, file: StoredFile) -> Result<()> {
        let mut state = self.write()?;
        if state.file_by_composite(&file.meta.file_id).is_some() {
            return Err(BackendError::DuplicateFileId {
                file_id: file.meta.file_id.to_string(),
            }
            .into());
        }
        state.files.insert(file.meta.id, file);
        Ok(())
    }

    async fn get_file(&self, id: &Uuid) -> Result<Option<StoredFile>> {
        Ok(self.read()?.files.get(id).cloned())
    }

    async fn find_file(&self, file_id: &FileId) -> Result<Option<StoredFile>> {
        Ok(self.read()?.file_by_composite(file_id).cloned())
    }

    async fn list_files(&self, owner: &Uuid, order: FileOrder) -> Result<Vec<FileMeta>> {
        let mut files: Vec<FileMeta> = self
            .read()?
            .files
            .values()
            .filter(|f| f.meta.uploaded_by == *owner)
            .map(|f| f.meta.clone())
            .collect();
        match order {
            FileOrder::NewestFirst => files.sort_by(|a, b| {
                b.upload_date
                    .cmp(&a.upload_date)
                    .then(b.sequential_id.cmp(&a.sequential_id))
            }),
            FileOrder::Sequential => files.sort_by_key(|f| f.sequential_id),
        }
        Ok(files)
    }

    async fn rename_file(&self, id: &Uuid, new_name: &str) -> Result<bool> {
        let mut state = self.write()?;
        match state.files.get_mut(id) {
            Some(file) => {
                file.meta.original_name = new_name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_file(&self, id: &Uuid) -> Result<bool> {
        Ok(self.write()?.files.remove(id).is_some())
    }

    async fn delete_files_by_owner(&self, owner: &Uuid) -> Result<u64> {
        let mut state = self.write()?;
        let before = state.files.len();
        state.files.retain(|_, f| f.meta.uploaded_by != *owner);
        Ok((before - state.files.len()) as u64)
    }

    async fn count_files(&self) -> Result<u64> {
        Ok(self.read()?.files.len() as u64)
    }

    async fn count_files_by_owner(&self, owner: &Uuid) -> Result<u64> {
        Ok(self
            .read()?
            .files
            .values()
            .filter(|f| f.meta.uploaded_by == *owner)
            .count() as u64)
    }

    fn kind(&self) -> &'static str {
        "inmemory"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
