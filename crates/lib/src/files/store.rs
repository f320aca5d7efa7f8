//! File record store: ownership-checked create, list, rename, delete and download.

use std::sync::Arc;

use uuid::Uuid;

use super::errors::FileError;
use super::types::{Download, FileMeta, StoredFile, Upload};
use crate::backend::{Backend, FileOrder};
use crate::constants::MAX_UPLOAD_BYTES;
use crate::ids::{FileId, FileRef, IdAllocator};
use crate::{Clock, Error, Result};

/// Persists file records and enforces that only the owner may touch them.
#[derive(Clone)]
pub struct FileStore {
    backend: Arc<dyn Backend>,
    ids: IdAllocator,
    clock: Arc<dyn Clock>,
    max_upload: usize,
}

impl FileStore {
    pub fn new(backend: Arc<dyn Backend>, clock: Arc<dyn Clock>) -> Self {
        Self {
            ids: IdAllocator::new(backend.clone()),
            backend,
            clock,
            max_upload: MAX_UPLOAD_BYTES,
        }
    }

    /// Override the upload size limit.
    pub fn with_max_upload(mut self, max_upload: usize) -> Self {
        self.max_upload = max_upload;
        self
    }

    pub fn max_upload(&self) -> usize {
        self.max_upload
    }

    /// Store an upload for `owner` under the owner's next sequential id.
    ///
    /// Nothing is allocated or written if the upload is rejected.
    pub async fn create(&self, owner: Uuid, upload: Upload) -> Result<FileMeta> {
        let Upload {
            original_name,
            mimetype,
            data,
            declared_size,
        } = upload;

        if original_name.is_empty() {
            return Err(FileError::MissingField {
                field: "originalName",
            }
            .into());
        }
        if data.len() > self.max_upload {
            return Err(FileError::PayloadTooLarge {
                size: data.len(),
                limit: self.max_upload,
            }
            .into());
        }
        let size = data.len() as u64;
        if let Some(declared) = declared_size
            && declared != size
        {
            return Err(FileError::SizeMismatch {
                declared,
                actual: size,
            }
            .into());
        }

        let sequential_id = self.ids.next_file_id(owner).await?;
        let meta = FileMeta {
            id: Uuid::new_v4(),
            file_id: FileId::new(owner, sequential_id),
            sequential_id,
            original_name,
            mimetype,
            size,
            uploaded_by: owner,
            upload_date: self.clock.now(),
        };

        self.backend
            .insert_file(StoredFile {
                meta: meta.clone(),
                data,
            })
            .await?;

        tracing::info!(
            file_id = %meta.file_id,
            size = meta.size,
            mimetype = %meta.mimetype,
            "Stored file"
        );
        Ok(meta)
    }

    /// Files owned by `owner`, newest upload first.
    pub async fn list_by_owner(&self, owner: &Uuid) -> Result<Vec<FileMeta>> {
        self.backend.list_files(owner, FileOrder::NewestFirst).await
    }

    /// Files owned by `owner`, ascending by sequential id.
    pub async fn list_by_owner_sequential(&self, owner: &Uuid) -> Result<Vec<FileMeta>> {
        self.backend.list_files(owner, FileOrder::Sequential).await
    }

    /// Look a file up without any ownership check.
    pub async fn get(&self, file: &FileRef) -> Result<StoredFile> {
        let found = match file {
            FileRef::Internal(id) => self.backend.get_file(id).await?,
            FileRef::Composite(file_id) => self.backend.find_file(file_id).await?,
        };
        found.ok_or_else(|| not_found(file))
    }

    /// Look a file up on behalf of `requester`, who must own it.
    pub async fn get_owned(&self, file: &FileRef, requester: &Uuid) -> Result<StoredFile> {
        let stored = self.get(file).await?;
        if stored.meta.uploaded_by != *requester {
            tracing::warn!(
                file_id = %stored.meta.file_id,
                requester = %requester,
                "Rejected access to file owned by another user"
            );
            return Err(FileError::Forbidden {
                file_id: stored.meta.file_id.to_string(),
            }
            .into());
        }
        Ok(stored)
    }

    /// Change the display name of a file the requester owns.
    pub async fn rename(
        &self,
        file: &FileRef,
        requester: &Uuid,
        new_name: &str,
    ) -> Result<FileMeta> {
        if new_name.is_empty() {
            return Err(FileError::MissingField {
                field: "newFileName",
            }
            .into());
        }
        let stored = self.get_owned(file, requester).await?;
        self.rename_record(stored.meta, new_name).await
    }

    /// Delete a file the requester owns.
    pub async fn delete(&self, file: &FileRef, requester: &Uuid) -> Result<FileMeta> {
        let stored = self.get_owned(file, requester).await?;
        self.delete_record(stored.meta).await
    }

    /// Payload and headers for a file the requester owns.
    pub async fn download(&self, file: &FileRef, requester: &Uuid) -> Result<Download> {
        let stored = self.get_owned(file, requester).await?;
        Ok(stored.into())
    }

    /// Rename by composite id, scoped to `owner`.
    ///
    /// A file owned by someone else is reported as not found.
    pub async fn rename_owned_by(
        &self,
        owner: &Uuid,
        file_id: &FileId,
        new_name: &str,
    ) -> Result<FileMeta> {
        if new_name.is_empty() {
            return Err(FileError::MissingField {
                field: "newFileName",
            }
            .into());
        }
        let meta = self.find_owned_by(owner, file_id).await?;
        self.rename_record(meta, new_name).await
    }

    /// Delete by composite id, scoped to `owner`.
    ///
    /// A file owned by someone else is reported as not found.
    pub async fn delete_owned_by(&self, owner: &Uuid, file_id: &FileId) -> Result<FileMeta> {
        let meta = self.find_owned_by(owner, file_id).await?;
        self.delete_record(meta).await
    }

    /// Total number of stored files.
    pub async fn count(&self) -> Result<u64> {
        self.backend.count_files().await
    }

    async fn find_owned_by(&self, owner: &Uuid, file_id: &FileId) -> Result<FileMeta> {
        let reference = FileRef::Composite(*file_id);
        match self.backend.find_file(file_id).await? {
            Some(stored) if stored.meta.uploaded_by == *owner => Ok(stored.meta),
            _ => Err(not_found(&reference)),
        }
    }

    async fn rename_record(&self, mut meta: FileMeta, new_name: &str) -> Result<FileMeta> {
        if !self.backend.rename_file(&meta.id, new_name).await? {
            return Err(not_found(&FileRef::Internal(meta.id)));
        }
        tracing::info!(
            file_id = %meta.file_id,
            from = %meta.original_name,
            to = new_name,
            "Renamed file"
        );
        meta.original_name = new_name.to_string();
        Ok(meta)
    }

    async fn delete_record(&self, meta: FileMeta) -> Result<FileMeta> {
        if !self.backend.delete_file(&meta.id).await? {
            return Err(not_found(&FileRef::Internal(meta.id)));
        }
        tracing::info!(file_id = %meta.file_id, "Deleted file");
        Ok(meta)
    }
}

fn not_found(file: &FileRef) -> Error {
    FileError::FileNotFound {
        reference: file.to_string(),
    }
    .into()
}
