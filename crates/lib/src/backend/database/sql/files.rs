//! File record storage for SQL backends.
//!
//! Listing queries never select the `data` column.

use uuid::Uuid;

use crate::Result;
use crate::backend::FileOrder;
use crate::backend::errors::BackendError;
use crate::clock::millis_to_datetime;
use crate::files::{FileMeta, StoredFile};
use crate::ids::FileId;

use super::{SqlxBackend, SqlxResultExt, is_unique_violation, parse_uuid};

type MetaRow = (String, String, i64, String, String, i64, String, i64);
type FileRow = (String, String, i64, String, String, i64, String, i64, Vec<u8>);

const META_COLUMNS: &str =
    "id, file_id, sequential_id, original_name, mimetype, size, uploaded_by, upload_date";

fn meta_from_row(row: MetaRow) -> Result<FileMeta> {
    let (id, file_id, sequential_id, name, mimetype, size, owner, uploaded) = row;
    let size = u64::try_from(size).map_err(|_| BackendError::CorruptRecord {
        table: "files",
        reason: format!("negative size {size}"),
    })?;
    let file_id: FileId = file_id.parse().map_err(|e| BackendError::CorruptRecord {
        table: "files",
        reason: format!("{e}"),
    })?;
    Ok(FileMeta {
        id: parse_uuid("files", &id)?,
        file_id,
        sequential_id,
        original_name: name,
        mimetype,
        size,
        uploaded_by: parse_uuid("files", &owner)?,
        upload_date: millis_to_datetime(uploaded),
    })
}

fn file_from_row(row: FileRow) -> Result<StoredFile> {
    let (
        id,
        file_id,
        sequential_id,
        original_name,
        mimetype,
        size,
        uploaded_by,
        upload_date,
        data,
    ) = row;
    let meta = meta_from_row((
        id,
        file_id,
        sequential_id,
        original_name,
        mimetype,
        size,
        uploaded_by,
        upload_date,
    ))?;
    Ok(StoredFile { meta, data })
}

pub async fn insert(backend: &SqlxBackend, file: StoredFile) -> Result<()> {
    let StoredFile { meta, data } = file;
    let result = sqlx::query(
        "INSERT INTO files (id, file_id, sequential_id, original_name, mimetype, size, data, uploaded_by, upload_date)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(meta.id.to_string())
    .bind(meta.file_id.to_string())
    .bind(meta.sequential_id)
    .bind(&meta.original_name)
    .bind(&meta.mimetype)
    .bind(meta.size as i64)
    .bind(data)
    .bind(meta.uploaded_by.to_string())
    .bind(meta.upload_date.timestamp_millis())
    .execute(backend.pool())
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => {
            let file_id = meta.file_id.to_string();
            Err(BackendError::DuplicateFileId { file_id }.into())
        }
        Err(e) => Err(e).sql_context("Failed to insert file"),
    }
}

pub async fn get(backend: &SqlxBackend, id: &Uuid) -> Result<Option<StoredFile>> {
    let sql = format!("SELECT {META_COLUMNS}, data FROM files WHERE id = $1");
    let row: Option<FileRow> = sqlx::query_as(&sql)
        .bind(id.to_string())
        .fetch_optional(backend.pool())
        .await
        .sql_context("Failed to get file")?;
    row.map(file_from_row).transpose()
}

pub async fn find(backend: &SqlxBackend, file_id: &FileId) -> Result<Option<StoredFile>> {
    let sql = format!("SELECT {META_COLUMNS}, data FROM files WHERE file_id = $1");
    let row: Option<FileRow> = sqlx::query_as(&sql)
        .bind(file_id.to_string())
        .fetch_optional(backend.pool())
        .await
        .sql_context("Failed to look up file by file id")?;
    row.map(file_from_row).transpose()
}

pub async fn list(backend: &SqlxBackend, owner: &Uuid, order: FileOrder) -> Result<Vec<FileMeta>> {
    let order_by = match order {
        FileOrder::NewestFirst => "upload_date DESC, sequential_id DESC",
        FileOrder::Sequential => "sequential_id ASC",
    };
    let sql = format!(
        "SELECT {META_COLUMNS} FROM files WHERE uploaded_by = $1 ORDER BY {order_by}"
    );
    let rows: Vec<MetaRow> = sqlx::query_as(&sql)
        .bind(owner.to_string())
        .fetch_all(backend.pool())
        .await
        .sql_context("Failed to list files")?;
    rows.into_iter().map(meta_from_row).collect()
}

pub async fn rename(backend: &SqlxBackend, id: &Uuid, new_name: &str) -> Result<bool> {
    let result = sqlx::query("UPDATE files SET original_name = $1 WHERE id = $2")
        .bind(new_name)
        .bind(id.to_string())
        .execute(backend.pool())
        .await
        .sql_context("Failed to rename file")?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete(backend: &SqlxBackend, id: &Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM files WHERE id = $1")
        .bind(id.to_string())
        .execute(backend.pool())
        .await
        .sql_context("Failed to delete file")?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_owner(backend: &SqlxBackend, owner: &Uuid) -> Result<u64> {
    let result = sqlx::query("DELETE FROM files WHERE uploaded_by = $1")
        .bind(owner.to_string())
        .execute(backend.pool())
        .await
        .sql_context("Failed to delete files of owner")?;
    Ok(result.rows_affected())
}

/// Number of files, optionally restricted to one owner.
pub async fn count(backend: &SqlxBackend, owner: Option<&Uuid>) -> Result<u64> {
    let (count,): (i64,) = match owner {
        Some(owner) => {
            sqlx::query_as("SELECT COUNT(*) FROM files WHERE uploaded_by = $1")
                .bind(owner.to_string())
                .fetch_one(backend.pool())
                .await
        }
        None => {
            sqlx::query_as("SELECT COUNT(*) FROM files")
                .fetch_one(backend.pool())
                .await
        }
    }
    .sql_context("Failed to count files")?;
    Ok(count as u64)
}
