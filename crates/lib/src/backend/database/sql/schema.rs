//! SQL schema definitions.
//!
//! The schema is portable between SQLite and PostgreSQL. A single-row
//! `schema_version` table records the version a database was created with;
//! opening a database written by a newer build fails instead of guessing.

use crate::Result;
use crate::backend::errors::BackendError;

use super::{SqlxBackend, SqlxResultExt};

/// Current schema version.
pub const SCHEMA_VERSION: i64 = 1;

/// SQL statements to create the schema tables.
///
/// Each statement uses portable SQL that works on both SQLite and PostgreSQL.
pub const CREATE_TABLES: &[&str] = &[
    // Schema version tracking
    // BIGINT (64-bit) used for portability between SQLite and PostgreSQL
    "CREATE TABLE IF NOT EXISTS schema_version (
        version BIGINT PRIMARY KEY
    )",
    // Accounts. Email uniqueness is exact, no case folding.
    // created_at is milliseconds since the Unix epoch
    "CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        user_id BIGINT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        role TEXT NOT NULL,
        created_at BIGINT NOT NULL
    )",
    // File records with their payload
    // BYTEA is PostgreSQL binary type and SQLite maps it to BLOB affinity
    "CREATE TABLE IF NOT EXISTS files (
        id TEXT PRIMARY KEY NOT NULL,
        file_id TEXT NOT NULL UNIQUE,
        sequential_id BIGINT NOT NULL,
        original_name TEXT NOT NULL,
        mimetype TEXT NOT NULL,
        size BIGINT NOT NULL,
        data BYTEA NOT NULL,
        uploaded_by TEXT NOT NULL,
        upload_date BIGINT NOT NULL,
        UNIQUE (uploaded_by, sequential_id)
    )",
    // Named counters behind user ids and per-owner file ids
    "CREATE TABLE IF NOT EXISTS sequences (
        scope TEXT PRIMARY KEY NOT NULL,
        value BIGINT NOT NULL
    )",
];

/// SQL statements to create indexes.
pub const CREATE_INDEXES: &[&str] = &[
    // Per-owner listings, newest first
    "CREATE INDEX IF NOT EXISTS idx_files_owner_date ON files(uploaded_by, upload_date)",
];

/// Initialize the database schema.
///
/// Creates tables and indexes if they don't exist and rejects databases whose
/// stored version is newer than [`SCHEMA_VERSION`].
pub async fn initialize(backend: &SqlxBackend) -> Result<()> {
    let pool = backend.pool();

    for statement in CREATE_TABLES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .sql_context(&format!("Schema creation failed - SQL: {statement}"))?;
    }

    let row: Option<(i64,)> = sqlx::query_as("SELECT version FROM schema_version")
        .fetch_optional(pool)
        .await
        .sql_context("Failed to check schema version")?;

    match row {
        None => {
            sqlx::query("INSERT INTO schema_version (version) VALUES ($1)")
                .bind(SCHEMA_VERSION)
                .execute(pool)
                .await
                .sql_context("Failed to initialize schema version")?;
        }
        Some((current,)) if current > SCHEMA_VERSION => {
            return Err(BackendError::SqlxError {
                reason: format!(
                    "Database schema v{current} is newer than this build (v{SCHEMA_VERSION})"
                ),
                source: None,
            }
            .into());
        }
        Some(_) => {}
    }

    for statement in CREATE_INDEXES {
        sqlx::query(statement)
            .execute(pool)
            .await
            .sql_context(&format!("Index creation failed - SQL: {statement}"))?;
    }

    tracing::debug!(kind = ?backend.db_kind(), version = SCHEMA_VERSION, "SQL schema ready");
    Ok(())
}
