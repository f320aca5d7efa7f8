//! Named counters for SQL backends.

use crate::Result;

use super::{SqlxBackend, SqlxResultExt};

/// Atomically increment `scope` and return the new value; the first call yields 1.
///
/// A single upsert statement, so concurrent callers serialize on the row lock
/// and never see the same value.
pub async fn next(backend: &SqlxBackend, scope: &str) -> Result<i64> {
    let (value,): (i64,) = sqlx::query_as(
        "INSERT INTO sequences (scope, value) VALUES ($1, 1)
         ON CONFLICT (scope) DO UPDATE SET value = sequences.value + 1
         RETURNING value",
    )
    .bind(scope)
    .fetch_one(backend.pool())
    .await
    .sql_context("Failed to advance sequence")?;
    Ok(value)
}
