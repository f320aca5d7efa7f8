//! User record storage for SQL backends.

use uuid::Uuid;

use crate::Result;
use crate::backend::errors::BackendError;
use crate::clock::millis_to_datetime;
use crate::user::{Role, User};

use super::{SqlxBackend, SqlxResultExt, is_unique_violation, parse_uuid};

type UserRow = (String, i64, String, String, String, i64);

const USER_COLUMNS: &str = "id, user_id, email, password_hash, role, created_at";

fn from_row(row: UserRow) -> Result<User> {
    let (id, user_id, email, password_hash, role, created_at) = row;
    let role: Role = role.parse().map_err(|_| BackendError::CorruptRecord {
        table: "users",
        reason: format!("unknown role {role:?}"),
    })?;
    Ok(User {
        id: parse_uuid("users", &id)?,
        user_id,
        email,
        password_hash,
        role,
        created_at: millis_to_datetime(created_at),
    })
}

pub async fn insert(backend: &SqlxBackend, user: User) -> Result<()> {
    let result = sqlx::query(
        "INSERT INTO users (id, user_id, email, password_hash, role, created_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(user.id.to_string())
    .bind(user.user_id)
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(user.role.as_str())
    .bind(user.created_at.timestamp_millis())
    .execute(backend.pool())
    .await;

    match result {
        Ok(_) => Ok(()),
        Err(e) if is_unique_violation(&e) => {
            Err(BackendError::DuplicateEmail { email: user.email }.into())
        }
        Err(e) => Err(e).sql_context("Failed to insert user"),
    }
}

pub async fn get(backend: &SqlxBackend, id: &Uuid) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
    let row: Option<UserRow> = sqlx::query_as(&sql)
        .bind(id.to_string())
        .fetch_optional(backend.pool())
        .await
        .sql_context("Failed to get user")?;
    row.map(from_row).transpose()
}

pub async fn find_by_email(backend: &SqlxBackend, email: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
    let row: Option<UserRow> = sqlx::query_as(&sql)
        .bind(email)
        .fetch_optional(backend.pool())
        .await
        .sql_context("Failed to look up user by email")?;
    row.map(from_row).transpose()
}

pub async fn list(backend: &SqlxBackend) -> Result<Vec<User>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY user_id ASC");
    let rows: Vec<UserRow> = sqlx::query_as(&sql)
        .fetch_all(backend.pool())
        .await
        .sql_context("Failed to list users")?;
    rows.into_iter().map(from_row).collect()
}

pub async fn delete(backend: &SqlxBackend, id: &Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id.to_string())
        .execute(backend.pool())
        .await
        .sql_context("Failed to delete user")?;
    Ok(result.rows_affected() > 0)
}

pub async fn count(backend: &SqlxBackend) -> Result<u64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(backend.pool())
        .await
        .sql_context("Failed to count users")?;
    Ok(count as u64)
}
