//! JSON API.
//!
//! These routes address users by email instead of by session. They are open
//! unless the server runs with `--api-require-session`.

use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use filedesk::{
    ids::FileId,
    user::{NewUser, Role, UserError},
};
use serde::{Deserialize, Serialize};

use super::{ApiError, AppState};

/// Success envelope: `{"success": true, "data": ...}`
#[derive(Serialize)]
pub struct ApiResponse<T> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<&'static str>,
    data: T,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data,
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListing {
    sequential_id: i64,
    file_name: String,
    upload_date: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateUserRequest {
    email: Option<String>,
    password: Option<String>,
    role: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedUser {
    user_id: i64,
    email: String,
    role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameFileRequest {
    email: String,
    file_id: String,
    new_file_name: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenamedFile {
    file_id: FileId,
    new_file_name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteFileRequest {
    email: String,
    file_id: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedFile {
    file_id: FileId,
    file_name: String,
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            let error = ApiError::bad_request("Invalid request body");
            Err(error.with_details(rejection.body_text()))
        }
    }
}

fn parse_file_id(raw: &str) -> Result<FileId, ApiError> {
    raw.parse().map_err(|_| ApiError::not_found("File not found"))
}

/// Handler for GET /api/files/{email} - A user's files, ascending by sequence
pub async fn handle_list_files(
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> Result<Json<ApiResponse<Vec<FileListing>>>, ApiError> {
    let user = state.users.get_by_email(&email).await?;
    let files = state
        .files
        .list_by_owner_sequential(&user.id)
        .await?
        .into_iter()
        .map(|meta| FileListing {
            sequential_id: meta.sequential_id,
            file_name: meta.original_name,
            upload_date: meta.upload_date,
        })
        .collect();
    Ok(Json(ApiResponse::ok(files)))
}

/// Handler for POST /api/users - Create an account
pub async fn handle_create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let request = body(payload)?;
    let (Some(email), Some(password)) = (request.email, request.password) else {
        return Err(ApiError::bad_request("Email and password are required"));
    };
    if email.is_empty() || password.is_empty() {
        return Err(ApiError::bad_request("Email and password are required"));
    }
    let role = match request.role.as_deref() {
        None | Some("") => Role::User,
        Some(role) => match role.parse::<Role>() {
            Ok(role) => role,
            Err(e) => return Err(ApiError::bad_request(e.to_string())),
        },
    };

    let new_user = NewUser::new(email, password, role);
    let user = match state.users.create(new_user).await {
        Ok(user) => user,
        Err(filedesk::Error::User(UserError::EmailAlreadyRegistered { .. })) => {
            return Err(ApiError::bad_request("Email already registered"));
        }
        Err(e) => return Err(e.into()),
    };

    let created = CreatedUser {
        user_id: user.user_id,
        email: user.email,
        role: user.role,
    };
    let body = Json(ApiResponse::ok(created));
    Ok((StatusCode::CREATED, body).into_response())
}

/// Handler for PUT /api/files - Rename a file owned by the given user
pub async fn handle_rename_file(
    State(state): State<AppState>,
    payload: Result<Json<RenameFileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<RenamedFile>>, ApiError> {
    let request = body(payload)?;
    let user = state.users.get_by_email(&request.email).await?;
    let file_id = parse_file_id(&request.file_id)?;

    let meta = state
        .files
        .rename_owned_by(&user.id, &file_id, &request.new_file_name)
        .await?;
    Ok(Json(ApiResponse::ok(RenamedFile {
        file_id: meta.file_id,
        new_file_name: meta.original_name,
    })))
}

/// Handler for DELETE /api/files - Delete a file owned by the given user
pub async fn handle_delete_file(
    State(state): State<AppState>,
    payload: Result<Json<DeleteFileRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<DeletedFile>>, ApiError> {
    let request = body(payload)?;
    let user = state.users.get_by_email(&request.email).await?;
    let file_id = parse_file_id(&request.file_id)?;

    let meta = state.files.delete_owned_by(&user.id, &file_id).await?;
    Ok(Json(ApiResponse {
        success: true,
        message: Some("File deleted successfully"),
        data: DeletedFile {
            file_id: meta.file_id,
            file_name: meta.original_name,
        },
    }))
}
