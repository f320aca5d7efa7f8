//! The user's file pages and file actions.
//!
//! Every route here sits behind the authenticated guard, which leaves the
//! session [`Identity`] in the request extensions. File paths accept either
//! the internal id or the composite `<owner>_<seq>` id.

use axum::{
    Extension, Form,
    body::Body,
    extract::{Multipart, Path, State},
    http::{HeaderValue, header},
    response::{Html, IntoResponse, Response},
};
use filedesk::{files::Upload, ids::FileRef, user::Identity};
use serde::Deserialize;

use super::{AppState, PageError, found};
use crate::templates;

const DASHBOARD: &str = "/user/dashboard";

/// Rename form data
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameForm {
    file_id: String,
    new_file_name: String,
}

fn parse_file_ref(raw: &str) -> Result<FileRef, PageError> {
    raw.parse()
        .map_err(|_| PageError::not_found("File not found"))
}

// ============================================================================
// Pages
// ============================================================================

/// Handler for GET /user/dashboard - The user's files, newest first
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Html<String>, PageError> {
    let files = state.files.list_by_owner(&identity.id).await?;
    Ok(Html(templates::user_dashboard_page(&identity, &files)))
}

/// Handler for GET /user/create - Upload form
pub async fn handle_create_page(State(state): State<AppState>) -> Html<String> {
    Html(templates::create_file_page(state.files.max_upload()))
}

/// Handler for GET /user/edit/{file_id} - Rename form
pub async fn handle_edit_page(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(file_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let file = parse_file_ref(&file_id)?;
    let stored = state.files.get_owned(&file, &identity.id).await?;
    Ok(Html(templates::edit_file_page(&stored.meta)))
}

/// Handler for GET /user/delete/{file_id} - Delete confirmation
pub async fn handle_delete_page(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(file_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let file = parse_file_ref(&file_id)?;
    let stored = state.files.get_owned(&file, &identity.id).await?;
    Ok(Html(templates::delete_file_page(&stored.meta)))
}

// ============================================================================
// Actions
// ============================================================================

/// Handler for POST /upload - Store the multipart `file` field
pub async fn handle_upload(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    mut multipart: Multipart,
) -> Result<Response, PageError> {
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(PageError::from_multipart)?
    {
        if field.name() != Some("file") {
            continue;
        }
        let original_name = field.file_name().unwrap_or_default().to_string();
        let mimetype = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await.map_err(PageError::from_multipart)?;

        // An empty file input still submits a part, with no file name
        if !original_name.is_empty() {
            upload = Some(Upload::new(original_name, mimetype, data.to_vec()));
        }
    }

    let Some(upload) = upload else {
        tracing::debug!(user = %identity.email, "Upload without a file");
        return Ok(found(DASHBOARD));
    };

    state.files.create(identity.id, upload).await?;
    Ok(found(DASHBOARD))
}

/// Handler for GET /download/{file_id} - Send the payload as an attachment
pub async fn handle_download(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(file_id): Path<String>,
) -> Result<Response, PageError> {
    let file = parse_file_ref(&file_id)?;
    let download = state.files.download(&file, &identity.id).await?;

    let content_type = HeaderValue::from_str(&download.mimetype)
        .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream"));
    let disposition = HeaderValue::from_bytes(download.content_disposition().as_bytes())
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, content_type),
            (header::CONTENT_DISPOSITION, disposition),
            (header::CONTENT_LENGTH, HeaderValue::from(download.size)),
        ],
        Body::from(download.data),
    )
        .into_response())
}

/// Handler for POST /files/{file_id}/delete - Delete an owned file
pub async fn handle_delete(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(file_id): Path<String>,
) -> Result<Response, PageError> {
    let file = parse_file_ref(&file_id)?;
    state.files.delete(&file, &identity.id).await?;
    Ok(found(DASHBOARD))
}

/// Handler for POST /files/rename - Rename an owned file
pub async fn handle_rename(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<RenameForm>,
) -> Result<Response, PageError> {
    let file = parse_file_ref(&form.file_id)?;
    state
        .files
        .rename(&file, &identity.id, &form.new_file_name)
        .await?;
    Ok(found(DASHBOARD))
}
