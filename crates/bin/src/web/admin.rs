//! Administrator console.

use axum::{
    Extension, Form, Json,
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use filedesk::user::{Identity, NewUser, Role, UserError};
use serde::{Deserialize, Serialize};
use tower_cookies::Cookies;
use uuid::Uuid;

use super::{AppState, PageError, found};
use crate::templates;

const RECORD: &str = "/admin/record";

/// Admin create-user form data
#[derive(Deserialize)]
pub struct CreateUserForm {
    email: String,
    password: String,
    role: String,
}

/// Body of GET /admin/check-session
#[derive(Serialize)]
pub struct SessionCheck {
    valid: bool,
}

/// Handler for GET /admin/dashboard - Store totals
pub async fn handle_dashboard(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
) -> Result<Html<String>, PageError> {
    let users = state.users.count().await?;
    let files = state.files.count().await?;
    Ok(Html(templates::admin_dashboard_page(&identity, users, files)))
}

/// Handler for GET /admin/record - All users with their file counts
pub async fn handle_record(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let users = state.users.summaries().await?;
    Ok(Html(templates::admin_record_page(&users)))
}

/// Handler for GET /admin/createuser - Create-user form
pub async fn handle_create_user_page() -> Html<String> {
    Html(templates::admin_create_user_page(None))
}

/// Handler for POST /admin/createuser - Create an account with any role
pub async fn handle_create_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Form(form): Form<CreateUserForm>,
) -> Result<Response, PageError> {
    let created = match form.role.parse::<Role>() {
        Ok(role) => {
            state
                .users
                .create(NewUser::new(form.email, form.password, role))
                .await
        }
        Err(e) => Err(e.into()),
    };

    match created {
        Ok(user) => {
            tracing::info!(
                admin = %identity.email,
                user_id = user.user_id,
                "Admin created user"
            );
            Ok(found(RECORD))
        }
        Err(e) if e.is_validation_error() => {
            let message = match &e {
                filedesk::Error::User(UserError::EmailAlreadyRegistered { .. }) => {
                    "Email already registered".to_string()
                }
                _ => e.to_string(),
            };
            let page = Html(templates::admin_create_user_page(Some(&message)));
            Ok((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// Handler for POST /admin/users/{user_id}/delete - Delete a user and their files
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Path(user_id): Path<String>,
) -> Result<Response, PageError> {
    let id = Uuid::parse_str(&user_id)
        .map_err(|_| PageError::not_found("User not found"))?;
    let deleted = state.users.delete(&id).await?;
    tracing::info!(
        admin = %identity.email,
        user_id = deleted.user_id,
        files_removed = deleted.files_removed,
        "Admin deleted user"
    );
    Ok(found(RECORD))
}

/// Handler for GET /admin/check-session - Whether the caller holds an admin session
pub async fn handle_check_session(State(state): State<AppState>, cookies: Cookies) -> Response {
    let identity = state.current_identity(&cookies).await;
    let valid = identity.is_some_and(|identity| identity.is_admin());
    let status = if valid {
        StatusCode::OK
    } else {
        StatusCode::UNAUTHORIZED
    };
    (status, Json(SessionCheck { valid })).into_response()
}
