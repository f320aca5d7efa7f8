//! Login, registration and logout pages.

use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use filedesk::user::{NewUser, Role, UserError};
use serde::Deserialize;
use tower_cookies::Cookies;

use super::{AppState, PageError, found, guard::set_no_cache};
use crate::{session, templates};

/// Login form data
#[derive(Deserialize)]
pub struct LoginForm {
    email: String,
    password: String,
}

/// Registration form data
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterForm {
    email: String,
    password: String,
    confirm_password: String,
    /// Checkbox; present only when ticked
    is_admin: Option<String>,
}

// ============================================================================
// Authentication Handlers
// ============================================================================

/// Handler for GET / and GET /login - Login page, or the dashboard for a live session
pub async fn handle_login_page(State(state): State<AppState>, cookies: Cookies) -> Response {
    if let Some(identity) = state.current_identity(&cookies).await {
        return found(identity.role.dashboard_path());
    }
    Html(templates::login_page(None)).into_response()
}

/// Handler for POST /login - Process login
pub async fn handle_login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Response {
    let user = match state.users.authenticate(&form.email, &form.password).await {
        Ok(user) => user,
        Err(e) if e.is_invalid_credentials() => {
            tracing::info!(email = %form.email, "Rejected login");
            return Html(templates::login_page(Some("Invalid credentials"))).into_response();
        }
        Err(e) => {
            tracing::error!(email = %form.email, "Login failed: {e}");
            return Html(templates::login_page(Some("Login failed"))).into_response();
        }
    };

    let session = match state.sessions.create(user.identity()).await {
        Ok(session) => session,
        Err(e) => {
            tracing::error!(email = %user.email, "Failed to create session: {e}");
            return Html(templates::login_page(Some("Login failed"))).into_response();
        }
    };

    session::issue(&cookies, &state.cookie_key, &session.token);
    tracing::info!(user_id = user.user_id, role = %user.role, "User logged in");
    found(user.role.dashboard_path())
}

/// Handler for POST /logout - Destroy the session and clear the cookie
pub async fn handle_logout(State(state): State<AppState>, cookies: Cookies) -> Response {
    if let Some(token) = session::token(&cookies, &state.cookie_key) {
        // The user is logged out from the browser's side regardless
        if let Err(e) = state.sessions.destroy(&token).await {
            tracing::warn!("Failed to destroy session on logout: {e}");
        }
    }
    session::clear(&cookies, &state.cookie_key);

    let mut response = found("/login");
    set_no_cache(response.headers_mut());
    response
}

/// Handler for GET /logout - Logging out requires a POST
pub async fn handle_logout_page() -> Response {
    found("/login")
}

/// Handler for GET /register - Show registration page
pub async fn handle_register_page() -> Html<String> {
    Html(templates::register_page(None))
}

/// Handler for POST /register - Process registration
pub async fn handle_register(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, PageError> {
    let role = if form.is_admin.is_some() {
        Role::Admin
    } else {
        Role::User
    };

    match state
        .users
        .register(
            NewUser::new(form.email, form.password, role),
            &form.confirm_password,
        )
        .await
    {
        Ok(_) => Ok(found("/login")),
        Err(e) if e.is_validation_error() => {
            let message = match &e {
                filedesk::Error::User(UserError::EmailAlreadyRegistered { .. }) => {
                    "Email already registered".to_string()
                }
                _ => e.to_string(),
            };
            Ok((
                StatusCode::BAD_REQUEST,
                Html(templates::register_page(Some(&message))),
            )
                .into_response())
        }
        Err(e) => Err(e.into()),
    }
}
