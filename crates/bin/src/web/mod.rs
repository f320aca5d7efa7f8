//! HTTP routes for the filedesk server.
//!
//! Page routes render HTML and redirect on success; `/api` routes speak JSON.
//! Authentication state travels in the signed `sessionId` cookie and is
//! resolved against the injected [`SessionStore`].

mod admin;
mod api;
mod errors;
mod files;
mod guard;
mod pages;

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, Method, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use filedesk::{
    backend::Backend,
    files::FileStore,
    session::SessionStore,
    user::{CredentialStore, Identity},
};
use serde::Serialize;
use tower_cookies::{CookieManagerLayer, Cookies, Key};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::session;

pub use errors::{ApiError, PageError};

/// Multipart framing allowance on top of the payload limit
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub users: CredentialStore,
    pub files: FileStore,
    pub sessions: Arc<dyn SessionStore>,
    pub cookie_key: Key,
    pub api_require_session: bool,
}

impl AppState {
    /// Identity behind the request's session cookie, if any.
    ///
    /// A session store failure is logged and treated as no session.
    pub async fn current_identity(&self, cookies: &Cookies) -> Option<Identity> {
        let token = session::token(cookies, &self.cookie_key)?;
        match self.sessions.resolve(&token).await {
            Ok(identity) => identity,
            Err(e) => {
                tracing::error!("Failed to resolve session: {e}");
                None
            }
        }
    }
}

/// 302 redirect, as browsers expect after a form post
pub fn found(location: &str) -> Response {
    let headers = [(header::LOCATION, location.to_string())];
    (StatusCode::FOUND, headers).into_response()
}

/// CORS for a single credentialed front-end origin
pub fn cors_layer(frontend_url: &str) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    let origin = HeaderValue::from_str(frontend_url.trim_end_matches('/'))?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]))
}

/// Build the application router
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let upload_limit = DefaultBodyLimit::max(state.files.max_upload() + MULTIPART_OVERHEAD);

    let user_routes = Router::new()
        .route("/user/dashboard", get(files::handle_dashboard))
        .route("/user/create", get(files::handle_create_page))
        .route("/user/edit/{file_id}", get(files::handle_edit_page))
        .route("/user/delete/{file_id}", get(files::handle_delete_page))
        .route("/upload", post(files::handle_upload).layer(upload_limit))
        .route("/download/{file_id}", get(files::handle_download))
        .route("/files/{file_id}/delete", post(files::handle_delete))
        .route("/files/rename", post(files::handle_rename))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_authenticated,
        ));

    let create_user = get(admin::handle_create_user_page)
        .post(admin::handle_create_user);
    let admin_routes = Router::new()
        .route("/admin/dashboard", get(admin::handle_dashboard))
        .route("/admin/record", get(admin::handle_record))
        .route("/admin/createuser", create_user)
        .route(
            "/admin/users/{user_id}/delete",
            post(admin::handle_delete_user),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::require_admin,
        ));

    let api_routes = Router::new()
        .route("/api/files/{email}", get(api::handle_list_files))
        .route("/api/users", post(api::handle_create_user))
        .route(
            "/api/files",
            put(api::handle_rename_file).delete(api::handle_delete_file),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            guard::api_session,
        ));

    let login = get(pages::handle_login_page).post(pages::handle_login);
    let register = get(pages::handle_register_page)
        .post(pages::handle_register);
    let logout = get(pages::handle_logout_page).post(pages::handle_logout);

    Router::new()
        .route("/", get(pages::handle_login_page))
        .route("/health", get(handle_health))
        .route("/login", login)
        .route("/register", register)
        .route("/logout", logout)
        .route("/admin/check-session", get(admin::handle_check_session))
        .merge(user_routes)
        .merge(admin_routes)
        .merge(api_routes)
        .layer(CookieManagerLayer::new())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Health
// ============================================================================

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    backend: &'static str,
}

/// Handler for GET /health - Health check endpoint
async fn handle_health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        backend: state.backend.kind(),
    })
}
