//! Route guards.
//!
//! Page guards resolve the session, stash the [`Identity`] in the request
//! extensions for handlers, and mark the response as uncacheable so a page
//! rendered for one session is not replayed from the browser cache after
//! logout.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use filedesk::auth::{Access, Denial, authorize};
use tower_cookies::Cookies;

use super::{ApiError, AppState, PageError, found};

/// Guard for routes that need any logged-in user
pub async fn require_authenticated(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    guard(state, cookies, request, next, Access::Authenticated).await
}

/// Guard for administrator routes
pub async fn require_admin(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    guard(state, cookies, request, next, Access::Admin).await
}

async fn guard(
    state: AppState,
    cookies: Cookies,
    mut request: Request,
    next: Next,
    access: Access,
) -> Response {
    let identity = state.current_identity(&cookies).await;
    match authorize(identity.as_ref(), access) {
        Ok(identity) => {
            request.extensions_mut().insert(identity.clone());
        }
        Err(Denial::Unauthenticated) => return found("/login"),
        Err(denial @ Denial::NotAdmin) => {
            tracing::warn!(
                path = %request.uri().path(),
                "Rejected non-admin request to an admin route"
            );
            return PageError::forbidden(denial.to_string()).into_response();
        }
    }

    let mut response = next.run(request).await;
    set_no_cache(response.headers_mut());
    response
}

/// Session check for `/api`, only enforced when configured.
///
/// The identity is not attached; API handlers address users by email.
pub async fn api_session(
    State(state): State<AppState>,
    cookies: Cookies,
    request: Request,
    next: Next,
) -> Response {
    if state.api_require_session && state.current_identity(&cookies).await.is_none() {
        return ApiError::unauthorized().into_response();
    }
    next.run(request).await
}

/// Forbid caching of session-dependent responses
pub fn set_no_cache(headers: &mut HeaderMap) {
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static("no-store, no-cache, must-revalidate, private"),
    );
    headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
    headers.insert(header::EXPIRES, HeaderValue::from_static("-1"));
}
