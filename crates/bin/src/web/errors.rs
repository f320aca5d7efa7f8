//! Error responses for page and API routes.
//!
//! Both map the library's error classes onto status codes: not found 404,
//! ownership or role mismatch 403, rejected input 400, oversized upload 413,
//! and anything else 500. Store failures are logged here and never reach the
//! client in detail on page routes.

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde::Serialize;

use crate::templates;

fn status_for(err: &filedesk::Error) -> StatusCode {
    if err.is_not_found() {
        StatusCode::NOT_FOUND
    } else if err.is_forbidden() {
        StatusCode::FORBIDDEN
    } else if err.is_payload_too_large() {
        StatusCode::PAYLOAD_TOO_LARGE
    } else if err.is_validation_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// A failure on an HTML route, rendered as the error page.
#[derive(Debug)]
pub struct PageError {
    status: StatusCode,
    message: String,
}

impl PageError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, message)
    }

    /// Multipart read failures: body over the route limit, or malformed.
    pub fn from_multipart(err: MultipartError) -> Self {
        let status = err.status();
        if status == StatusCode::PAYLOAD_TOO_LARGE {
            tracing::warn!("Rejected upload over the body limit");
            Self::new(status, "File exceeds the 10 MiB upload limit")
        } else {
            Self::new(
                StatusCode::BAD_REQUEST,
                format!("Invalid upload: {}", err.body_text()),
            )
        }
    }
}

impl From<filedesk::Error> for PageError {
    fn from(err: filedesk::Error) -> Self {
        let status = status_for(&err);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(module = err.module(), "Request failed: {err}");
            return Self::new(status, "Something went wrong. Please try again later.");
        }
        let message = if matches!(err, filedesk::Error::User(_)) && err.is_not_found() {
            "User not found".to_string()
        } else if err.is_not_found() {
            "File not found".to_string()
        } else if err.is_forbidden() {
            "Access denied".to_string()
        } else {
            err.to_string()
        };
        Self::new(status, message)
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        (
            self.status,
            Html(templates::error_page(self.status.as_u16(), &self.message)),
        )
            .into_response()
    }
}

/// JSON error body: `{"error": ..., "details"?: ...}`
#[derive(Debug, Serialize)]
struct ApiErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// A failure on a JSON API route.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: String,
    details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            details: None,
        }
    }

    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn not_found(error: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, error)
    }

    pub fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Authentication required")
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl From<filedesk::Error> for ApiError {
    fn from(err: filedesk::Error) -> Self {
        let status = status_for(&err);
        match status {
            StatusCode::INTERNAL_SERVER_ERROR => {
                tracing::error!(module = err.module(), "API request failed: {err}");
                Self::new(status, "Internal server error").with_details(err.to_string())
            }
            StatusCode::NOT_FOUND if matches!(err, filedesk::Error::User(_)) => {
                Self::not_found("User not found")
            }
            StatusCode::NOT_FOUND => Self::not_found("File not found"),
            _ => Self::new(status, err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorBody {
            error: self.error,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}
