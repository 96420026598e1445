//! Mapping of core errors onto HTTP responses.
//!
//! Browser pages and the JSON API surface the same [`ContentError`] differently: a page sends
//! an anonymous caller to the login location, while the JSON API answers `401` so programs can
//! react. Neither leaks filesystem paths in the body.

use api_shared::ErrorRes;
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use contented_core::ContentError;

/// Failure of an HTML page or file request.
#[derive(Debug)]
pub enum PageError {
    LoginRequired { login_url: String },
    NotFound,
    BadRequest,
    Internal,
}

impl PageError {
    pub fn from_content(err: ContentError, login_url: &str) -> Self {
        match err {
            ContentError::AccessDenied { .. } => PageError::LoginRequired {
                login_url: login_url.to_owned(),
            },
            ContentError::NotFound(_) => PageError::NotFound,
            ContentError::InvalidPath(reason) => {
                tracing::debug!("rejected path: {}", reason);
                PageError::BadRequest
            }
            other => {
                tracing::error!("request failed: {:?}", other);
                PageError::Internal
            }
        }
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::LoginRequired { login_url } => {
                (StatusCode::FOUND, [(header::LOCATION, login_url)]).into_response()
            }
            PageError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            PageError::BadRequest => (StatusCode::BAD_REQUEST, "Bad request").into_response(),
            PageError::Internal => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

/// Failure of a JSON API request.
#[derive(Debug)]
pub struct JsonError {
    status: StatusCode,
    message: &'static str,
}

impl JsonError {
    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<ContentError> for JsonError {
    fn from(err: ContentError) -> Self {
        let (status, message) = match err {
            ContentError::AccessDenied { .. } => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            ContentError::NotFound(_) => (StatusCode::NOT_FOUND, "Not found"),
            ContentError::InvalidPath(_) => (StatusCode::BAD_REQUEST, "Invalid path"),
            other => {
                tracing::error!("request failed: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error")
            }
        };
        Self { status, message }
    }
}

impl IntoResponse for JsonError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorRes {
                error: self.message.into(),
            }),
        )
            .into_response()
    }
}
