//! Per-request caller identity.

use crate::AppState;
use api_shared::auth::{bearer_token, API_KEY_HEADER};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts, HeaderMap},
};
use contented_core::Caller;
use std::convert::Infallible;

/// The caller as seen by the core, resolved through the configured `AuthProvider`.
///
/// Never rejects: a request without valid credentials is simply anonymous.
#[derive(Debug, Clone, Copy)]
pub struct CallerIdentity(pub Caller);

#[async_trait]
impl FromRequestParts<AppState> for CallerIdentity {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let credential = credential_from_headers(&parts.headers);
        let authenticated = state.auth.is_authenticated(credential);
        Ok(Self(Caller::from_flag(authenticated)))
    }
}

/// The `x-api-key` header wins over `Authorization: Bearer`.
pub fn credential_from_headers(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(bearer_token)
        })
}
