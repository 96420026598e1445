//! Caller authentication.
//!
//! The core never handles credentials; it is told per request whether the caller is
//! authenticated. [`AuthProvider`] is that seam. The shipped provider, [`ApiKeyAuth`], accepts a
//! single shared key presented in the `x-api-key` header or as an `Authorization: Bearer` token.

/// Header carrying the API key.
pub const API_KEY_HEADER: &str = "x-api-key";

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("API_KEY not configured")]
    NotConfigured,
    #[error("missing credential")]
    MissingCredential,
    #[error("invalid API key")]
    InvalidKey,
}

/// Validates the provided API key against the expected one.
///
/// The comparison does not short-circuit on the first differing byte.
pub fn validate_api_key(provided: &str, expected: &str) -> Result<(), AuthError> {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();

    let diff = provided
        .iter()
        .zip(expected.iter())
        .fold(provided.len() ^ expected.len(), |acc, (a, b)| {
            acc | usize::from(a ^ b)
        });

    if diff == 0 {
        Ok(())
    } else {
        Err(AuthError::InvalidKey)
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix(BEARER_PREFIX)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Decides whether a request's credential makes the caller authenticated.
pub trait AuthProvider: Send + Sync {
    /// Checks `credential`, the raw secret presented with the request, if any.
    fn authenticate(&self, credential: Option<&str>) -> Result<(), AuthError>;

    fn is_authenticated(&self, credential: Option<&str>) -> bool {
        self.authenticate(credential).is_ok()
    }
}

/// Shared-secret authentication.
///
/// Without a configured key nobody is authenticated, so restricted projects stay hidden.
#[derive(Clone)]
pub struct ApiKeyAuth {
    expected: Option<String>,
}

impl ApiKeyAuth {
    /// Blank keys are treated as unset.
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|k| !k.trim().is_empty()),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.expected.is_some()
    }
}

impl std::fmt::Debug for ApiKeyAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeyAuth")
            .field("configured", &self.is_configured())
            .finish()
    }
}

impl AuthProvider for ApiKeyAuth {
    fn authenticate(&self, credential: Option<&str>) -> Result<(), AuthError> {
        let expected = self.expected.as_deref().ok_or(AuthError::NotConfigured)?;
        let provided = credential.ok_or(AuthError::MissingCredential)?;
        validate_api_key(provided, expected)
    }
}
