//! Constants used throughout the contented core crate.

/// Default collection root when no explicit directory is configured.
pub const DEFAULT_PROJECTS_DIR: &str = "projects";

/// Default redirect target for callers refused access to a restricted project.
pub const DEFAULT_LOGIN_URL: &str = "/accounts/login/";

/// Separator between entries of the `RESTRICTED_PROJECTS` environment value.
pub const RESTRICTED_PROJECTS_SEPARATOR: char = ',';

/// Content type used for any extension without an explicit mapping.
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";
