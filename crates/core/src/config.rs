//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services as an
//! `Arc<CoreConfig>`. Request handling never reads process-wide environment variables, so tests
//! can run services against different collection roots side by side.

use crate::constants::{DEFAULT_LOGIN_URL, RESTRICTED_PROJECTS_SEPARATOR};
use crate::{ContentError, ContentResult};
use contented_types::ProjectId;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    projects_dir: PathBuf,
    restricted_projects: BTreeSet<ProjectId>,
    login_url: String,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Configuration` if:
    /// - `projects_dir` does not exist or is not a directory,
    /// - `login_url` is empty or whitespace.
    pub fn new(
        projects_dir: PathBuf,
        restricted_projects: BTreeSet<ProjectId>,
        login_url: String,
    ) -> ContentResult<Self> {
        ensure_collection_root(&projects_dir)?;

        if login_url.trim().is_empty() {
            return Err(ContentError::Configuration(
                "login_url cannot be empty".into(),
            ));
        }

        Ok(Self {
            projects_dir,
            restricted_projects,
            login_url,
        })
    }

    pub fn projects_dir(&self) -> &Path {
        &self.projects_dir
    }

    pub fn restricted_projects(&self) -> &BTreeSet<ProjectId> {
        &self.restricted_projects
    }

    pub fn login_url(&self) -> &str {
        &self.login_url
    }

    /// Directory for a single project. The id is a single path component, so the result is
    /// always a direct child of the collection root.
    pub fn project_dir(&self, project_id: &ProjectId) -> PathBuf {
        self.projects_dir.join(project_id.as_str())
    }
}

/// Checks that the collection root exists and is a directory.
pub(crate) fn ensure_collection_root(projects_dir: &Path) -> ContentResult<()> {
    if !projects_dir.exists() {
        return Err(ContentError::Configuration(format!(
            "projects directory does not exist: {}",
            projects_dir.display()
        )));
    }

    if !projects_dir.is_dir() {
        return Err(ContentError::Configuration(format!(
            "projects path is not a directory: {}",
            projects_dir.display()
        )));
    }

    Ok(())
}

/// Parse the restricted-project set from an optional comma-separated string value.
///
/// `None`, empty and whitespace-only values give an empty set. Entries are trimmed and empty
/// entries are ignored, so `"a, b,"` is `{a, b}`.
///
/// # Errors
///
/// Returns `ContentError::Configuration` if an entry is not a valid project id.
pub fn restricted_projects_from_env_value(
    value: Option<String>,
) -> ContentResult<BTreeSet<ProjectId>> {
    let Some(value) = value else {
        return Ok(BTreeSet::new());
    };

    value
        .split(RESTRICTED_PROJECTS_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            ProjectId::new(entry).map_err(|e| {
                ContentError::Configuration(format!("invalid restricted project {entry:?}: {e}"))
            })
        })
        .collect()
}

/// Parse the login redirect target from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_LOGIN_URL`].
pub fn login_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_LOGIN_URL.into())
}
