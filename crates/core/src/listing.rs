//! Project and result-file listings.
//!
//! Backs the home page (accessible projects in the collection) and the project page (result
//! files of one project). Both listings are computed per request from the filesystem and
//! filtered through [`crate::visibility`] first.

use crate::config::{ensure_collection_root, CoreConfig};
use crate::visibility::{accessible_projects, is_accessible, Caller};
use crate::walker::relative_result_files;
use crate::{ContentError, ContentResult};
use contented_types::{ProjectId, ResultPath};
use std::fs;
use std::sync::Arc;

/// Read-only listing operations over a collection of projects.
#[derive(Clone, Debug)]
pub struct ProjectListingService {
    cfg: Arc<CoreConfig>,
}

impl ProjectListingService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Lists the projects in the collection root that `caller` may see, sorted by name.
    ///
    /// Each immediate subdirectory is a project, including symlinks to directories. Plain files
    /// at the top level, dangling links and directory names that are not valid project ids are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Configuration` if the collection root is missing or is not a
    /// directory, and `ContentError::Io` if it cannot be read.
    pub fn list_accessible_projects(&self, caller: Caller) -> ContentResult<Vec<ProjectId>> {
        let root = self.cfg.projects_dir();
        ensure_collection_root(root)?;

        let mut all = Vec::new();
        for entry in fs::read_dir(root)? {
            let entry = entry?;
            // Follows symlinks, like the project page and delivery do.
            match fs::metadata(entry.path()) {
                Ok(metadata) if metadata.is_dir() => {}
                Ok(_) => continue,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry {:?}: {}", entry.file_name(), e);
                    continue;
                }
            }

            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                tracing::debug!("skipping non UTF-8 project directory");
                continue;
            };

            match ProjectId::new(name) {
                Ok(id) => all.push(id),
                Err(e) => tracing::debug!("skipping project directory {:?}: {}", name, e),
            }
        }
        all.sort();

        let visible = accessible_projects(&all, self.cfg.restricted_projects(), caller);
        tracing::debug!(
            total = all.len(),
            visible = visible.len(),
            authenticated = caller.is_authenticated(),
            "listed projects"
        );
        Ok(visible)
    }

    /// Lists the result files of `project_id`, relative to the project directory.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ContentError::AccessDenied` if the project is restricted and `caller` is anonymous,
    /// - `ContentError::NotFound` if the project directory does not exist,
    /// - `ContentError::Io` if the walk fails part way.
    pub fn list_project_files(
        &self,
        project_id: &ProjectId,
        caller: Caller,
    ) -> ContentResult<Vec<ResultPath>> {
        if !is_accessible(project_id, self.cfg.restricted_projects(), caller) {
            tracing::warn!("refused listing of restricted project {}", project_id);
            return Err(ContentError::AccessDenied {
                project_id: project_id.clone(),
            });
        }

        let project_dir = self.cfg.project_dir(project_id);
        relative_result_files(&project_dir).map_err(|e| match e {
            ContentError::NotFound(_) => {
                ContentError::NotFound(format!("project {}", project_id))
            }
            other => other,
        })
    }
}
