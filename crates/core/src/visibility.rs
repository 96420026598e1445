//! Project visibility policy.
//!
//! The single authority on whether a caller may see a project. Services call into this module
//! before touching the filesystem; nothing here performs I/O.
//!
//! A project is either open (visible to everyone) or restricted (visible only to authenticated
//! callers). An empty restricted set means every project is open.

use contented_types::ProjectId;
use std::collections::BTreeSet;

/// Identity of the caller as far as the core is concerned.
///
/// Credentials are checked by the authentication collaborator at the API boundary; the core
/// only ever sees the outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Caller {
    authenticated: bool,
}

impl Caller {
    pub fn anonymous() -> Self {
        Self {
            authenticated: false,
        }
    }

    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
        }
    }

    pub fn from_flag(authenticated: bool) -> Self {
        Self { authenticated }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

/// Returns the subset of `all_project_ids` the caller may see, preserving order.
pub fn accessible_projects(
    all_project_ids: &[ProjectId],
    restricted: &BTreeSet<ProjectId>,
    caller: Caller,
) -> Vec<ProjectId> {
    if caller.is_authenticated() || restricted.is_empty() {
        return all_project_ids.to_vec();
    }

    all_project_ids
        .iter()
        .filter(|id| !restricted.contains(*id))
        .cloned()
        .collect()
}

/// True unless `project_id` is restricted and the caller is not authenticated.
pub fn is_accessible(
    project_id: &ProjectId,
    restricted: &BTreeSet<ProjectId>,
    caller: Caller,
) -> bool {
    caller.is_authenticated() || !restricted.contains(project_id)
}
