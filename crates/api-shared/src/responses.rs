//! JSON bodies for the machine-readable listing endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Projects visible to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListProjectsRes {
    pub projects: Vec<String>,
}

/// Result files of one project, relative to the project directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ListFilesRes {
    pub project_id: String,
    pub files: Vec<String>,
}

/// Error body returned by the JSON endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}
