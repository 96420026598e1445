//! Machine-readable routes: health and JSON listings.

use crate::auth::CallerIdentity;
use crate::error::JsonError;
use crate::{run_blocking, AppState};
use api_shared::{HealthRes, HealthService, ListFilesRes, ListProjectsRes};
use axum::{
    extract::{Path, State},
    response::Json,
};
use contented_core::{ContentError, ProjectId};

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint
///
/// Used for monitoring and load balancer health checks. Does not touch the filesystem.
#[axum::debug_handler]
pub async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    get,
    path = "/api/projects",
    responses(
        (status = 200, description = "Projects visible to the caller", body = ListProjectsRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// List the projects visible to the caller
///
/// # Errors
/// Returns `500 Internal Server Error` if the collection root cannot be read.
#[axum::debug_handler]
pub async fn list_projects(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
) -> Result<Json<ListProjectsRes>, JsonError> {
    let listing = state.listing.clone();
    let projects = run_blocking(move || listing.list_accessible_projects(caller)).await?;

    Ok(Json(ListProjectsRes {
        projects: projects.into_iter().map(|p| p.to_string()).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/api/projects/{project_id}",
    params(
        ("project_id" = String, Path, description = "Project directory name")
    ),
    responses(
        (status = 200, description = "Result files of the project", body = ListFilesRes),
        (status = 400, description = "Invalid project id", body = api_shared::ErrorRes),
        (status = 401, description = "Project is restricted", body = api_shared::ErrorRes),
        (status = 404, description = "Project not found", body = api_shared::ErrorRes),
        (status = 500, description = "Internal server error", body = api_shared::ErrorRes)
    )
)]
/// List the result files of a project
///
/// # Errors
/// Returns:
/// - `401 Unauthorized` if the project is restricted and the caller is anonymous,
/// - `404 Not Found` if the project does not exist.
#[axum::debug_handler]
pub async fn list_files(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(project_id): Path<String>,
) -> Result<Json<ListFilesRes>, JsonError> {
    let project_id = ProjectId::new(&project_id).map_err(ContentError::from)?;

    let listing = state.listing.clone();
    let id = project_id.clone();
    let files = run_blocking(move || listing.list_project_files(&id, caller)).await?;

    Ok(Json(ListFilesRes {
        project_id: project_id.to_string(),
        files: files.into_iter().map(|f| f.to_string()).collect(),
    }))
}
