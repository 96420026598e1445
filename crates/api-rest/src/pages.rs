//! Browser-facing routes: home page, project page and result files.

use crate::auth::CallerIdentity;
use crate::error::PageError;
use crate::{run_blocking, AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::{Html, IntoResponse, Response},
};
use contented_core::{ContentError, Delivery, Payload, ProjectId, ResultPath};
use tokio_util::io::ReaderStream;

/// Home page listing the projects visible to the caller.
#[axum::debug_handler]
pub async fn home(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
) -> Result<Html<String>, PageError> {
    let listing = state.listing.clone();
    let projects = run_blocking(move || listing.list_accessible_projects(caller))
        .await
        .map_err(|e| state.page_error(e))?;

    Ok(Html(state.renderer.home(&projects)))
}

/// Project page listing every result file in the project.
///
/// Anonymous callers are redirected to the login location for restricted projects.
#[axum::debug_handler]
pub async fn project(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path(project_id): Path<String>,
) -> Result<Html<String>, PageError> {
    let project_id = ProjectId::new(&project_id)
        .map_err(|e| state.page_error(ContentError::from(e)))?;

    let listing = state.listing.clone();
    let id = project_id.clone();
    let files = run_blocking(move || listing.list_project_files(&id, caller))
        .await
        .map_err(|e| state.page_error(e))?;

    Ok(Html(state.renderer.project(&project_id, &files)))
}

/// A single result file, with a content type derived from its extension.
///
/// Binary files are streamed from disk; text files are sent whole.
#[axum::debug_handler]
pub async fn result_file(
    State(state): State<AppState>,
    CallerIdentity(caller): CallerIdentity,
    Path((project_id, file_path)): Path<(String, String)>,
) -> Result<Response, PageError> {
    let project_id = ProjectId::new(&project_id)
        .map_err(|e| state.page_error(ContentError::from(e)))?;
    let file_path = file_path.strip_prefix('/').unwrap_or(&file_path);
    let file_path =
        ResultPath::new(file_path).map_err(|e| state.page_error(ContentError::from(e)))?;

    let delivery = state.delivery.clone();
    let delivered = run_blocking(move || delivery.deliver(&project_id, &file_path, caller))
        .await
        .map_err(|e| state.page_error(e))?;

    Ok(delivery_response(delivered))
}

fn delivery_response(delivery: Delivery) -> Response {
    let content_type = delivery.content_type().to_string();
    match delivery.payload {
        Payload::Binary { file, len } => {
            let stream = ReaderStream::new(tokio::fs::File::from_std(file));
            (
                [
                    (header::CONTENT_TYPE, content_type),
                    (header::CONTENT_LENGTH, len.to_string()),
                ],
                Body::from_stream(stream),
            )
                .into_response()
        }
        Payload::Text(text) => ([(header::CONTENT_TYPE, content_type)], text).into_response(),
    }
}
