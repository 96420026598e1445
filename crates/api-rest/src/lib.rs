//! # API REST
//!
//! HTTP surface for contented.
//!
//! Handles:
//! - HTML pages (`/`, `/projects/:project_id`) via a pluggable [`render::Renderer`]
//! - Result-file delivery (`/projects/:project_id/*file_path`), streaming binary files
//! - JSON listings and health (`/api/...`, `/health`) with an OpenAPI document
//!
//! Uses `api-shared` for authentication and response bodies, and `contented-core` for every
//! filesystem decision.

#![warn(rust_2018_idioms)]

pub mod api;
pub mod auth;
pub mod error;
pub mod pages;
pub mod render;

use api_shared::AuthProvider;
use axum::{routing::get, Json, Router};
use contented_core::{
    ContentError, ContentResult, CoreConfig, FileDeliveryService, ProjectListingService,
};
use error::PageError;
use render::{HtmlRenderer, Renderer};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    listing: ProjectListingService,
    delivery: FileDeliveryService,
    auth: Arc<dyn AuthProvider>,
    renderer: Arc<dyn Renderer>,
}

impl AppState {
    /// Builds the state with the built-in HTML renderer.
    pub fn new(cfg: Arc<CoreConfig>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            listing: ProjectListingService::new(cfg.clone()),
            delivery: FileDeliveryService::new(cfg.clone()),
            cfg,
            auth,
            renderer: Arc::new(HtmlRenderer),
        }
    }

    /// Replaces the page renderer.
    pub fn with_renderer(mut self, renderer: Arc<dyn Renderer>) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    fn page_error(&self, err: ContentError) -> PageError {
        PageError::from_content(err, self.cfg.login_url())
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(api::health, api::list_projects, api::list_files),
    components(schemas(
        api_shared::HealthRes,
        api_shared::ListProjectsRes,
        api_shared::ListFilesRes,
        api_shared::ErrorRes
    ))
)]
pub struct ApiDoc;

/// Builds the full router with request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/projects/:project_id", get(pages::project))
        .route("/projects/:project_id/*file_path", get(pages::result_file))
        .route("/health", get(api::health))
        .route("/api/projects", get(api::list_projects))
        .route("/api/projects/:project_id", get(api::list_files))
        .route("/api-docs/openapi.json", get(openapi_document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn openapi_document() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Runs a filesystem-bound core operation on the blocking pool.
pub(crate) async fn run_blocking<T, F>(f: F) -> ContentResult<T>
where
    F: FnOnce() -> ContentResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ContentError::Io(std::io::Error::other(e)))?
}
