use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use api_shared::ApiKeyAuth;
use contented_core::{
    config::{login_url_from_env_value, restricted_projects_from_env_value},
    CoreConfig, DEFAULT_PROJECTS_DIR,
};

/// Main entry point for the contented web application
///
/// Serves the home page, project pages and result files of one collection of projects.
///
/// # Environment Variables
/// - `CONTENTED_ADDR`: server address (default: "0.0.0.0:3000")
/// - `PROJECTS_DIR`: collection root, one subdirectory per project (default: "projects")
/// - `RESTRICTED_PROJECTS`: comma-separated project ids visible only to authenticated callers
/// - `LOGIN_URL`: redirect target for restricted pages (default: "/accounts/login/")
/// - `API_KEY`: credential that makes a caller authenticated
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the collection root is missing or a restricted project id is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("contented=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("CONTENTED_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());

    let projects_dir = std::env::var("PROJECTS_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROJECTS_DIR));
    let restricted = restricted_projects_from_env_value(std::env::var("RESTRICTED_PROJECTS").ok())?;
    let login_url = login_url_from_env_value(std::env::var("LOGIN_URL").ok());

    let cfg = Arc::new(CoreConfig::new(projects_dir, restricted, login_url)?);

    let auth = ApiKeyAuth::new(std::env::var("API_KEY").ok());
    if !auth.is_configured() {
        tracing::warn!("API_KEY not set: restricted projects are hidden from every caller");
    }

    tracing::info!(
        "++ Serving {} ({} restricted) on {}",
        cfg.projects_dir().display(),
        cfg.restricted_projects().len(),
        addr
    );

    let app = router(AppState::new(cfg, Arc::new(auth)));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
