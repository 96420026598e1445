//! # API Shared
//!
//! Shared definitions for the contented API surfaces.
//!
//! Contains:
//! - Authentication (`AuthProvider`, `ApiKeyAuth`)
//! - The health service
//! - JSON response bodies with OpenAPI schemas
//!
//! Used by `api-rest` and `contented-cli`.

pub mod auth;
pub mod health;
pub mod responses;

pub use auth::{ApiKeyAuth, AuthError, AuthProvider};
pub use health::{HealthRes, HealthService};
pub use responses::{ErrorRes, ListFilesRes, ListProjectsRes};
