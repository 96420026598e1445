//! # Contented Core
//!
//! Core logic for publishing a collection of data-analysis projects.
//!
//! A collection is a directory with one subdirectory per project; every file below a project
//! directory is a result file. This crate contains the read-only operations over that tree:
//! - Recursive enumeration of result files (`walker`)
//! - Extension-based content types (`content_type`)
//! - The open/restricted visibility policy (`visibility`)
//! - Project and file listings (`listing`)
//! - File delivery with path containment (`delivery`)
//!
//! **No API concerns**: authentication, HTML rendering and HTTP servers belong in `api-shared`
//! and `api-rest`. The core only ever sees whether a caller is authenticated.

pub mod config;
pub mod constants;
pub mod content_type;
pub mod delivery;
pub mod error;
pub mod listing;
pub mod visibility;
pub mod walker;

pub use config::CoreConfig;
pub use constants::{DEFAULT_LOGIN_URL, DEFAULT_PROJECTS_DIR};
pub use content_type::ContentKind;
pub use contented_types::{IdentifierError, ProjectId, ResultPath};
pub use delivery::{Delivery, FileDeliveryService, Payload};
pub use error::{ContentError, ContentResult};
pub use listing::ProjectListingService;
pub use visibility::Caller;
