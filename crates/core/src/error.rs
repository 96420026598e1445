use contented_types::{IdentifierError, ProjectId};
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("access denied to project: {project_id}")]
    AccessDenied { project_id: ProjectId },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error(
        "failed to decode file as UTF-8 text (path: {path})",
        path = path.display()
    )]
    Decode {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<IdentifierError> for ContentError {
    fn from(err: IdentifierError) -> Self {
        ContentError::InvalidPath(err.to_string())
    }
}

impl ContentError {
    /// Maps an I/O error on `path` into `NotFound` when the path is missing, `Io` otherwise.
    ///
    /// A path that runs through a regular file (`abc.csv/extra`) fails with `NotADirectory`
    /// and counts as missing too.
    pub(crate) fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::NotADirectory => {
                ContentError::NotFound(path.display().to_string())
            }
            _ => ContentError::Io(err),
        }
    }
}

pub type ContentResult<T> = std::result::Result<T, ContentError>;
