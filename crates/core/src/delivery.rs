//! Result-file delivery.
//!
//! Resolves a `(project, relative path)` pair to a file under the collection root and hands
//! back either an open file handle (binary kinds, streamed by the caller) or the decoded text.
//!
//! # Containment
//!
//! [`ProjectId`] and [`ResultPath`] already rule out lexical escapes (`..`, absolute paths,
//! separators inside a project id). Symlinks are handled by canonicalising both the project
//! directory and the resolved file and requiring the latter to stay inside the former, so a link
//! that points within the project is served and one that points elsewhere is refused.

use crate::config::CoreConfig;
use crate::content_type::ContentKind;
use crate::visibility::{is_accessible, Caller};
use crate::{ContentError, ContentResult};
use contented_types::{ProjectId, ResultPath};
use std::fs;
use std::io::Read;
use std::sync::Arc;

/// Body of a delivered file.
#[derive(Debug)]
pub enum Payload {
    /// Open handle positioned at the start of the file. The handle is closed when dropped.
    Binary { file: fs::File, len: u64 },
    /// Whole file decoded as UTF-8.
    Text(String),
}

impl Payload {
    /// Materialises the payload as bytes, reading binary files to the end.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Io` if reading a binary file fails.
    pub fn into_bytes(self) -> ContentResult<Vec<u8>> {
        match self {
            Payload::Binary { mut file, len } => {
                let mut buffer = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
                file.read_to_end(&mut buffer)?;
                Ok(buffer)
            }
            Payload::Text(text) => Ok(text.into_bytes()),
        }
    }
}

/// A result file ready to be written to the caller.
#[derive(Debug)]
pub struct Delivery {
    pub kind: ContentKind,
    pub payload: Payload,
}

impl Delivery {
    pub fn content_type(&self) -> &'static str {
        self.kind.content_type()
    }
}

/// Serves individual result files.
#[derive(Clone, Debug)]
pub struct FileDeliveryService {
    cfg: Arc<CoreConfig>,
}

impl FileDeliveryService {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self { cfg }
    }

    /// Resolves and opens `relative_path` inside `project_id`.
    ///
    /// # Errors
    ///
    /// Returns:
    /// - `ContentError::AccessDenied` if the project is restricted and `caller` is anonymous,
    /// - `ContentError::NotFound` if the project or file does not exist, or the path names a
    ///   directory,
    /// - `ContentError::InvalidPath` if the file resolves outside the project directory,
    /// - `ContentError::Decode` if a text file is not valid UTF-8,
    /// - `ContentError::Io` for any other read failure.
    pub fn deliver(
        &self,
        project_id: &ProjectId,
        relative_path: &ResultPath,
        caller: Caller,
    ) -> ContentResult<Delivery> {
        if !is_accessible(project_id, self.cfg.restricted_projects(), caller) {
            tracing::warn!(
                "refused delivery of {} from restricted project {}",
                relative_path,
                project_id
            );
            return Err(ContentError::AccessDenied {
                project_id: project_id.clone(),
            });
        }

        let project_dir = self.cfg.project_dir(project_id);
        let file_path = project_dir.join(relative_path.to_path_buf());
        let kind = ContentKind::from_file_name(relative_path.file_name());

        let project_dir = project_dir
            .canonicalize()
            .map_err(|e| ContentError::from_io(e, &project_dir))?;
        let file_path = file_path
            .canonicalize()
            .map_err(|e| ContentError::from_io(e, &file_path))?;

        if !file_path.starts_with(&project_dir) {
            tracing::warn!(
                "refused {} in project {}: resolves outside the project directory",
                relative_path,
                project_id
            );
            return Err(ContentError::InvalidPath(relative_path.to_string()));
        }

        let file = fs::File::open(&file_path).map_err(|e| ContentError::from_io(e, &file_path))?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(ContentError::NotFound(format!(
                "not a regular file: {}",
                file_path.display()
            )));
        }

        tracing::debug!(
            project = %project_id,
            path = %relative_path,
            content_type = kind.content_type(),
            bytes = metadata.len(),
            "delivering result file"
        );

        let payload = if kind.is_binary() {
            Payload::Binary {
                file,
                len: metadata.len(),
            }
        } else {
            Payload::Text(read_text(file, metadata.len(), &file_path)?)
        };

        Ok(Delivery { kind, payload })
    }
}

fn read_text(
    mut file: fs::File,
    len: u64,
    path: &std::path::Path,
) -> ContentResult<String> {
    let mut buffer = Vec::with_capacity(usize::try_from(len).unwrap_or(0));
    file.read_to_end(&mut buffer)?;
    String::from_utf8(buffer).map_err(|source| ContentError::Decode {
        path: path.to_path_buf(),
        source,
    })
}
