//! Recursive enumeration of a project's result files.

use crate::{ContentError, ContentResult};
use contented_types::ResultPath;
use std::fs;
use std::path::Path;

/// Lists every regular file at or below `dir`, relative to `dir`.
///
/// Paths use `/` between segments on every platform. The result is sorted, so repeated walks
/// of an unchanged directory agree. Symlinks are neither followed nor listed, and special files
/// (fifos, sockets, devices) are skipped. Entries whose names are not valid UTF-8 cannot be
/// addressed by URL and are skipped too.
///
/// # Errors
///
/// Returns `ContentError::NotFound` if `dir` does not exist or is not a directory, and
/// `ContentError::Io` if any directory in the subtree cannot be read. A failure anywhere fails
/// the whole walk.
pub fn relative_result_files(dir: &Path) -> ContentResult<Vec<ResultPath>> {
    let metadata = fs::metadata(dir).map_err(|e| ContentError::from_io(e, dir))?;
    if !metadata.is_dir() {
        return Err(ContentError::NotFound(format!(
            "not a directory: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    let mut prefix = Vec::new();
    walk(dir, &mut prefix, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk(path: &Path, prefix: &mut Vec<String>, files: &mut Vec<ResultPath>) -> ContentResult<()> {
    for entry in fs::read_dir(path)? {
        let entry = entry?;
        let file_type = entry.file_type()?;

        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::debug!("skipping non UTF-8 entry under {}", path.display());
            continue;
        };

        if file_type.is_file() {
            prefix.push(name);
            match ResultPath::from_segments(prefix.iter()) {
                Ok(result_path) => files.push(result_path),
                Err(e) => tracing::debug!("skipping unaddressable file {:?}: {}", prefix, e),
            }
            prefix.pop();
        } else if file_type.is_dir() {
            prefix.push(name);
            walk(&entry.path(), prefix, files)?;
            prefix.pop();
        }
    }

    Ok(())
}
