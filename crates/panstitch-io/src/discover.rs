//! Input discovery: the `directory/*.extension` listing.

use std::path::{Path, PathBuf};

use crate::error::RunError;

/// List the files in `directory` whose name ends in `.{extension}`.
///
/// Matching is case-sensitive and non-recursive. Hidden files (leading
/// `.`) and anything that is not a regular file are skipped, as a shell
/// glob would. Names are compared as raw bytes, so a file whose name is
/// not valid UTF-8 still matches. The result is sorted by path so runs are reproducible
/// regardless of the order the filesystem lists entries in. An empty
/// `directory` means the current working directory.
///
/// An empty result is not an error; the caller decides whether enough
/// images were found.
///
/// # Errors
///
/// Returns [`RunError::DirectoryRead`] if `directory` cannot be listed.
pub fn discover(directory: &Path, extension: &str) -> Result<Vec<PathBuf>, RunError> {
    let base = if directory.as_os_str().is_empty() {
        Path::new(".")
    } else {
        directory
    };
    let suffix = format!(".{extension}");

    let entries = std::fs::read_dir(base).map_err(|source| RunError::DirectoryRead {
        path: base.to_path_buf(),
        source,
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| RunError::DirectoryRead {
            path: base.to_path_buf(),
            source,
        })?;
        let name = entry.file_name();
        let name = name.as_encoded_bytes();
        if !name.ends_with(suffix.as_bytes()) {
            continue;
        }
        let path = entry.path();
        if name.starts_with(b".") {
            log::debug!("Skipping hidden file {}", path.display());
            continue;
        }
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    for path in &paths {
        log::debug!("Image path: {}", path.display());
    }
    Ok(paths)
}
