//! Deterministic recursive file listing

use crate::{Error, NormalizedPath, Result};
use walkdir::WalkDir;

/// List every file under `dir` with the given extension, recursively.
///
/// Entries are visited in byte order of their names, so the result is the
/// same on every filesystem. A missing directory yields an empty list.
pub fn walk_files(dir: &NormalizedPath, extension: &str) -> Result<Vec<NormalizedPath>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let root = dir.to_native();
    let mut files = Vec::new();
    for entry in WalkDir::new(&root).follow_links(true).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::Walk {
            path: e.path().map_or_else(|| root.clone(), |p| p.to_path_buf()),
            source: e,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = NormalizedPath::new(entry.path());
        if path.extension() == Some(extension) {
            files.push(path);
        }
    }
    Ok(files)
}
