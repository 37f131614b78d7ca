use std::path::{Path, PathBuf};

use crate::error::DiscoverError;

const GPX_SUFFIX: &str = ".gpx";

/// Regular files in `dir` whose name ends in `.gpx`, sorted by file name.
pub fn gpx_files(dir: &Path) -> Result<Vec<PathBuf>, DiscoverError> {
    let read_err = |source| DiscoverError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            tracing::debug!("Skipping non-UTF-8 file name {:?}", file_name);
            continue;
        };
        if !name.ends_with(GPX_SUFFIX) {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        files.push(path);
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    tracing::debug!("Found {} GPX files in {}", files.len(), dir.display());
    Ok(files)
}
