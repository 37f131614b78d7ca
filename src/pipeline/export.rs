use std::path::Path;

use crate::error::ExportError;

pub fn write_map(html: &str, path: &Path) -> Result<(), ExportError> {
    std::fs::write(path, html).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!("Wrote map to {} ({} bytes)", path.display(), html.len());
    Ok(())
}

/// Opens the map with the platform's default handler. Failure only logs.
pub fn open_in_browser(path: &Path) {
    tracing::info!("Opening {} in a browser", path.display());
    if let Err(e) = open::that(path) {
        tracing::warn!("Could not open {} in a browser: {}", path.display(), e);
    }
}
