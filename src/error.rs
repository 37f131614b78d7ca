use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum DiscoverError {
    #[error("Cannot read directory {}: {source}", .path.display())]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid GPX: {0}")]
    InvalidGpx(String),
    #[error("No metadata/time element found in file")]
    MissingMetadataTime,
    #[error("Unrecognized timestamp: {0:?}")]
    InvalidTimestamp(String),
    #[error("Cannot read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("GeoJSON serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Invalid render options: {0}")]
    InvalidOptions(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("Cannot write map to {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    #[error("Failed to parse {}: {source}", .path.display())]
    ParseFile { path: PathBuf, source: ParseError },
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
