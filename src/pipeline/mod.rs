pub mod discover;
pub mod export;
pub mod outliers;
pub mod parse;
pub mod render;
pub mod select;

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::error::AppError;
use crate::pipeline::select::TrackFilter;
use crate::types::map::{OutlierParams, RenderOptions};
use crate::types::track::{Segment, Track};

/// Everything one run needs besides the input directory.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub filter: TrackFilter,
    /// `None` disables the outlier filter.
    pub outliers: Option<OutlierParams>,
    pub render: RenderOptions,
}

/// Reads every GPX file in `dir` and keeps the tracks `filter` accepts.
pub fn load_tracks(dir: &Path, filter: &TrackFilter) -> Result<Vec<Track>, AppError> {
    let files = discover::gpx_files(dir)?;
    let total = files.len();
    let mut tracks = Vec::new();

    for (k, path) in files.iter().enumerate() {
        let start = Instant::now();
        tracing::info!("Reading file {}/{}: {}", k + 1, total, path.display());
        let file_tracks = parse::parse_file(path).map_err(|source| AppError::ParseFile {
            path: path.clone(),
            source,
        })?;
        let kept = filter.apply(file_tracks);
        tracing::info!(
            "Read {} in {:.2} seconds, kept {} tracks with {} points",
            path.display(),
            start.elapsed().as_secs_f64(),
            kept.len(),
            kept.iter().map(Track::point_count).sum::<usize>()
        );
        tracks.extend(kept);
    }

    Ok(tracks)
}

/// Directory of GPX files to finished HTML document.
pub fn build_map(dir: &Path, options: &RunOptions) -> Result<(String, usize), AppError> {
    let tracks = load_tracks(dir, &options.filter)?;
    let mut segments: Vec<Segment> = select::flatten(tracks);

    if let Some(params) = options.outliers.as_ref() {
        segments = outliers::filter_outliers(segments, params);
    }

    let html = render::render_html(&segments, &options.render)?;
    Ok((html, segments.len()))
}

/// Builds the map and writes it to `output`.
pub fn run(dir: &Path, output: &Path, options: &RunOptions) -> Result<PathBuf, AppError> {
    let (html, segment_count) = build_map(dir, options)?;
    tracing::info!("Saving map with {} segments", segment_count);
    export::write_map(&html, output)?;
    Ok(output.to_path_buf())
}
