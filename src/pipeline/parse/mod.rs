mod fill;
mod gpx;
mod timestamp;

use std::path::Path;

use crate::error::ParseError;
use crate::types::track::Track;

pub use fill::{forward_fill, SegmentBuilder};
pub use timestamp::parse_timestamp;

pub fn parse(bytes: &[u8]) -> Result<Vec<Track>, ParseError> {
    gpx::parse_gpx(bytes)
}

pub fn parse_file(path: &Path) -> Result<Vec<Track>, ParseError> {
    let bytes = std::fs::read(path)?;
    parse(&bytes)
}
