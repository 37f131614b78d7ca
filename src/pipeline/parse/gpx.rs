use chrono::{DateTime, Utc};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::ParseError;
use crate::pipeline::parse::fill::{parse_heart_rate, SegmentBuilder};
use crate::pipeline::parse::timestamp::parse_timestamp;
use crate::types::track::{Segment, Track};

pub fn parse_gpx(bytes: &[u8]) -> Result<Vec<Track>, ParseError> {
    let mut reader = Reader::from_reader(bytes);
    reader.trim_text(true);

    let mut state = GpxState::default();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => state.open(&e)?,
            Ok(Event::Empty(e)) => {
                state.open(&e)?;
                state.close()?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                state.text(&text);
            }
            Ok(Event::CData(e)) => {
                let text = std::str::from_utf8(&e)
                    .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
                state.text(text);
            }
            Ok(Event::End(_)) => state.close()?,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ParseError::InvalidGpx(format!(
                    "{} (at byte {})",
                    e,
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    state.finish()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Capture {
    MetadataTime,
    TrackName,
    TrackType,
    HeartRate,
}

#[derive(Default)]
struct PartialTrack {
    names: Vec<String>,
    activity_types: Vec<String>,
    segments: Vec<Segment>,
}

struct PendingPoint {
    lat: f64,
    lon: f64,
    heart_rate: Option<u16>,
}

#[derive(Default)]
struct GpxState {
    stack: Vec<String>,
    /// Depth of the first `metadata` element while it is open.
    metadata_depth: Option<usize>,
    metadata_done: bool,
    metadata_time_seen: bool,
    metadata_time: Option<DateTime<Utc>>,
    capture: Option<(Capture, usize, String)>,
    tracks: Vec<PartialTrack>,
    track: Option<PartialTrack>,
    segment: Option<SegmentBuilder>,
    point: Option<PendingPoint>,
}

impl GpxState {
    fn open(&mut self, e: &BytesStart<'_>) -> Result<(), ParseError> {
        let name = local_name(e)?;
        self.stack.push(name.clone());
        let depth = self.stack.len();

        match name.as_str() {
            "metadata" if !self.metadata_done && self.metadata_depth.is_none() => {
                self.metadata_depth = Some(depth);
            }
            "time" if self.metadata_depth.is_some() && !self.metadata_time_seen => {
                self.metadata_time_seen = true;
                self.start_capture(Capture::MetadataTime);
            }
            "trk" => {
                if self.track.is_some() {
                    return Err(ParseError::InvalidGpx("nested <trk> element".to_string()));
                }
                self.track = Some(PartialTrack::default());
            }
            "trkseg" if self.track.is_some() => {
                self.segment = Some(SegmentBuilder::new());
            }
            "trkpt" if self.segment.is_some() => {
                let (lat, lon) = point_coordinates(e)?;
                self.point = Some(PendingPoint {
                    lat,
                    lon,
                    heart_rate: None,
                });
            }
            "trkpt" => {
                tracing::debug!("Ignoring <trkpt> outside of a track segment");
            }
            "hr" if self.point.is_some() => self.start_capture(Capture::HeartRate),
            "name" if self.track.is_some() => self.start_capture(Capture::TrackName),
            "type" if self.track.is_some() => self.start_capture(Capture::TrackType),
            _ => {}
        }
        Ok(())
    }

    fn start_capture(&mut self, kind: Capture) {
        if self.capture.is_none() {
            self.capture = Some((kind, self.stack.len(), String::new()));
        }
    }

    fn text(&mut self, text: &str) {
        let depth = self.stack.len();
        if let Some((_, capture_depth, buf)) = self.capture.as_mut() {
            // Only direct text children count, not text of nested elements.
            if *capture_depth == depth {
                buf.push_str(text);
            }
        }
    }

    fn close(&mut self) -> Result<(), ParseError> {
        let depth = self.stack.len();
        let Some(name) = self.stack.pop() else {
            return Err(ParseError::InvalidGpx("unbalanced closing tag".to_string()));
        };

        if matches!(self.capture, Some((_, d, _)) if d == depth) {
            if let Some((kind, _, text)) = self.capture.take() {
                self.finish_capture(kind, text)?;
            }
        }

        match name.as_str() {
            "metadata" if self.metadata_depth == Some(depth) => {
                self.metadata_depth = None;
                self.metadata_done = true;
            }
            "trkpt" => {
                if let (Some(point), Some(segment)) = (self.point.take(), self.segment.as_mut()) {
                    segment.push(point.lat, point.lon, point.heart_rate);
                }
            }
            "trkseg" => {
                if let (Some(segment), Some(track)) = (self.segment.take(), self.track.as_mut()) {
                    track.segments.push(segment.finish());
                }
            }
            "trk" => {
                if let Some(track) = self.track.take() {
                    self.tracks.push(track);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn finish_capture(&mut self, kind: Capture, text: String) -> Result<(), ParseError> {
        match kind {
            Capture::MetadataTime => {
                self.metadata_time = Some(parse_timestamp(&text)?);
            }
            Capture::TrackName => {
                if let Some(track) = self.track.as_mut() {
                    track.names.push(text);
                }
            }
            Capture::TrackType => {
                if let Some(track) = self.track.as_mut() {
                    track.activity_types.push(text);
                }
            }
            Capture::HeartRate => {
                if let Some(point) = self.point.as_mut() {
                    point.heart_rate = parse_heart_rate(&text);
                }
            }
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<Track>, ParseError> {
        if !self.stack.is_empty() {
            return Err(ParseError::InvalidGpx(format!(
                "unexpected end of document inside <{}>",
                self.stack.join("/")
            )));
        }
        let time = self.metadata_time.ok_or(ParseError::MissingMetadataTime)?;

        Ok(self
            .tracks
            .into_iter()
            .map(|track| Track {
                names: track.names,
                activity_types: track.activity_types,
                time,
                segments: track.segments,
            })
            .collect())
    }
}

fn local_name(e: &BytesStart<'_>) -> Result<String, ParseError> {
    let name = e.local_name();
    std::str::from_utf8(name.as_ref())
        .map(str::to_string)
        .map_err(|e| ParseError::InvalidGpx(e.to_string()))
}

fn point_coordinates(e: &BytesStart<'_>) -> Result<(f64, f64), ParseError> {
    let mut lat = None;
    let mut lon = None;

    for attr in e.attributes() {
        let attr = attr.map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;
        let value = std::str::from_utf8(&attr.value)
            .map_err(|e| ParseError::InvalidGpx(e.to_string()))?;

        match key {
            "lat" => lat = Some(parse_coordinate("lat", value)?),
            "lon" => lon = Some(parse_coordinate("lon", value)?),
            _ => {}
        }
    }

    match (lat, lon) {
        (Some(lat), Some(lon)) => Ok((lat, lon)),
        _ => Err(ParseError::InvalidGpx(
            "<trkpt> is missing lat or lon".to_string(),
        )),
    }
}

fn parse_coordinate(attribute: &str, value: &str) -> Result<f64, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidGpx(format!("invalid {attribute} value {value:?}")))
}
