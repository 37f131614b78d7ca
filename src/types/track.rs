use chrono::{DateTime, Utc};

/// One `trk` element of a GPX file.
#[derive(Debug, Clone)]
pub struct Track {
    /// Text of every `name` element inside the track, in document order.
    pub names: Vec<String>,
    /// Text of every `type` element inside the track, in document order.
    pub activity_types: Vec<String>,
    /// Recording time taken from the file's `metadata/time`.
    pub time: DateTime<Utc>,
    pub segments: Vec<Segment>,
}

impl Track {
    pub fn name(&self) -> Option<&str> {
        self.names.first().map(String::as_str)
    }

    pub fn activity_type(&self) -> Option<&str> {
        self.activity_types.first().map(String::as_str)
    }

    pub fn point_count(&self) -> usize {
        self.segments.iter().map(Segment::len).sum()
    }
}

/// Parallel arrays of the points of one `trkseg`.
///
/// Fields are private so the three arrays can only grow together.
#[derive(Debug, Clone, Default)]
pub struct Segment {
    name: Option<String>,
    lat: Vec<f64>,
    lon: Vec<f64>,
    heart_rate: Vec<u16>,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, lat: f64, lon: f64, heart_rate: u16) {
        self.lat.push(lat);
        self.lon.push(lon);
        self.heart_rate.push(heart_rate);
    }

    pub fn lat(&self) -> &[f64] {
        &self.lat
    }

    pub fn lon(&self) -> &[f64] {
        &self.lon
    }

    pub fn heart_rate(&self) -> &[u16] {
        &self.heart_rate
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn set_name(&mut self, name: Option<String>) {
        self.name = name;
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }

    /// `(min_lon, max_lon, min_lat, max_lat)`, or `None` for an empty segment.
    pub fn extent(&self) -> Option<(f64, f64, f64, f64)> {
        if self.is_empty() {
            return None;
        }
        let min_lon = self.lon.iter().copied().fold(f64::INFINITY, f64::min);
        let max_lon = self.lon.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min_lat = self.lat.iter().copied().fold(f64::INFINITY, f64::min);
        let max_lat = self.lat.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some((min_lon, max_lon, min_lat, max_lat))
    }

    pub fn heart_rate_range(&self) -> Option<(u16, u16)> {
        let min = self.heart_rate.iter().copied().min()?;
        let max = self.heart_rate.iter().copied().max()?;
        Some((min, max))
    }
}
