use crate::types::track::Segment;

/// Builds a [`Segment`] point by point, forward-filling missing heart rates.
///
/// A point without a reading takes the last reading seen in this segment. Points
/// before the first reading are dropped along with their coordinates.
#[derive(Debug, Default)]
pub struct SegmentBuilder {
    segment: Segment,
    last_heart_rate: Option<u16>,
    dropped: usize,
}

impl SegmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the point was dropped.
    pub fn push(&mut self, lat: f64, lon: f64, heart_rate: Option<u16>) -> bool {
        let Some(heart_rate) = heart_rate.or(self.last_heart_rate) else {
            tracing::warn!(
                "Could not read heart rate for point ({}, {}), skipping point",
                lat,
                lon
            );
            self.dropped += 1;
            return false;
        };
        self.last_heart_rate = Some(heart_rate);
        self.segment.push(lat, lon, heart_rate);
        true
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn finish(self) -> Segment {
        if self.dropped > 0 {
            tracing::debug!(
                "Segment kept {} points, dropped {} without heart rate",
                self.segment.len(),
                self.dropped
            );
        }
        self.segment
    }
}

pub fn forward_fill<I>(points: I) -> Segment
where
    I: IntoIterator<Item = (f64, f64, Option<u16>)>,
{
    let mut builder = SegmentBuilder::new();
    for (lat, lon, heart_rate) in points {
        builder.push(lat, lon, heart_rate);
    }
    builder.finish()
}

/// Heart-rate extension text is numeric but not always integral; the
/// fractional part is truncated.
pub(crate) fn parse_heart_rate(text: &str) -> Option<u16> {
    let value: f64 = text.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some(value as u16)
}
