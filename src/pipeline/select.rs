use chrono::{DateTime, Utc};

use crate::types::track::{Segment, Track};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    TooOld,
    /// Carries the track's activity type, empty when the track has none.
    WrongActivity(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::TooOld => write!(f, "too old"),
            Rejection::WrongActivity(kind) => write!(f, "wrong type ({kind:?})"),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrackFilter {
    pub since: Option<DateTime<Utc>>,
    /// Accepted activity types. Empty accepts everything.
    pub activities: Vec<String>,
}

impl TrackFilter {
    pub fn accepts(&self, track: &Track) -> Result<(), Rejection> {
        if let Some(since) = self.since {
            if track.time < since {
                return Err(Rejection::TooOld);
            }
        }

        if !self.activities.is_empty() {
            let kind = track.activity_type().unwrap_or_default();
            if !self.activities.iter().any(|accepted| accepted == kind) {
                return Err(Rejection::WrongActivity(kind.to_string()));
            }
        }

        Ok(())
    }

    /// Keeps accepted tracks, logging why each other track was skipped.
    pub fn apply(&self, tracks: Vec<Track>) -> Vec<Track> {
        tracks
            .into_iter()
            .filter(|track| match self.accepts(track) {
                Ok(()) => true,
                Err(reason) => {
                    tracing::info!(
                        "Skipping track {:?}, {}",
                        track.name().unwrap_or("<unnamed>"),
                        reason
                    );
                    false
                }
            })
            .collect()
    }
}

/// Moves every segment out of its track, naming it after the track.
pub fn flatten(tracks: Vec<Track>) -> Vec<Segment> {
    let mut segments = Vec::new();
    for track in tracks {
        let name = track.name().map(str::to_string);
        for mut segment in track.segments {
            if segment.is_empty() {
                tracing::warn!(
                    "Dropping empty segment of track {:?}",
                    name.as_deref().unwrap_or("<unnamed>")
                );
                continue;
            }
            segment.set_name(name.clone());
            segments.push(segment);
        }
    }
    segments
}
