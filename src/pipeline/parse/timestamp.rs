use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::ParseError;

/// Parses the ISO-8601 forms found in GPX metadata and on the command line.
///
/// Accepted: `2020-01-01T10:00:00.000Z`, `2020-01-01T10:00:00+02:00` (fraction
/// optional, offset with or without colon), `2020-01-01T10:00:00` and
/// `2020-01-01`. Values without an offset are taken as UTC.
pub fn parse_timestamp(input: &str) -> Result<DateTime<Utc>, ParseError> {
    let s = input.trim();

    if s.contains('T') {
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z") {
            return Ok(dt.with_timezone(&Utc));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    } else if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(ParseError::InvalidTimestamp(s.to_string()))
}

