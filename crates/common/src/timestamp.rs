//! Timestamp utilities.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// A wrapper around DateTime<Utc> with consistent serialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Create a new timestamp from the current time.
    pub fn now() -> Self {
        Timestamp(Utc::now())
    }

    /// Create a timestamp from a DateTime<Utc>.
    pub fn from_datetime(dt: DateTime<Utc>) -> Self {
        Timestamp(dt)
    }

    /// Create a timestamp from filesystem metadata time.
    pub fn from_system_time(t: SystemTime) -> Self {
        Timestamp(DateTime::<Utc>::from(t))
    }

    /// Get the inner DateTime<Utc>.
    pub fn inner(&self) -> DateTime<Utc> {
        self.0
    }

    /// Format as ISO 8601 string.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }

    /// Format for human-readable report output.
    pub fn to_display(&self) -> String {
        self.0.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }

    /// Parse an ISO 8601 / RFC 3339 string, normalizing to UTC.
    ///
    /// Accepts `Z` or numeric offsets; a bare datetime with no offset is
    /// taken as UTC. Returns None on anything unparseable.
    pub fn parse_iso8601(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Timestamp(dt.with_timezone(&Utc)));
        }
        for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
                return Some(Timestamp(naive.and_utc()));
            }
        }
        None
    }

    /// Parse exiftool's colon-separated date style (`2024:01:15 12:30:45`,
    /// optionally with subseconds and offset), falling back to ISO 8601.
    pub fn parse_exif(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(dt) = DateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f%z") {
            return Some(Timestamp(dt.with_timezone(&Utc)));
        }
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y:%m:%d %H:%M:%S%.f") {
            return Some(Timestamp(naive.and_utc()));
        }
        Self::parse_iso8601(s)
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_iso8601())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_serialization() {
        let ts = Timestamp::now();
        let json = serde_json::to_string(&ts).unwrap();
        let parsed: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(ts, parsed);
    }

    #[test]
    fn test_parse_iso8601_zulu() {
        let ts = Timestamp::parse_iso8601("2024-06-01T10:20:30Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-06-01T10:20:30.000Z");
    }

    #[test]
    fn test_parse_iso8601_offset_normalized_to_utc() {
        let ts = Timestamp::parse_iso8601("2024-06-01T12:20:30+02:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-06-01T10:20:30.000Z");
    }

    #[test]
    fn test_parse_iso8601_naive_taken_as_utc() {
        let ts = Timestamp::parse_iso8601("2024-06-01T10:20:30").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-06-01T10:20:30.000Z");
    }

    #[test]
    fn test_parse_iso8601_rejects_garbage() {
        assert!(Timestamp::parse_iso8601("not a date").is_none());
        assert!(Timestamp::parse_iso8601("").is_none());
    }

    #[test]
    fn test_parse_exif_colon_date() {
        let ts = Timestamp::parse_exif("2024:01:15 12:30:45").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-15T12:30:45.000Z");
    }

    #[test]
    fn test_parse_exif_with_offset() {
        let ts = Timestamp::parse_exif("2024:01:15 12:30:45+08:00").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-15T04:30:45.000Z");
    }

    #[test]
    fn test_parse_exif_with_subseconds() {
        let ts = Timestamp::parse_exif("2024:01:15 12:30:45.123").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-15T12:30:45.123Z");
    }

    #[test]
    fn test_parse_exif_falls_back_to_iso() {
        let ts = Timestamp::parse_exif("2024-01-15T12:30:45Z").unwrap();
        assert_eq!(ts.to_iso8601(), "2024-01-15T12:30:45.000Z");
        assert!(Timestamp::parse_exif("invalid").is_none());
    }
}
