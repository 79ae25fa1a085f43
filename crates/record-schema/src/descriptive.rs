//! Descriptive tags and resolved timestamps.

use serde::{Deserialize, Serialize};
use synthprobe_common::Timestamp;

/// Where a timestamp fact came from, in descending trust order.
///
/// A signed credential action beats embedded tags, embedded tags beat
/// container-level tags, and the filesystem is last resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampSource {
    C2pa,
    Exiftool,
    Ffprobe,
    Filesystem,
}

impl TimestampSource {
    fn rank(self) -> u8 {
        match self {
            TimestampSource::C2pa => 3,
            TimestampSource::Exiftool => 2,
            TimestampSource::Ffprobe => 1,
            TimestampSource::Filesystem => 0,
        }
    }
}

impl std::fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimestampSource::C2pa => write!(f, "c2pa"),
            TimestampSource::Exiftool => write!(f, "exiftool"),
            TimestampSource::Ffprobe => write!(f, "ffprobe"),
            TimestampSource::Filesystem => write!(f, "filesystem"),
        }
    }
}

/// A timestamp with source attribution and the verbatim string it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TimestampFact {
    pub value: Option<Timestamp>,
    pub source: Option<TimestampSource>,
    /// The string exactly as the source carried it.
    pub raw: Option<String>,
}

impl TimestampFact {
    /// Record a timestamp if the slot is empty or `source` outranks the
    /// recorded one. Equal or lower rank never overwrites; rank, not
    /// arrival order, decides. Returns whether the fact was written.
    pub fn assign(
        &mut self,
        value: Timestamp,
        source: TimestampSource,
        raw: Option<String>,
    ) -> bool {
        let outranked = match self.source {
            None => true,
            Some(current) => source.rank() > current.rank(),
        };
        if self.value.is_none() || outranked {
            self.value = Some(value);
            self.source = Some(source);
            self.raw = raw;
            true
        } else {
            false
        }
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }
}

/// IPTC 2025.1 AI content declaration fields, as embedded in XMP/IPTC tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IptcAiDeclaration {
    pub ai_generated: Option<bool>,
    pub ai_system_used: Option<String>,
    pub ai_system_version: Option<String>,
    pub ai_prompt_info: Option<String>,
    pub ai_prompt_writer_name: Option<String>,
    pub ai_training_mining_usage: Option<String>,
}

impl IptcAiDeclaration {
    /// Any AI declaration present at all.
    pub fn declares_anything(&self) -> bool {
        self.ai_generated == Some(true) || self.ai_system_used.is_some()
    }
}

/// Descriptive tags accumulated across probers; first writer wins per field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct DescriptiveProfile {
    pub title: Option<String>,
    pub description: Option<String>,
    pub creator: Option<String>,
    pub copyright: Option<String>,
    /// Encoding or authoring software tag.
    pub software: Option<String>,
    pub genre: Option<String>,
    pub keywords: Vec<String>,
    pub camera_make: Option<String>,
    pub camera_model: Option<String>,
    pub gps_latitude: Option<f64>,
    pub gps_longitude: Option<f64>,
    pub gps_altitude: Option<f64>,
    pub location_name: Option<String>,
    pub iptc_ai: IptcAiDeclaration,
    pub creation_timestamp: TimestampFact,
    pub modification_timestamp: TimestampFact,
}

impl DescriptiveProfile {
    pub fn has_gps(&self) -> bool {
        self.gps_latitude.is_some() && self.gps_longitude.is_some()
    }
}
