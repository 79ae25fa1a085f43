//! Verbatim collaborator outputs, kept for audit and debugging only.
//!
//! Nothing in the fusion path reads these back; every fact that feeds the
//! verdict lives in a typed section of the record.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use synthprobe_mp4box::BoxRecord;

/// Raw tool outputs and structural dumps for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawArtifacts {
    /// Full ffprobe JSON document.
    pub ffprobe: Option<Value>,
    /// Full exiftool JSON document (first array element).
    pub exiftool: Option<Value>,
    /// Full credential manifest store JSON.
    pub c2pa_manifest: Option<Value>,
    /// Container-level tags as reported by the technical prober.
    pub format_tags: BTreeMap<String, String>,
    /// Flattened box tree for MP4-family containers.
    pub box_structure: Vec<BoxRecord>,
    /// Interesting printable strings found in the file (full mode).
    pub strings: Vec<String>,
}
