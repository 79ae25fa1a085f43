//! The evidence record shared by every extractor.

use crate::{
    AiVerdict, DescriptiveProfile, FileDescriptor, ProvenanceProfile, RawArtifacts,
    TechnicalProfile, WatermarkDetection,
};
use serde::{Deserialize, Serialize};

/// Everything synthprobe knows about one media file.
///
/// Extractors receive this by `&mut` and write into their sections; nothing
/// in here depends on wall-clock time or run identity, so analyzing the
/// same file twice with the same extractor set serializes byte-identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaRecord {
    /// Schema version for forward compatibility.
    pub schema_version: String,
    pub file_info: FileDescriptor,
    pub technical: TechnicalProfile,
    pub descriptive: DescriptiveProfile,
    pub provenance: ProvenanceProfile,
    pub ai_verdict: AiVerdict,
    pub raw: RawArtifacts,
}

pub const SCHEMA_VERSION: &str = "1.0.0";

impl MediaRecord {
    /// Create an empty record around file facts.
    pub fn new(file_info: FileDescriptor) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            file_info,
            technical: TechnicalProfile::default(),
            descriptive: DescriptiveProfile::default(),
            provenance: ProvenanceProfile::default(),
            ai_verdict: AiVerdict::default(),
            raw: RawArtifacts::default(),
        }
    }

    /// Merge an externally produced watermark detection: aggregate it under
    /// provenance and surface a verdict signal when positive.
    pub fn attach_watermark(&mut self, detection: WatermarkDetection) {
        if detection.detected {
            let kind = detection
                .watermark_type
                .map(|k| k.to_string())
                .unwrap_or_else(|| "media".to_string());
            self.ai_verdict.add_signal(
                format!("watermark_{}", detection.detector),
                true,
                detection.confidence,
                format!("{} watermark detected ({kind})", detection.detector),
                false,
            );
        }
        self.provenance.watermarks.add_detection(detection);
    }

    /// Serialize with stable key order.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
