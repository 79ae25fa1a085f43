//! Intake of externally produced watermark detections.
//!
//! Watermark model inference runs elsewhere; this reads a detector run's
//! JSON results and merges them into the analyzed record. Both a bare
//! detection array and the aggregate object detector runners emit
//! (`{"detections": [...]}`) are accepted.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use synthprobe_record_schema::WatermarkDetection;

#[derive(Deserialize)]
struct DetectionsDocument {
    #[serde(default)]
    detections: Vec<WatermarkDetection>,
}

/// Load watermark detections from a results file.
pub fn load_detections(path: &Path) -> Result<Vec<WatermarkDetection>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read watermark file {}", path.display()))?;
    parse_detections(&content)
        .with_context(|| format!("Failed to parse watermark file {}", path.display()))
}

fn parse_detections(content: &str) -> Result<Vec<WatermarkDetection>> {
    if let Ok(list) = serde_json::from_str::<Vec<WatermarkDetection>>(content) {
        return Ok(list);
    }
    let document: DetectionsDocument = serde_json::from_str(content)?;
    Ok(document.detections)
}
