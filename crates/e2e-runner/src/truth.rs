//! Fixture truth files.
//!
//! A fixture `clip.mp4` is judged against `clip.mp4.truth.json` in the
//! truth directory. Every expectation is optional; only declared fields
//! are checked against the record.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Expected analysis outcome for one fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureTruth {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Expected final verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ai_generated: Option<bool>,

    /// Expected normalized generator name, e.g. "OpenAI Sora".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator: Option<String>,

    /// Whether a content credential is expected in the container.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub has_credential: Option<bool>,

    /// Overall confidence must reach at least this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

impl FixtureTruth {
    /// Whether the truth file declares any expectation at all.
    pub fn declares_anything(&self) -> bool {
        self.is_ai_generated.is_some()
            || self.generator.is_some()
            || self.has_credential.is_some()
            || self.min_confidence.is_some()
    }
}

/// Truth file path for a fixture: `<filename>.truth.json` in the truth
/// directory. The full fixture filename keeps `clip.mp4` and `clip.mov`
/// from sharing a truth file.
pub fn truth_path_for(fixture: &Path, truth_dir: &Path) -> PathBuf {
    let file_name = fixture
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    truth_dir.join(format!("{file_name}.truth.json"))
}

/// Load and sanity-check a truth file.
pub fn load_truth(path: &Path) -> Result<FixtureTruth> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read truth file {}", path.display()))?;
    let truth: FixtureTruth = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse truth file {}", path.display()))?;

    if let Some(min) = truth.min_confidence {
        if !(0.0..=1.0).contains(&min) {
            anyhow::bail!(
                "min_confidence in {} must be between 0.0 and 1.0, got {}",
                path.display(),
                min
            );
        }
    }

    Ok(truth)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_truth() {
        let json = r#"{
            "description": "Sora clip with intact credential",
            "is_ai_generated": true,
            "generator": "OpenAI Sora",
            "has_credential": true,
            "min_confidence": 0.9
        }"#;

        let truth: FixtureTruth = serde_json::from_str(json).unwrap();
        assert_eq!(truth.is_ai_generated, Some(true));
        assert_eq!(truth.generator.as_deref(), Some("OpenAI Sora"));
        assert_eq!(truth.min_confidence, Some(0.9));
        assert!(truth.declares_anything());
    }

    #[test]
    fn test_parse_partial_truth() {
        let truth: FixtureTruth = serde_json::from_str(r#"{"is_ai_generated": false}"#).unwrap();
        assert_eq!(truth.is_ai_generated, Some(false));
        assert!(truth.generator.is_none());
        assert!(truth.declares_anything());
    }

    #[test]
    fn test_empty_truth_declares_nothing() {
        let truth: FixtureTruth = serde_json::from_str("{}").unwrap();
        assert!(!truth.declares_anything());
    }

    #[test]
    fn test_truth_path_uses_full_filename() {
        let path = truth_path_for(Path::new("/fixtures/clip.mp4"), Path::new("/truth"));
        assert_eq!(path, PathBuf::from("/truth/clip.mp4.truth.json"));
    }

    #[test]
    fn test_load_truth_rejects_out_of_range_confidence() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4.truth.json");
        std::fs::write(&path, r#"{"min_confidence": 1.5}"#).unwrap();

        let err = load_truth(&path).unwrap_err();
        assert!(err.to_string().contains("between 0.0 and 1.0"));
    }

    #[test]
    fn test_load_truth_missing_file() {
        let err = load_truth(Path::new("/nonexistent/clip.mp4.truth.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read truth file"));
    }
}
