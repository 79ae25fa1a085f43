//! Analysis configuration: API credentials, tool timeouts, thresholds.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use synthprobe_common::{Error, Result};
use tracing::debug;

/// Tunable knobs for one analysis run.
///
/// Loaded from the first YAML config file that exists, then overridden by
/// `SYNTHPROBE_*` environment variables. No config anywhere is fine; every
/// field has a working default and the platform extractors simply stay
/// unavailable without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// YouTube Data API v3 key.
    pub youtube_api_key: Option<String>,
    /// TikTok Research API client key.
    pub tiktok_client_key: Option<String>,
    /// TikTok Research API client secret.
    pub tiktok_client_secret: Option<String>,
    pub ffprobe_timeout_seconds: u64,
    pub exiftool_timeout_seconds: u64,
    pub c2patool_timeout_seconds: u64,
    /// Timeout for platform provenance API calls.
    pub api_timeout_seconds: u64,
    /// Confidence at or above which the summary verdict reads AI-generated.
    pub detection_threshold: f64,
    /// Cap on interesting strings kept from a full-mode scan.
    pub string_scan_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            youtube_api_key: None,
            tiktok_client_key: None,
            tiktok_client_secret: None,
            ffprobe_timeout_seconds: 60,
            exiftool_timeout_seconds: 30,
            c2patool_timeout_seconds: 30,
            api_timeout_seconds: 30,
            detection_threshold: 0.5,
            string_scan_limit: synthprobe_signals::STRING_CAP,
        }
    }
}

impl AnalysisConfig {
    /// Load config from the usual locations plus environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::load_from(&path)?,
            None => Self::default(),
        };
        config.apply_env_from(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load config from a specific YAML file.
    pub fn load_from(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    /// First config file that exists: `$SYNTHPROBE_CONFIG`,
    /// `~/.synthprobe/config.yaml`, `~/.config/synthprobe/config.yaml`.
    fn find_config_file() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("SYNTHPROBE_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }
        let home = std::env::var_os("HOME").map(PathBuf::from)?;
        for candidate in [
            home.join(".synthprobe/config.yaml"),
            home.join(".config/synthprobe/config.yaml"),
        ] {
            if candidate.exists() {
                return Some(candidate);
            }
        }
        None
    }

    /// Apply `SYNTHPROBE_*` overrides from a lookup function.
    pub fn apply_env_from<F>(&mut self, get: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = get("SYNTHPROBE_YOUTUBE_API_KEY") {
            self.youtube_api_key = Some(key);
        }
        if let Some(key) = get("SYNTHPROBE_TIKTOK_CLIENT_KEY") {
            self.tiktok_client_key = Some(key);
        }
        if let Some(secret) = get("SYNTHPROBE_TIKTOK_CLIENT_SECRET") {
            self.tiktok_client_secret = Some(secret);
        }
        if let Some(v) = get("SYNTHPROBE_FFPROBE_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.ffprobe_timeout_seconds = v;
        }
        if let Some(v) = get("SYNTHPROBE_EXIFTOOL_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.exiftool_timeout_seconds = v;
        }
        if let Some(v) = get("SYNTHPROBE_C2PATOOL_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.c2patool_timeout_seconds = v;
        }
        if let Some(v) = get("SYNTHPROBE_API_TIMEOUT").and_then(|v| v.parse().ok()) {
            self.api_timeout_seconds = v;
        }
        if let Some(v) = get("SYNTHPROBE_THRESHOLD").and_then(|v| v.parse().ok()) {
            self.detection_threshold = v;
        }
    }

    /// Both TikTok credentials are configured.
    pub fn has_tiktok_credentials(&self) -> bool {
        self.tiktok_client_key.is_some() && self.tiktok_client_secret.is_some()
    }
}
