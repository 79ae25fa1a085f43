//! Video platform identifiers and filename-based id inference.
//!
//! Downloads are out of scope; the only link between a local file and its
//! hosting platform is whatever id survives in the filename (yt-dlp and the
//! platform apps both keep it there by default).

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// YouTube video ids are exactly 11 chars of [A-Za-z0-9_-].
static YOUTUBE_ID_STEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").unwrap());

/// Trailing id after a separator, e.g. "My Clip dQw4w9WgXcQ".
static YOUTUBE_ID_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[_\-\s]([a-zA-Z0-9_-]{11})$").unwrap());

/// TikTok video ids are long decimal numbers.
static TIKTOK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{15,25})").unwrap());

/// A video hosting platform with a queryable provenance API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    TikTok,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::YouTube => write!(f, "youtube"),
            Platform::TikTok => write!(f, "tiktok"),
        }
    }
}

impl FromStr for Platform {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "youtube" => Ok(Platform::YouTube),
            "tiktok" => Ok(Platform::TikTok),
            _ => Err(crate::Error::Other(format!("unknown platform: {s}"))),
        }
    }
}

impl Platform {
    /// Infer this platform's video id from a local file path, if any.
    pub fn video_id_from_path(&self, path: &Path) -> Option<String> {
        let stem = path.file_stem()?.to_str()?;
        match self {
            Platform::YouTube => youtube_id_from_stem(stem),
            Platform::TikTok => tiktok_id_from_stem(stem),
        }
    }
}

fn youtube_id_from_stem(stem: &str) -> Option<String> {
    if YOUTUBE_ID_STEM.is_match(stem) {
        return Some(stem.to_string());
    }
    YOUTUBE_ID_SUFFIX
        .captures(stem)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

fn tiktok_id_from_stem(stem: &str) -> Option<String> {
    TIKTOK_ID
        .captures(stem)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_youtube_id_whole_stem() {
        let path = PathBuf::from("/tmp/dQw4w9WgXcQ.mp4");
        assert_eq!(
            Platform::YouTube.video_id_from_path(&path).as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_youtube_id_trailing_after_separator() {
        let path = PathBuf::from("/tmp/My Holiday Video dQw4w9WgXcQ.mp4");
        assert_eq!(
            Platform::YouTube.video_id_from_path(&path).as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_youtube_id_absent() {
        let path = PathBuf::from("/tmp/holiday.mp4");
        assert_eq!(Platform::YouTube.video_id_from_path(&path), None);
    }

    #[test]
    fn test_tiktok_id_numeric_stem() {
        let path = PathBuf::from("/tmp/7312345678901234567.mp4");
        assert_eq!(
            Platform::TikTok.video_id_from_path(&path).as_deref(),
            Some("7312345678901234567")
        );
    }

    #[test]
    fn test_tiktok_id_embedded_in_name() {
        let path = PathBuf::from("/tmp/tiktok_7312345678901234567_hd.mp4");
        assert_eq!(
            Platform::TikTok.video_id_from_path(&path).as_deref(),
            Some("7312345678901234567")
        );
    }

    #[test]
    fn test_tiktok_id_too_short() {
        let path = PathBuf::from("/tmp/clip_12345.mp4");
        assert_eq!(Platform::TikTok.video_id_from_path(&path), None);
    }

    #[test]
    fn test_platform_roundtrip() {
        assert_eq!(Platform::from_str("youtube").unwrap(), Platform::YouTube);
        assert_eq!(Platform::from_str("TikTok").unwrap(), Platform::TikTok);
        assert_eq!(Platform::YouTube.to_string(), "youtube");
    }
}
