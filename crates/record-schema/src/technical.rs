//! Technical stream/container facts from the technical prober.

use serde::{Deserialize, Serialize};

/// Container-level and per-stream technical data.
///
/// Only the first video stream and first audio stream are profiled; later
/// streams of the same type never displace them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TechnicalProfile {
    pub container: Option<String>,
    pub container_long: Option<String>,
    pub duration_seconds: Option<f64>,
    /// Overall bitrate in bits per second.
    pub bitrate: Option<i64>,
    pub stream_count: Option<i64>,
    pub video: VideoStreamInfo,
    pub audio: AudioStreamInfo,
}

impl TechnicalProfile {
    /// Duration as `H:MM:SS` (or `M:SS` under an hour), `N/A` when unknown.
    pub fn duration_formatted(&self) -> String {
        match self.duration_seconds {
            None => "N/A".to_string(),
            Some(secs) => {
                let total = secs.max(0.0).round() as u64;
                let hours = total / 3600;
                let minutes = (total % 3600) / 60;
                let seconds = total % 60;
                if hours > 0 {
                    format!("{hours}:{minutes:02}:{seconds:02}")
                } else {
                    format!("{minutes}:{seconds:02}")
                }
            }
        }
    }
}

/// First video stream of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VideoStreamInfo {
    pub codec: Option<String>,
    pub codec_long: Option<String>,
    pub profile: Option<String>,
    pub level: Option<i64>,
    pub width: Option<i64>,
    pub height: Option<i64>,
    pub fps: Option<f64>,
    pub avg_fps: Option<f64>,
    pub bitrate: Option<i64>,
    pub duration: Option<f64>,
    pub pixel_format: Option<String>,
    pub field_order: Option<String>,
    /// Per-stream encoder tag, when the muxer wrote one.
    pub encoder: Option<String>,
    /// Handler name from the media handler box.
    pub handler: Option<String>,
}

impl VideoStreamInfo {
    /// `WxH` when both dimensions are known.
    pub fn resolution(&self) -> Option<String> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some(format!("{w}x{h}")),
            _ => None,
        }
    }

    /// Aspect ratio reduced by gcd, e.g. `16:9`.
    pub fn aspect_ratio(&self) -> Option<String> {
        let (w, h) = (self.width?, self.height?);
        if w <= 0 || h <= 0 {
            return None;
        }
        let d = gcd(w as u64, h as u64);
        Some(format!("{}:{}", w as u64 / d, h as u64 / d))
    }
}

/// First audio stream of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AudioStreamInfo {
    pub codec: Option<String>,
    pub codec_long: Option<String>,
    pub profile: Option<String>,
    pub sample_rate: Option<i64>,
    pub channels: Option<i64>,
    pub channel_layout: Option<String>,
    pub bitrate: Option<i64>,
    pub duration: Option<f64>,
    pub sample_format: Option<String>,
    pub handler: Option<String>,
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_formatted() {
        let mut tech = TechnicalProfile::default();
        assert_eq!(tech.duration_formatted(), "N/A");
        tech.duration_seconds = Some(65.2);
        assert_eq!(tech.duration_formatted(), "1:05");
        tech.duration_seconds = Some(3725.0);
        assert_eq!(tech.duration_formatted(), "1:02:05");
        tech.duration_seconds = Some(9.6);
        assert_eq!(tech.duration_formatted(), "0:10");
    }

    #[test]
    fn test_resolution_and_aspect() {
        let video = VideoStreamInfo {
            width: Some(1920),
            height: Some(1080),
            ..Default::default()
        };
        assert_eq!(video.resolution().as_deref(), Some("1920x1080"));
        assert_eq!(video.aspect_ratio().as_deref(), Some("16:9"));

        let portrait = VideoStreamInfo {
            width: Some(720),
            height: Some(1280),
            ..Default::default()
        };
        assert_eq!(portrait.aspect_ratio().as_deref(), Some("9:16"));

        let unknown = VideoStreamInfo::default();
        assert_eq!(unknown.resolution(), None);
        assert_eq!(unknown.aspect_ratio(), None);
    }
}
