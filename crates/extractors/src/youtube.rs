//! YouTube Data API v3 lookup for the `containsSyntheticMedia` label.
//!
//! Only works when the video id survives in the filename (yt-dlp keeps it
//! there by default). Needs an API key; without one the extractor reports
//! itself unavailable.

use crate::config::AnalysisConfig;
use crate::pipeline::Extractor;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use synthprobe_common::{Error, Platform, Result};
use synthprobe_record_schema::MediaRecord;
use tracing::{debug, warn};

const API_URL: &str = "https://www.googleapis.com/youtube/v3/videos";

pub struct YouTubeExtractor {
    api_key: Option<String>,
    timeout_seconds: u64,
}

impl YouTubeExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            api_key: config.youtube_api_key.clone(),
            timeout_seconds: config.api_timeout_seconds,
        }
    }

    async fn query(&self, api_key: &str, video_id: &str) -> Result<Option<VideoStatus>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .build()
            .map_err(api_error)?;

        let response = client
            .get(API_URL)
            .query(&[("part", "status"), ("id", video_id), ("key", api_key)])
            .send()
            .await
            .map_err(api_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(format!("HTTP {status}")));
        }

        let body: VideoListResponse = response.json().await.map_err(api_error)?;
        Ok(body.items.into_iter().next().and_then(|item| item.status))
    }
}

#[async_trait]
impl Extractor for YouTubeExtractor {
    fn name(&self) -> &'static str {
        "youtube-api"
    }

    fn priority(&self) -> u32 {
        5
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn extract(&self, path: &Path, record: &mut MediaRecord) -> Result<()> {
        let Some(video_id) = Platform::YouTube.video_id_from_path(path) else {
            debug!("no YouTube id in filename, skipping lookup");
            return Ok(());
        };
        let Some(api_key) = self.api_key.as_deref() else {
            return Ok(());
        };

        match self.query(api_key, &video_id).await {
            Ok(Some(status)) => apply_status(&video_id, &status, record),
            Ok(None) => debug!("video {} not found or private", video_id),
            // A declined or unreachable API is a missing answer, not a
            // broken analysis.
            Err(e) => warn!("YouTube lookup failed: {}", e),
        }
        Ok(())
    }
}

fn apply_status(video_id: &str, status: &VideoStatus, record: &mut MediaRecord) {
    let platform = &mut record.provenance.platform;
    platform.youtube_video_id = Some(video_id.to_string());
    platform.youtube_contains_synthetic_media = status.contains_synthetic_media;

    if record.provenance.platform.youtube_labeled_ai() {
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.add_signal(
            "youtube_api_synthetic",
            true,
            0.99,
            format!("YouTube API: containsSyntheticMedia=true (video: {video_id})"),
            true,
        );
    }
}

fn api_error(e: impl std::fmt::Display) -> Error {
    Error::PlatformApi {
        platform: "youtube".to_string(),
        reason: e.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    status: Option<VideoStatus>,
}

#[derive(Debug, Deserialize)]
struct VideoStatus {
    #[serde(rename = "containsSyntheticMedia")]
    contains_synthetic_media: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthprobe_record_schema::FileDescriptor;

    fn record() -> MediaRecord {
        MediaRecord::new(FileDescriptor::default())
    }

    #[test]
    fn test_availability_follows_api_key() {
        let mut config = AnalysisConfig::default();
        assert!(!YouTubeExtractor::new(&config).is_available());
        config.youtube_api_key = Some("AIza-test".to_string());
        assert!(YouTubeExtractor::new(&config).is_available());
    }

    #[test]
    fn test_response_parse() {
        let body = r#"{
            "kind": "youtube#videoListResponse",
            "items": [
                { "kind": "youtube#video", "id": "dQw4w9WgXcQ",
                  "status": { "privacyStatus": "public", "containsSyntheticMedia": true } }
            ]
        }"#;
        let parsed: VideoListResponse = serde_json::from_str(body).unwrap();
        let status = parsed.items.into_iter().next().unwrap().status.unwrap();
        assert_eq!(status.contains_synthetic_media, Some(true));
    }

    #[test]
    fn test_synthetic_label_sets_fact_signal() {
        let mut rec = record();
        let status = VideoStatus {
            contains_synthetic_media: Some(true),
        };
        apply_status("dQw4w9WgXcQ", &status, &mut rec);

        assert_eq!(
            rec.provenance.platform.youtube_video_id.as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert!(rec.ai_verdict.is_ai_generated);
        let signal = &rec.ai_verdict.signals["youtube_api_synthetic"];
        assert!(signal.is_fact);
        assert_eq!(signal.confidence, 0.99);
        assert!(signal.description.contains("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_negative_label_recorded_without_signal() {
        let mut rec = record();
        let status = VideoStatus {
            contains_synthetic_media: Some(false),
        };
        apply_status("dQw4w9WgXcQ", &status, &mut rec);

        assert_eq!(
            rec.provenance.platform.youtube_contains_synthetic_media,
            Some(false)
        );
        assert!(!rec.ai_verdict.is_ai_generated);
        assert!(rec.ai_verdict.signals.is_empty());
    }

    #[test]
    fn test_absent_label_stays_unknown() {
        let mut rec = record();
        let status = VideoStatus {
            contains_synthetic_media: None,
        };
        apply_status("dQw4w9WgXcQ", &status, &mut rec);
        assert_eq!(rec.provenance.platform.youtube_contains_synthetic_media, None);
        assert!(!rec.ai_verdict.is_ai_generated);
    }
}
