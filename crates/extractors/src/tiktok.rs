//! TikTok Research API lookup for AIGC labels.
//!
//! `video_tag.number` 1 means the creator labeled the post as AI-generated,
//! 2 means the platform detected it. Research API access is gated, so this
//! extractor is usually unavailable; the embedded `Keys:AigcInfo` label the
//! tag prober reads covers the common case without credentials.

use crate::config::AnalysisConfig;
use crate::pipeline::Extractor;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use synthprobe_common::{Error, Platform, Result};
use synthprobe_record_schema::MediaRecord;
use tracing::{debug, warn};

const AUTH_URL: &str = "https://open.tiktokapis.com/v2/oauth/token/";
const QUERY_URL: &str = "https://open.tiktokapis.com/v2/research/video/query/";

pub struct TikTokExtractor {
    client_key: Option<String>,
    client_secret: Option<String>,
    timeout_seconds: u64,
}

impl TikTokExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            client_key: config.tiktok_client_key.clone(),
            client_secret: config.tiktok_client_secret.clone(),
            timeout_seconds: config.api_timeout_seconds,
        }
    }

    fn video_id(&self, path: &Path, record: &MediaRecord) -> Option<String> {
        if let Some(embedded) = &record.provenance.platform.tiktok_video_id {
            let id = embedded.strip_prefix("vid:").unwrap_or(embedded);
            return Some(id.to_string());
        }
        Platform::TikTok.video_id_from_path(path)
    }

    async fn access_token(&self, client: &reqwest::Client) -> Result<String> {
        let (Some(key), Some(secret)) = (&self.client_key, &self.client_secret) else {
            return Err(api_error("missing client credentials"));
        };
        let response = client
            .post(AUTH_URL)
            .form(&[
                ("client_key", key.as_str()),
                ("client_secret", secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(api_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(format!("auth HTTP {status}")));
        }
        let body: TokenResponse = response.json().await.map_err(api_error)?;
        body.access_token
            .ok_or_else(|| api_error("auth response carried no access_token"))
    }

    async fn query(&self, video_id: &str) -> Result<Option<VideoTag>> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.timeout_seconds))
            .build()
            .map_err(api_error)?;

        let token = self.access_token(&client).await?;

        let response = client
            .post(QUERY_URL)
            .query(&[("fields", "id,video_tag")])
            .bearer_auth(token)
            .json(&serde_json::json!({
                "query": {
                    "and": [{ "field_name": "video_id", "field_values": [video_id] }]
                },
                "max_count": 1
            }))
            .send()
            .await
            .map_err(api_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(api_error(format!("query HTTP {status}")));
        }

        let body: QueryResponse = response.json().await.map_err(api_error)?;
        Ok(body
            .data
            .videos
            .into_iter()
            .next()
            .and_then(|video| video.video_tag))
    }
}

#[async_trait]
impl Extractor for TikTokExtractor {
    fn name(&self) -> &'static str {
        "tiktok-api"
    }

    fn priority(&self) -> u32 {
        5
    }

    fn is_available(&self) -> bool {
        self.client_key.is_some() && self.client_secret.is_some()
    }

    async fn extract(&self, path: &Path, record: &mut MediaRecord) -> Result<()> {
        let Some(video_id) = self.video_id(path, record) else {
            debug!("no TikTok id in filename or embedded tags, skipping lookup");
            return Ok(());
        };

        match self.query(&video_id).await {
            Ok(Some(tag)) => apply_video_tag(&video_id, &tag, record),
            Ok(None) => debug!("video {} not found in Research API", video_id),
            Err(e) => warn!("TikTok lookup failed: {}", e),
        }
        Ok(())
    }
}

fn apply_video_tag(video_id: &str, tag: &VideoTag, record: &mut MediaRecord) {
    let platform = &mut record.provenance.platform;
    platform.tiktok_api_video_tag_number = tag.number;
    platform.tiktok_api_video_tag_type = tag.tag_type.clone();

    if matches!(tag.number, Some(1) | Some(2)) {
        let label_source = if tag.number == Some(1) {
            "creator labeled"
        } else {
            "platform detected"
        };
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.add_signal(
            "tiktok_api_aigc",
            true,
            0.99,
            format!("TikTok API: video_tag.type=AIGC Type ({label_source}, video: {video_id})"),
            true,
        );
    }
}

fn api_error(e: impl std::fmt::Display) -> Error {
    Error::PlatformApi {
        platform: "tiktok".to_string(),
        reason: e.to_string(),
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    data: QueryData,
}

#[derive(Debug, Default, Deserialize)]
struct QueryData {
    #[serde(default)]
    videos: Vec<VideoEntry>,
}

#[derive(Debug, Deserialize)]
struct VideoEntry {
    video_tag: Option<VideoTag>,
}

#[derive(Debug, Deserialize)]
struct VideoTag {
    number: Option<i64>,
    #[serde(rename = "type")]
    tag_type: Option<String>,
}
