//! Provenance facts: container credentials, platform labels, watermarks.

use serde::{Deserialize, Serialize};
use synthprobe_common::Timestamp;

/// Which extractor produced the credential facts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialSource {
    /// In-process credential reader.
    Library,
    /// External CLI fallback.
    Cli,
}

impl std::fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialSource::Library => write!(f, "library"),
            CredentialSource::Cli => write!(f, "cli"),
        }
    }
}

/// How an AI generation was conditioned, per the credential's ingredients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationMode {
    #[serde(rename = "text2video")]
    TextToVideo,
    #[serde(rename = "image2video")]
    ImageToVideo,
    #[serde(rename = "video2video")]
    VideoToVideo,
}

impl std::fmt::Display for GenerationMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationMode::TextToVideo => write!(f, "text2video"),
            GenerationMode::ImageToVideo => write!(f, "image2video"),
            GenerationMode::VideoToVideo => write!(f, "video2video"),
        }
    }
}

/// One action from the credential's actions assertion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct CredentialAction {
    pub action: String,
    pub software_agent: Option<String>,
    pub digital_source_type: Option<String>,
    pub when: Option<String>,
}

/// Summary of one credential ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct IngredientSummary {
    pub title: Option<String>,
    pub format: Option<String>,
    pub relationship: Option<String>,
    pub instance_id: Option<String>,
}

/// Facts read from an embedded content credential (C2PA manifest store).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ContainerCredential {
    pub has_credential: bool,
    pub source: Option<CredentialSource>,
    pub manifest_id: Option<String>,
    pub title: Option<String>,
    pub format: Option<String>,
    pub instance_id: Option<String>,
    /// Generation task id recovered from the manifest title, when the title
    /// follows the `<hex32>_media.<ext>` convention.
    pub task_id: Option<String>,
    pub claim_generator: Option<String>,
    pub claim_generator_product: Option<String>,
    pub claim_generator_version: Option<String>,
    pub software_agent: Option<String>,
    pub issuer: Option<String>,
    pub signer_name: Option<String>,
    pub cert_serial_number: Option<String>,
    pub signature_algorithm: Option<String>,
    pub signature_time: Option<Timestamp>,
    /// None until validation said anything about the chain.
    pub cert_trusted: Option<bool>,
    pub claim_signature_valid: Option<bool>,
    pub digital_source_type: Option<String>,
    pub actions: Vec<CredentialAction>,
    pub ingredient_count: usize,
    pub ingredients: Vec<IngredientSummary>,
    pub validation_state: Option<String>,
    pub validation_errors: Vec<String>,
    pub generation_mode: Option<GenerationMode>,
}

impl ContainerCredential {
    /// The credential declares an AI-generated asset.
    pub fn declares_ai_generation(&self) -> bool {
        self.digital_source_type
            .as_deref()
            .map(|s| s.contains("trainedAlgorithmicMedia"))
            .unwrap_or(false)
    }
}

/// Platform-side provenance labels, embedded or fetched from platform APIs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PlatformLabels {
    pub youtube_video_id: Option<String>,
    /// YouTube Data API `status.containsSyntheticMedia`.
    pub youtube_contains_synthetic_media: Option<bool>,
    pub tiktok_video_id: Option<String>,
    pub tiktok_video_md5: Option<String>,
    /// Embedded AIGC label: 1 = creator labeled, 2 = platform detected.
    pub tiktok_aigc_label_type: Option<i64>,
    pub tiktok_api_video_tag_number: Option<i64>,
    pub tiktok_api_video_tag_type: Option<String>,
}

impl PlatformLabels {
    pub fn youtube_labeled_ai(&self) -> bool {
        self.youtube_contains_synthetic_media == Some(true)
    }

    pub fn tiktok_labeled_ai(&self) -> bool {
        matches!(self.tiktok_aigc_label_type, Some(1) | Some(2))
            || matches!(self.tiktok_api_video_tag_number, Some(1) | Some(2))
    }
}

/// Kind of carrier a watermark was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatermarkKind {
    Audio,
    Video,
    Image,
}

impl std::fmt::Display for WatermarkKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WatermarkKind::Audio => write!(f, "audio"),
            WatermarkKind::Video => write!(f, "video"),
            WatermarkKind::Image => write!(f, "image"),
        }
    }
}

/// One detection result pushed in by an external watermark detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatermarkDetection {
    pub detector: String,
    #[serde(default)]
    pub detected: bool,
    #[serde(default)]
    pub confidence: f64,
    pub watermark_type: Option<WatermarkKind>,
    pub message_bits: Option<u32>,
    pub message_decoded: Option<String>,
    pub frames_analyzed: Option<u64>,
    pub positive_frames: Option<u64>,
    pub detection_threshold: Option<f64>,
}

/// Aggregate over all watermark detections for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WatermarkSummary {
    pub has_watermark: bool,
    /// Max confidence among positive detections.
    pub overall_confidence: f64,
    pub detections: Vec<WatermarkDetection>,
}

impl WatermarkSummary {
    /// Fold one detector's result into the aggregate.
    pub fn add_detection(&mut self, detection: WatermarkDetection) {
        if detection.detected {
            self.has_watermark = true;
            if detection.confidence > self.overall_confidence {
                self.overall_confidence = detection.confidence;
            }
        }
        self.detections.push(detection);
    }
}

/// All provenance facts for one file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ProvenanceProfile {
    pub credential: ContainerCredential,
    pub platform: PlatformLabels,
    pub watermarks: WatermarkSummary,
}
