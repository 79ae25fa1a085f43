//! Last-stage heuristic signals over the fields earlier extractors filled.

use crate::pipeline::Extractor;
use async_trait::async_trait;
use std::path::Path;
use synthprobe_common::Result;
use synthprobe_record_schema::verdict::ModelConfidence;
use synthprobe_record_schema::MediaRecord;
use synthprobe_signals::{
    evaluate_heuristics, GeneratorEffect, RuleCheck, TechnicalFingerprint, SORA_BASE_RESOLUTIONS,
    SORA_PRO_RESOLUTIONS,
};

/// Rule-table detector. Everything it emits is inference, never declaration.
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HeuristicExtractor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Extractor for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn priority(&self) -> u32 {
        90
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn extract(&self, _path: &Path, record: &mut MediaRecord) -> Result<()> {
        apply_rules(record);
        infer_sora_model(record);
        Ok(())
    }
}

fn apply_rules(record: &mut MediaRecord) {
    let fingerprint = TechnicalFingerprint {
        audio_sample_rate: record.technical.audio.sample_rate,
        // Stream-level encoder tag, else the container-level one.
        video_encoder: record
            .technical
            .video
            .encoder
            .as_deref()
            .or_else(|| record.raw.format_tags.get("encoder").map(String::as_str)),
        video_handler: record.technical.video.handler.as_deref(),
        audio_handler: record.technical.audio.handler.as_deref(),
    };
    let hits = evaluate_heuristics(&fingerprint);

    for hit in hits {
        let rule = hit.rule;
        let description = match rule.check {
            RuleCheck::AudioSampleRate(_) => rule.description.to_string(),
            _ => format!("{}: {}", rule.description, hit.matched),
        };
        record
            .ai_verdict
            .add_signal(rule.name, true, rule.confidence, description, false);
        if rule.marks_ai {
            record.ai_verdict.mark_ai_generated();
        }

        if record.ai_verdict.generator.is_none() {
            match rule.generator {
                GeneratorEffect::IfUnset(display) => {
                    record.ai_verdict.generator = Some(display.to_string());
                }
                GeneratorEffect::FromLexicon => {
                    if let Some(display) = hit.lexicon_generator {
                        record.ai_verdict.generator = Some(display.to_string());
                    }
                }
                GeneratorEffect::None => {}
            }
        }
    }
}

/// Pin down which Sora tier rendered the clip, where the resolution allows.
///
/// 1024x1792 and anything with a 1080p short side only come out of the pro
/// model; 1280x720-class output could be either tier.
fn infer_sora_model(record: &mut MediaRecord) {
    if record.ai_verdict.generator.as_deref() != Some("OpenAI Sora") {
        return;
    }
    let (Some(width), Some(height)) = (
        record.technical.video.width,
        record.technical.video.height,
    ) else {
        return;
    };

    let verdict = &mut record.ai_verdict;
    if SORA_PRO_RESOLUTIONS.contains(&(width, height)) || width.min(height) >= 1080 {
        verdict.inferred_model = Some("sora-2-pro".to_string());
        verdict.model_confidence = ModelConfidence::Confirmed;
    } else if SORA_BASE_RESOLUTIONS.contains(&(width, height)) {
        verdict.model_confidence = ModelConfidence::Ambiguous;
    } else {
        verdict.model_confidence = ModelConfidence::Unknown;
    }
}
