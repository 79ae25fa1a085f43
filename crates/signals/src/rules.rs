//! Heuristic detection rules over technical fingerprints.
//!
//! The rules are a fixed ordered table so every inference the engine can
//! make is reviewable in one place and testable without a media file. All
//! hits are inferences (`is_fact = false` downstream), never declarations.

use crate::lexicon::{normalize_generator, platform_transcoder};
use tracing::debug;

/// What a rule matches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleCheck {
    /// Audio sample rate equals this value exactly.
    AudioSampleRate(i64),
    /// Video encoder tag carries a generator token from the lexicon.
    /// Bare platform-transcoder tags are explicitly excluded.
    EncoderGeneratorToken,
    /// A stream handler name contains this substring (case-insensitive).
    HandlerContains(&'static str),
}

/// What a hit does to generator attribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratorEffect {
    /// Signal only; never names a generator.
    None,
    /// Attribute this display name when no generator is known yet.
    IfUnset(&'static str),
    /// Attribute whatever the lexicon matched, when unset.
    FromLexicon,
}

/// One entry of the heuristic rule table.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicRule {
    pub name: &'static str,
    pub check: RuleCheck,
    pub confidence: f64,
    pub description: &'static str,
    pub generator: GeneratorEffect,
    /// Whether a hit is strong enough to flip the AI verdict.
    pub marks_ai: bool,
}

/// The heuristic rule table, evaluated in order.
pub const HEURISTIC_RULES: &[HeuristicRule] = &[
    HeuristicRule {
        name: "audio_96khz",
        check: RuleCheck::AudioSampleRate(96_000),
        confidence: 0.9,
        description: "96 kHz audio sample rate (Sora signature)",
        generator: GeneratorEffect::IfUnset("OpenAI Sora"),
        marks_ai: true,
    },
    HeuristicRule {
        name: "encoder_model_token",
        check: RuleCheck::EncoderGeneratorToken,
        confidence: 0.8,
        description: "video encoder tag names a generation model",
        generator: GeneratorEffect::FromLexicon,
        marks_ai: true,
    },
    HeuristicRule {
        name: "handler_mainconcept",
        check: RuleCheck::HandlerContains("mainconcept"),
        confidence: 0.6,
        description: "Mainconcept handler (possible Luma AI pipeline)",
        generator: GeneratorEffect::None,
        marks_ai: false,
    },
];

/// Resolutions only the pro model renders.
pub const SORA_PRO_RESOLUTIONS: &[(i64, i64)] = &[(1024, 1792), (1792, 1024)];

/// Resolutions both model tiers render.
pub const SORA_BASE_RESOLUTIONS: &[(i64, i64)] = &[(1280, 720), (720, 1280)];

/// The technical facts the rules can see.
#[derive(Debug, Clone, Copy, Default)]
pub struct TechnicalFingerprint<'a> {
    pub audio_sample_rate: Option<i64>,
    pub video_encoder: Option<&'a str>,
    pub video_handler: Option<&'a str>,
    pub audio_handler: Option<&'a str>,
}

/// One rule that fired.
#[derive(Debug, Clone)]
pub struct RuleHit {
    pub rule: &'static HeuristicRule,
    /// The raw text that triggered the rule, for attribution records.
    pub matched: String,
    /// Lexicon display name when the rule attributes from the lexicon.
    pub lexicon_generator: Option<&'static str>,
}

/// Run the whole table against a fingerprint.
pub fn evaluate_heuristics(fp: &TechnicalFingerprint<'_>) -> Vec<RuleHit> {
    let mut hits = Vec::new();
    for rule in HEURISTIC_RULES {
        match rule.check {
            RuleCheck::AudioSampleRate(rate) => {
                if fp.audio_sample_rate == Some(rate) {
                    hits.push(RuleHit {
                        rule,
                        matched: rate.to_string(),
                        lexicon_generator: None,
                    });
                }
            }
            RuleCheck::EncoderGeneratorToken => {
                if let Some(encoder) = fp.video_encoder {
                    if let Some((_, display)) = normalize_generator(encoder) {
                        hits.push(RuleHit {
                            rule,
                            matched: encoder.to_string(),
                            lexicon_generator: Some(display),
                        });
                    } else if let Some(transcoder) = platform_transcoder(encoder) {
                        debug!(
                            encoder,
                            transcoder, "encoder tag is transcoder residue, not generator evidence"
                        );
                    }
                }
            }
            RuleCheck::HandlerContains(needle) => {
                let handler = [fp.video_handler, fp.audio_handler]
                    .into_iter()
                    .flatten()
                    .find(|h| h.to_lowercase().contains(needle));
                if let Some(handler) = handler {
                    hits.push(RuleHit {
                        rule,
                        matched: handler.to_string(),
                        lexicon_generator: None,
                    });
                }
            }
        }
    }
    hits
}
