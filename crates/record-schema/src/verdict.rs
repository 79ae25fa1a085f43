//! Fused AI-generation verdict and named evidence signals.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One named piece of evidence feeding the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub detected: bool,
    pub confidence: f64,
    pub description: String,
    /// True for direct declarations (signed manifest claims, platform API
    /// answers); false for inferred heuristics.
    pub is_fact: bool,
}

/// How firmly the sub-model was pinned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelConfidence {
    Confirmed,
    Ambiguous,
    #[default]
    Unknown,
}

impl std::fmt::Display for ModelConfidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModelConfidence::Confirmed => write!(f, "confirmed"),
            ModelConfidence::Ambiguous => write!(f, "ambiguous"),
            ModelConfidence::Unknown => write!(f, "unknown"),
        }
    }
}

/// The fused verdict. All updates are monotone: `is_ai_generated` only ever
/// flips to true, and overall confidence is the max confidence among
/// detected signals, so it never decreases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiVerdict {
    pub is_ai_generated: bool,
    /// Normalized generator display name, e.g. "OpenAI Sora".
    pub generator: Option<String>,
    /// The string the generator was attributed from, verbatim.
    pub generator_raw: Option<String>,
    pub confidence: f64,
    /// Specific model when it could be inferred, e.g. "sora-2-pro".
    pub inferred_model: Option<String>,
    pub model_confidence: ModelConfidence,
    pub signing_authorities: Vec<String>,
    /// Named signals; BTreeMap keeps serialized records byte-stable.
    pub signals: BTreeMap<String, Signal>,
}

impl Default for AiVerdict {
    fn default() -> Self {
        Self {
            is_ai_generated: false,
            generator: None,
            generator_raw: None,
            confidence: 0.0,
            inferred_model: None,
            model_confidence: ModelConfidence::Unknown,
            signing_authorities: Vec::new(),
            signals: BTreeMap::new(),
        }
    }
}

impl AiVerdict {
    /// Record a named signal. A detected signal raises the overall
    /// confidence to its own when higher; nothing ever lowers it.
    /// Re-adding a name replaces that signal.
    pub fn add_signal(
        &mut self,
        name: impl Into<String>,
        detected: bool,
        confidence: f64,
        description: impl Into<String>,
        is_fact: bool,
    ) {
        if detected && confidence > self.confidence {
            self.confidence = confidence;
        }
        self.signals.insert(
            name.into(),
            Signal {
                detected,
                confidence,
                description: description.into(),
                is_fact,
            },
        );
    }

    /// Flip the verdict to AI-generated. There is no way back.
    pub fn mark_ai_generated(&mut self) {
        self.is_ai_generated = true;
    }

    /// Attribute a generator once; later attributions do not displace the
    /// first (higher-trust extractors run earlier).
    pub fn attribute_generator(&mut self, display: impl Into<String>, raw: impl Into<String>) {
        if self.generator.is_none() {
            self.generator = Some(display.into());
            self.generator_raw = Some(raw.into());
        }
    }

    /// Append a signing authority, deduplicated.
    pub fn add_signing_authority(&mut self, authority: impl Into<String>) {
        let authority = authority.into();
        if !self.signing_authorities.contains(&authority) {
            self.signing_authorities.push(authority);
        }
    }

    /// Signals currently marked detected.
    pub fn detected_signals(&self) -> impl Iterator<Item = (&str, &Signal)> {
        self.signals
            .iter()
            .filter(|(_, s)| s.detected)
            .map(|(n, s)| (n.as_str(), s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confidence_is_max_of_detected() {
        let mut verdict = AiVerdict::default();
        verdict.add_signal("a", true, 0.6, "first", false);
        assert_eq!(verdict.confidence, 0.6);
        verdict.add_signal("b", true, 0.9, "second", true);
        assert_eq!(verdict.confidence, 0.9);
        // Lower detected signal must not pull it back down.
        verdict.add_signal("c", true, 0.3, "third", false);
        assert_eq!(verdict.confidence, 0.9);
    }

    #[test]
    fn test_undetected_signal_never_raises_confidence() {
        let mut verdict = AiVerdict::default();
        verdict.add_signal("a", false, 0.99, "not there", false);
        assert_eq!(verdict.confidence, 0.0);
        assert!(!verdict.is_ai_generated);
    }

    #[test]
    fn test_fact_then_weaker_heuristic_keeps_fact_confidence() {
        let mut verdict = AiVerdict::default();
        verdict.add_signal("youtube_api_synthetic", true, 0.99, "platform label", true);
        verdict.mark_ai_generated();
        verdict.add_signal("audio_96khz", true, 0.9, "96 kHz audio", false);
        assert_eq!(verdict.confidence, 0.99);
        assert!(verdict.is_ai_generated);
    }

    #[test]
    fn test_readd_replaces_signal() {
        let mut verdict = AiVerdict::default();
        verdict.add_signal("a", true, 0.5, "v1", false);
        verdict.add_signal("a", true, 0.8, "v2", false);
        assert_eq!(verdict.signals.len(), 1);
        assert_eq!(verdict.signals["a"].description, "v2");
        assert_eq!(verdict.confidence, 0.8);
    }

    #[test]
    fn test_generator_first_attribution_wins() {
        let mut verdict = AiVerdict::default();
        verdict.attribute_generator("OpenAI Sora", "Sora");
        verdict.attribute_generator("Google Veo", "Veo");
        assert_eq!(verdict.generator.as_deref(), Some("OpenAI Sora"));
        assert_eq!(verdict.generator_raw.as_deref(), Some("Sora"));
    }

    #[test]
    fn test_signing_authorities_dedup() {
        let mut verdict = AiVerdict::default();
        verdict.add_signing_authority("OpenAI");
        verdict.add_signing_authority("OpenAI");
        verdict.add_signing_authority("Adobe");
        assert_eq!(verdict.signing_authorities, vec!["OpenAI", "Adobe"]);
    }

    #[test]
    fn test_signal_map_serializes_in_name_order() {
        let mut verdict = AiVerdict::default();
        verdict.add_signal("zeta", true, 0.5, "z", false);
        verdict.add_signal("alpha", true, 0.6, "a", false);
        let json = serde_json::to_string(&verdict).unwrap();
        let alpha = json.find("\"alpha\"").unwrap();
        let zeta = json.find("\"zeta\"").unwrap();
        assert!(alpha < zeta);
    }
}
