//! Name lexicons for generator attribution and signer matching.

use regex::Regex;
use std::sync::LazyLock;

/// Known AI video/image generators: (token, display name).
///
/// Tokens are matched case-insensitively as substrings, first hit wins, so
/// order more specific tokens before broader ones.
pub const AI_GENERATORS: &[(&str, &str)] = &[
    ("sora", "OpenAI Sora"),
    ("dall-e", "OpenAI DALL-E"),
    ("midjourney", "Midjourney"),
    ("stable diffusion", "Stability AI"),
    ("stabilityai", "Stability AI"),
    ("adobe firefly", "Adobe Firefly"),
    ("firefly", "Adobe Firefly"),
    ("runway", "Runway ML"),
    ("pika", "Pika Labs"),
    ("kling", "Kuaishou Kling"),
    ("luma", "Luma AI"),
    ("gemini", "Google Gemini"),
    ("veo", "Google Veo"),
];

/// Organizations whose signatures on a credential are worth naming.
pub const SIGNING_AUTHORITIES: &[&str] = &["OpenAI", "Adobe", "Microsoft", "Google", "Meta", "Apple"];

/// Encoder/handler tags written by platform transcoding pipelines and
/// common muxers. A tag starting with one of these, with no generator
/// token elsewhere in it, is re-encoding residue, not generator evidence.
pub const PLATFORM_TRANSCODERS: &[&str] =
    &["google", "lavf", "lavc", "handbrake", "x264", "x265", "mainconcept"];

// lavf/lavc/x26x run straight into version digits, so no \b after them.
static TRANSCODER_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(?:(google|handbrake|mainconcept)\b|(lavf|lavc|x26[45]))").unwrap()
});

/// Look up a generator display name from any tool/agent/signer string.
///
/// Returns the matched token and its display name.
pub fn normalize_generator(raw: &str) -> Option<(&'static str, &'static str)> {
    let lower = raw.to_lowercase();
    AI_GENERATORS
        .iter()
        .find(|(token, _)| lower.contains(token))
        .map(|&(token, display)| (token, display))
}

/// Match a certificate issuer/signer string against the authority list.
pub fn match_signing_authority(raw: &str) -> Option<&'static str> {
    let lower = raw.to_lowercase();
    SIGNING_AUTHORITIES
        .iter()
        .find(|name| lower.contains(&name.to_lowercase()))
        .copied()
}

/// The transcoder name a tag starts with, if any.
///
/// Callers must consult [`normalize_generator`] first: a tag like
/// "Google Veo" names a model and attributes even though it starts with a
/// transcoder name.
pub fn platform_transcoder(tag: &str) -> Option<&'static str> {
    let caps = TRANSCODER_PREFIX.captures(tag.trim())?;
    let matched = caps.get(1).or_else(|| caps.get(2))?.as_str().to_lowercase();
    PLATFORM_TRANSCODERS.iter().find(|n| **n == matched).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_generator_hits() {
        assert_eq!(
            normalize_generator("Sora").map(|(_, d)| d),
            Some("OpenAI Sora")
        );
        assert_eq!(
            normalize_generator("Made with sora-2-pro").map(|(_, d)| d),
            Some("OpenAI Sora")
        );
        assert_eq!(
            normalize_generator("Google Veo").map(|(_, d)| d),
            Some("Google Veo")
        );
        assert_eq!(
            normalize_generator("ADOBE FIREFLY 3").map(|(_, d)| d),
            Some("Adobe Firefly")
        );
        assert_eq!(
            normalize_generator("stable diffusion xl").map(|(_, d)| d),
            Some("Stability AI")
        );
    }

    #[test]
    fn test_normalize_generator_misses() {
        assert_eq!(normalize_generator("Google"), None);
        assert_eq!(normalize_generator("Lavf60.16.100"), None);
        assert_eq!(normalize_generator("Final Cut Pro"), None);
        assert_eq!(normalize_generator(""), None);
    }

    #[test]
    fn test_match_signing_authority() {
        assert_eq!(match_signing_authority("OpenAI, Inc."), Some("OpenAI"));
        assert_eq!(match_signing_authority("Adobe Systems"), Some("Adobe"));
        assert_eq!(match_signing_authority("Truepic Lens"), None);
    }

    #[test]
    fn test_platform_transcoder_prefixes() {
        assert_eq!(platform_transcoder("Google"), Some("google"));
        assert_eq!(platform_transcoder("google inc."), Some("google"));
        assert_eq!(platform_transcoder("Lavf60.16.100"), Some("lavf"));
        assert_eq!(platform_transcoder("x264 core 164"), Some("x264"));
        assert_eq!(platform_transcoder("Mainconcept AAC"), Some("mainconcept"));
        assert_eq!(platform_transcoder("Sora"), None);
        assert_eq!(platform_transcoder("DaVinci Resolve"), None);
    }
}
