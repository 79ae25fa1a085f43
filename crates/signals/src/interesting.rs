//! Keyword filter for raw-string scans.
//!
//! The box-level strings scan of a video file yields tens of thousands of
//! printable runs, almost all codec noise. Only runs matching one of these
//! keywords are worth keeping for the evidence record.

/// Substrings (matched case-insensitively) that make a raw string worth
/// keeping: provenance markers, generator names, tool names, and URI schemes.
pub const INTERESTING_KEYWORDS: &[&str] = &[
    // Provenance and credential markers
    "c2pa",
    "contentauth",
    "jumbf",
    "xmp",
    "manifest",
    "signature",
    "certificate",
    "truepic",
    // Generator and vendor names
    "sora",
    "openai",
    "dall-e",
    "google",
    "gemini",
    "veo",
    "adobe",
    "firefly",
    "runway",
    "pika",
    "midjourney",
    "stability",
    "luma",
    "kling",
    // Generation language
    "trained",
    "generated",
    "synthetic",
    "ai-generated",
    // Encoder and tool names
    "ffmpeg",
    "lavf",
    "davinci",
    "premiere",
    "encoder",
    "handler",
    "software",
    "mainconcept",
    // Identifiers and links
    "http://",
    "https://",
    "urn:",
    "uuid:",
];

/// Minimum printable-run length worth considering.
pub const STRING_MIN_LEN: usize = 4;

/// Runs longer than this are binary noise, not text.
pub const STRING_MAX_LEN: usize = 500;

/// Cap on kept strings per file.
pub const STRING_CAP: usize = 100;

/// Whether a scanned string matches any interesting keyword.
pub fn is_interesting(s: &str) -> bool {
    let lower = s.to_lowercase();
    INTERESTING_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provenance_strings_kept() {
        assert!(is_interesting("urn:c2pa:f1a3...:manifest"));
        assert!(is_interesting("Sora-generated content"));
        assert!(is_interesting("Lavf60.16.100"));
        assert!(is_interesting("http://ns.adobe.com/xap/1.0/"));
        assert!(is_interesting("ISO Media Handler"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(is_interesting("OPENAI"));
        assert!(is_interesting("C2PA Manifest Store"));
        assert!(is_interesting("FFmpeg"));
    }

    #[test]
    fn test_codec_noise_dropped() {
        assert!(!is_interesting("avc1"));
        assert!(!is_interesting("mp4a"));
        assert!(!is_interesting("\u{1}\u{2}abcd"));
        assert!(!is_interesting("stszstscstco"));
    }
}
