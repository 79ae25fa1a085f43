//! Signal lexicons and heuristic rules for synthprobe.
//!
//! Everything that turns strings into evidence lives here as auditable
//! tables: the generator name lexicon, signing-authority matching, the
//! platform-transcoder exclusion list and the heuristic rule set. Keeping
//! these in one crate means a rule change is a table diff, not a code hunt.

pub mod interesting;
pub mod lexicon;
pub mod rules;

pub use interesting::{
    is_interesting, INTERESTING_KEYWORDS, STRING_CAP, STRING_MAX_LEN, STRING_MIN_LEN,
};
pub use lexicon::{
    match_signing_authority, normalize_generator, platform_transcoder, AI_GENERATORS,
    PLATFORM_TRANSCODERS, SIGNING_AUTHORITIES,
};
pub use rules::{
    evaluate_heuristics, GeneratorEffect, HeuristicRule, RuleCheck, RuleHit,
    TechnicalFingerprint, HEURISTIC_RULES, SORA_BASE_RESOLUTIONS, SORA_PRO_RESOLUTIONS,
};
