//! Evidence record schema for synthprobe.
//!
//! This crate defines the typed record every extractor writes into:
//! file facts, technical stream data, descriptive tags, provenance
//! (container credentials, platform labels, watermarks) and the fused
//! AI verdict, plus JSON-Schema validation for serialized records.

pub mod descriptive;
pub mod file;
pub mod provenance;
pub mod raw;
pub mod record;
pub mod schema;
pub mod technical;
pub mod validation;
pub mod verdict;

pub use descriptive::{DescriptiveProfile, IptcAiDeclaration, TimestampFact, TimestampSource};
pub use file::FileDescriptor;
pub use provenance::{
    ContainerCredential, CredentialAction, CredentialSource, GenerationMode, IngredientSummary,
    PlatformLabels, ProvenanceProfile, WatermarkDetection, WatermarkKind, WatermarkSummary,
};
pub use raw::RawArtifacts;
pub use record::MediaRecord;
pub use technical::{AudioStreamInfo, TechnicalProfile, VideoStreamInfo};
pub use validation::validate_record;
pub use verdict::{AiVerdict, ModelConfidence, Signal};
