//! Extraction pipeline for synthprobe.
//!
//! Each extractor wraps one evidence source (ffprobe, exiftool, content
//! credentials, platform provenance APIs, local heuristics) and writes its
//! findings into the shared [`MediaRecord`]. The pipeline runs whatever is
//! available on this machine, in fixed priority order, and never lets one
//! broken tool take down the analysis.
//!
//! [`MediaRecord`]: synthprobe_record_schema::MediaRecord

pub mod analyze;
pub mod c2patool;
pub mod config;
pub mod de;
pub mod exiftool;
pub mod ffprobe;
pub mod heuristic;
pub mod manifest;
pub mod pipeline;
pub mod tiktok;
pub mod tool;
pub mod youtube;

#[cfg(feature = "c2pa-library")]
pub mod c2pa_library;

pub use analyze::{analyze_file, Analysis, AnalyzeOptions};
pub use config::AnalysisConfig;
pub use pipeline::{default_registry, run_pipeline, Extractor, ExtractorRun, RunStatus};
