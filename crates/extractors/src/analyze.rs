//! Whole-file analysis entry point.

use crate::config::AnalysisConfig;
use crate::pipeline::{default_registry, run_pipeline, ExtractorRun};
use std::path::Path;
use synthprobe_common::Error;
use synthprobe_common::Result;
use synthprobe_mp4box::{is_mp4_family, parse_file, scan_strings, DEFAULT_MAX_DEPTH};
use synthprobe_record_schema::descriptive::TimestampSource;
use synthprobe_record_schema::{FileDescriptor, MediaRecord};
use synthprobe_signals::{is_interesting, STRING_MAX_LEN, STRING_MIN_LEN};
use tracing::debug;

/// Knobs for one analysis run.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnalyzeOptions {
    /// Also scan the raw bytes for interesting strings (slower).
    pub full_scan: bool,
}

/// Everything one analysis produced: the evidence record plus the report of
/// which extractors ran and how they fared.
pub struct Analysis {
    pub record: MediaRecord,
    pub runs: Vec<ExtractorRun>,
}

/// Analyze one media file with every extractor available on this machine.
///
/// A missing file is the only fatal condition; broken tools and absent
/// credentials degrade to skipped or failed runs in the report.
pub async fn analyze_file(
    path: &Path,
    config: &AnalysisConfig,
    options: &AnalyzeOptions,
) -> Result<Analysis> {
    if !path.exists() {
        return Err(Error::FileNotFound(path.display().to_string()));
    }

    let file_info = FileDescriptor::from_path(path)?;
    let mut record = MediaRecord::new(file_info);
    seed_filesystem_timestamps(&mut record);

    if is_mp4_family(path) {
        record.raw.box_structure = parse_file(path, DEFAULT_MAX_DEPTH);
    }
    if options.full_scan {
        match scan_strings(
            path,
            STRING_MIN_LEN,
            STRING_MAX_LEN,
            config.string_scan_limit,
            is_interesting,
        ) {
            Ok(strings) => record.raw.strings = strings,
            Err(e) => debug!("string scan failed: {}", e),
        }
    }

    let extractors = default_registry(config);
    let runs = run_pipeline(&extractors, path, &mut record).await;

    Ok(Analysis { record, runs })
}

/// Filesystem times are the floor of the timestamp ranking: any embedded
/// or signed date replaces them, never the other way around.
fn seed_filesystem_timestamps(record: &mut MediaRecord) {
    // Birth time is only there on filesystems that track it.
    if let Some(created) = record.file_info.created {
        record
            .descriptive
            .creation_timestamp
            .assign(created, TimestampSource::Filesystem, None);
    }
    if let Some(modified) = record.file_info.modified {
        record
            .descriptive
            .modification_timestamp
            .assign(modified, TimestampSource::Filesystem, None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;

    fn write_minimal_mp4(file: &assert_fs::NamedTempFile) {
        // ftyp box then a free box; enough for the box parser to walk.
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&20u32.to_be_bytes());
        bytes.extend_from_slice(b"ftyp");
        bytes.extend_from_slice(b"isom");
        bytes.extend_from_slice(&[0, 0, 2, 0]);
        bytes.extend_from_slice(b"mp41");
        bytes.extend_from_slice(&16u32.to_be_bytes());
        bytes.extend_from_slice(b"free");
        bytes.extend_from_slice(b"c2pa.man");
        file.write_binary(&bytes).unwrap();
    }

    #[tokio::test]
    async fn test_missing_file_is_fatal() {
        let result = analyze_file(
            Path::new("/nonexistent/clip.mp4"),
            &AnalysisConfig::default(),
            &AnalyzeOptions::default(),
        )
        .await;
        assert!(matches!(result, Err(Error::FileNotFound(_))));
    }

    #[tokio::test]
    async fn test_analysis_produces_record_and_run_report() {
        let file = assert_fs::NamedTempFile::new("clip.mp4").unwrap();
        write_minimal_mp4(&file);

        let analysis = analyze_file(
            file.path(),
            &AnalysisConfig::default(),
            &AnalyzeOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(analysis.record.file_info.extension.as_deref(), Some("mp4"));
        assert!(analysis.record.file_info.size_bytes > 0);
        // Box tree parsed for the mp4 family.
        assert!(!analysis.record.raw.box_structure.is_empty());
        assert_eq!(analysis.record.raw.box_structure[0].box_type, "ftyp");
        // The heuristic stage needs nothing external, so it always reports.
        assert!(analysis.runs.iter().any(|r| r.name == "heuristic"));
        // No strings scan unless asked.
        assert!(analysis.record.raw.strings.is_empty());
    }

    #[tokio::test]
    async fn test_full_scan_collects_interesting_strings() {
        let file = assert_fs::NamedTempFile::new("clip.mp4").unwrap();
        write_minimal_mp4(&file);

        let options = AnalyzeOptions { full_scan: true };
        let analysis = analyze_file(file.path(), &AnalysisConfig::default(), &options)
            .await
            .unwrap();

        assert!(analysis
            .record
            .raw
            .strings
            .iter()
            .any(|s| s.contains("c2pa")));
    }

    #[tokio::test]
    async fn test_filesystem_times_seed_the_timestamp_facts() {
        let file = assert_fs::NamedTempFile::new("clip.bin").unwrap();
        file.write_binary(b"not a video").unwrap();

        let analysis = analyze_file(
            file.path(),
            &AnalysisConfig::default(),
            &AnalyzeOptions::default(),
        )
        .await
        .unwrap();

        let fact = &analysis.record.descriptive.modification_timestamp;
        assert!(fact.is_set());
        assert_eq!(fact.source, Some(TimestampSource::Filesystem));
        // Not the mp4 family, so no box walk.
        assert!(analysis.record.raw.box_structure.is_empty());
    }
}
