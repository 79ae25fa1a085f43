//! Extractor trait and priority-ordered pipeline.

use crate::config::AnalysisConfig;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use synthprobe_common::Result;
use synthprobe_record_schema::MediaRecord;
use tracing::{debug, info, warn};

/// One evidence source.
///
/// Extractors only ever add to the record; a failing extractor leaves
/// whatever it wrote before the failure in place and the pipeline moves on.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Stable name used in signal attribution and run reports.
    fn name(&self) -> &'static str;

    /// Lower runs earlier. Platform APIs 5, ffprobe 10, exiftool 15,
    /// credential readers 20/25, heuristics 90 (heuristics must see every
    /// technical fact before they run).
    fn priority(&self) -> u32;

    /// Whether this source can run on this machine (binary on PATH,
    /// credentials configured). Checked once per pipeline run.
    fn is_available(&self) -> bool;

    async fn extract(&self, path: &Path, record: &mut MediaRecord) -> Result<()>;
}

/// Outcome of one extractor in one pipeline run.
///
/// Run reports are diagnostics: they carry durations and error text and are
/// kept outside the evidence record, which stays byte-stable across runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractorRun {
    pub name: String,
    pub priority: u32,
    pub status: RunStatus,
    pub duration_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Ok,
    Failed,
    Skipped,
}

/// Build the standard extractor set for this configuration.
pub fn default_registry(config: &AnalysisConfig) -> Vec<Box<dyn Extractor>> {
    let mut extractors: Vec<Box<dyn Extractor>> = vec![
        Box::new(crate::youtube::YouTubeExtractor::new(config)),
        Box::new(crate::tiktok::TikTokExtractor::new(config)),
        Box::new(crate::ffprobe::FfprobeExtractor::new(config)),
        Box::new(crate::exiftool::ExiftoolExtractor::new(config)),
        Box::new(crate::c2patool::C2paToolExtractor::new(config)),
        Box::new(crate::heuristic::HeuristicExtractor::new()),
    ];
    #[cfg(feature = "c2pa-library")]
    extractors.push(Box::new(crate::c2pa_library::C2paLibraryExtractor::new()));
    extractors
}

/// Run extractors against one file in ascending priority order.
///
/// Unavailable extractors are reported as skipped without running; a
/// failure is logged and reported, never propagated.
pub async fn run_pipeline(
    extractors: &[Box<dyn Extractor>],
    path: &Path,
    record: &mut MediaRecord,
) -> Vec<ExtractorRun> {
    let mut order: Vec<&Box<dyn Extractor>> = extractors.iter().collect();
    order.sort_by_key(|e| e.priority());

    let mut runs = Vec::with_capacity(order.len());
    for extractor in order {
        if !extractor.is_available() {
            debug!("Extractor {} not available, skipping", extractor.name());
            runs.push(ExtractorRun {
                name: extractor.name().to_string(),
                priority: extractor.priority(),
                status: RunStatus::Skipped,
                duration_ms: 0,
                error: None,
            });
            continue;
        }

        info!("Running extractor: {}", extractor.name());
        let started = Instant::now();
        let result = extractor.extract(path, record).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let (status, error) = match result {
            Ok(()) => (RunStatus::Ok, None),
            Err(e) => {
                warn!("Extractor {} failed: {}", extractor.name(), e);
                (RunStatus::Failed, Some(e.to_string()))
            }
        };
        runs.push(ExtractorRun {
            name: extractor.name().to_string(),
            priority: extractor.priority(),
            status,
            duration_ms,
            error,
        });
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use synthprobe_common::Error;
    use synthprobe_record_schema::FileDescriptor;

    struct FakeExtractor {
        name: &'static str,
        priority: u32,
        available: bool,
        fail: bool,
        order: Arc<AtomicUsize>,
        seen_at: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Extractor for FakeExtractor {
        fn name(&self) -> &'static str {
            self.name
        }

        fn priority(&self) -> u32 {
            self.priority
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn extract(&self, _path: &Path, record: &mut MediaRecord) -> Result<()> {
            self.seen_at
                .store(self.order.fetch_add(1, Ordering::SeqCst), Ordering::SeqCst);
            if self.fail {
                // Write something first, then fail: partial writes must
                // survive.
                record.descriptive.title = Some("partial".to_string());
                return Err(Error::ToolExecution {
                    tool: self.name.to_string(),
                    reason: "deliberate".to_string(),
                });
            }
            record
                .ai_verdict
                .add_signal(self.name, true, 0.5, "fake", false);
            Ok(())
        }
    }

    fn fake(
        name: &'static str,
        priority: u32,
        available: bool,
        fail: bool,
        order: &Arc<AtomicUsize>,
    ) -> (Box<dyn Extractor>, Arc<AtomicUsize>) {
        let seen_at = Arc::new(AtomicUsize::new(usize::MAX));
        (
            Box::new(FakeExtractor {
                name,
                priority,
                available,
                fail,
                order: order.clone(),
                seen_at: seen_at.clone(),
            }),
            seen_at,
        )
    }

    fn record() -> MediaRecord {
        MediaRecord::new(FileDescriptor::default())
    }

    #[tokio::test]
    async fn test_runs_in_priority_order_not_registration_order() {
        let order = Arc::new(AtomicUsize::new(0));
        let (late, late_at) = fake("late", 90, true, false, &order);
        let (early, early_at) = fake("early", 5, true, false, &order);
        let (mid, mid_at) = fake("mid", 10, true, false, &order);
        let extractors = vec![late, early, mid];

        let mut rec = record();
        let runs = run_pipeline(&extractors, Path::new("/nope"), &mut rec).await;

        assert_eq!(early_at.load(Ordering::SeqCst), 0);
        assert_eq!(mid_at.load(Ordering::SeqCst), 1);
        assert_eq!(late_at.load(Ordering::SeqCst), 2);
        let names: Vec<&str> = runs.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["early", "mid", "late"]);
    }

    #[tokio::test]
    async fn test_failure_is_isolated_and_partial_writes_survive() {
        let order = Arc::new(AtomicUsize::new(0));
        let (bad, _) = fake("bad", 10, true, true, &order);
        let (good, _) = fake("good", 20, true, false, &order);
        let extractors = vec![bad, good];

        let mut rec = record();
        let runs = run_pipeline(&extractors, Path::new("/nope"), &mut rec).await;

        assert_eq!(runs[0].status, RunStatus::Failed);
        assert!(runs[0].error.as_deref().unwrap().contains("deliberate"));
        assert_eq!(runs[1].status, RunStatus::Ok);
        // The failing extractor's earlier write is still there.
        assert_eq!(rec.descriptive.title.as_deref(), Some("partial"));
        assert!(rec.ai_verdict.signals.contains_key("good"));
    }

    #[tokio::test]
    async fn test_unavailable_extractor_is_skipped_without_running() {
        let order = Arc::new(AtomicUsize::new(0));
        let (off, off_at) = fake("off", 10, false, false, &order);
        let extractors = vec![off];

        let mut rec = record();
        let runs = run_pipeline(&extractors, Path::new("/nope"), &mut rec).await;

        assert_eq!(runs[0].status, RunStatus::Skipped);
        assert_eq!(runs[0].duration_ms, 0);
        assert_eq!(off_at.load(Ordering::SeqCst), usize::MAX);
        assert!(rec.ai_verdict.signals.is_empty());
    }

    #[tokio::test]
    async fn test_empty_registry_is_fine() {
        let mut rec = record();
        let runs = run_pipeline(&[], Path::new("/nope"), &mut rec).await;
        assert!(runs.is_empty());
    }

    #[test]
    fn test_run_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&RunStatus::Skipped).unwrap(),
            "\"skipped\""
        );
    }
}
