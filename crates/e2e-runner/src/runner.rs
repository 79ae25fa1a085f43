//! Fixture suite runner.
//!
//! Drives the real `synthprobe` binary over a directory of media files,
//! reads back the records it writes, and judges them against truth files.
//! Per-fixture failures never abort the suite.

use crate::metrics::{compare_record, FieldCheck};
use crate::truth::{load_truth, truth_path_for};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use synthprobe_record_schema::MediaRecord;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Extensions the runner treats as media fixtures.
const MEDIA_EXTENSIONS: [&str; 7] = ["mp4", "mov", "m4v", "m4a", "3gp", "webm", "mkv"];

/// Configuration for a suite run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub fixtures_dir: PathBuf,
    pub truth_dir: PathBuf,
    pub artifacts_dir: PathBuf,
    pub timeout_seconds: u64,
}

/// Outcome for one fixture.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureResult {
    pub fixture: String,
    pub has_truth: bool,
    pub passed: bool,
    pub checks: Vec<FieldCheck>,
    pub error: Option<String>,
    pub duration_seconds: f64,
}

impl FixtureResult {
    /// Failure lines for the checks that did not pass.
    pub fn failures(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.failure_line())
            .collect()
    }
}

/// Run every fixture in the configured directory.
pub async fn run_suite(config: &RunConfig) -> Result<Vec<FixtureResult>> {
    let binary = find_binary("synthprobe")
        .context("synthprobe binary not found in PATH or target/ directory")?;
    info!("Using synthprobe binary at {}", binary.display());

    std::fs::create_dir_all(&config.artifacts_dir).with_context(|| {
        format!(
            "Failed to create artifacts directory {}",
            config.artifacts_dir.display()
        )
    })?;

    let fixtures = list_fixtures(&config.fixtures_dir)?;
    if fixtures.is_empty() {
        anyhow::bail!(
            "No media fixtures found in {}",
            config.fixtures_dir.display()
        );
    }
    info!("Found {} fixture(s)", fixtures.len());

    let mut results = Vec::new();
    for fixture in &fixtures {
        results.push(run_fixture(&binary, fixture, config).await);
    }

    Ok(results)
}

/// List media files in a directory, sorted by name for stable reports.
fn list_fixtures(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("Failed to read fixtures directory {}", dir.display()))?;

    let mut fixtures = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && is_media_fixture(&path) {
            fixtures.push(path);
        }
    }
    fixtures.sort();
    Ok(fixtures)
}

fn is_media_fixture(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .map_or(false, |e| MEDIA_EXTENSIONS.contains(&e.as_str()))
}

async fn run_fixture(binary: &Path, fixture: &Path, config: &RunConfig) -> FixtureResult {
    let start = std::time::Instant::now();
    let name = fixture_name(fixture);

    let truth_path = truth_path_for(fixture, &config.truth_dir);
    let truth = if truth_path.exists() {
        match load_truth(&truth_path) {
            Ok(truth) => {
                if !truth.declares_anything() {
                    warn!("Truth file {} declares no expectations", truth_path.display());
                }
                Some(truth)
            }
            Err(e) => {
                return FixtureResult {
                    fixture: name,
                    has_truth: true,
                    passed: false,
                    checks: Vec::new(),
                    error: Some(format!("{e:#}")),
                    duration_seconds: start.elapsed().as_secs_f64(),
                };
            }
        }
    } else {
        debug!("No truth file for {}, analysis only", name);
        None
    };

    info!("Analyzing fixture: {}", name);
    let record = match analyze_fixture(binary, fixture, config).await {
        Ok(record) => record,
        Err(e) => {
            warn!("Fixture {} failed: {:#}", name, e);
            return FixtureResult {
                fixture: name,
                has_truth: truth.is_some(),
                passed: false,
                checks: Vec::new(),
                error: Some(format!("{e:#}")),
                duration_seconds: start.elapsed().as_secs_f64(),
            };
        }
    };

    let checks = truth
        .as_ref()
        .map(|t| compare_record(&record, t))
        .unwrap_or_default();
    let passed = checks.iter().all(|c| c.passed);

    FixtureResult {
        fixture: name,
        has_truth: truth.is_some(),
        passed,
        checks,
        error: None,
        duration_seconds: start.elapsed().as_secs_f64(),
    }
}

/// Run `synthprobe analyze` on one fixture and read back the record it
/// exported. Records land in the artifacts directory next to the results.
async fn analyze_fixture(binary: &Path, fixture: &Path, config: &RunConfig) -> Result<MediaRecord> {
    let record_path = config
        .artifacts_dir
        .join(format!("{}.record.json", fixture_name(fixture)));

    let mut command = Command::new(binary);
    command
        .arg("analyze")
        .arg(fixture)
        .args(["--format", "quiet", "--out"])
        .arg(&record_path)
        .kill_on_drop(true);

    let output = tokio::time::timeout(
        Duration::from_secs(config.timeout_seconds),
        command.output(),
    )
    .await
    .map_err(|_| anyhow::anyhow!("Timed out after {}s", config.timeout_seconds))?
    .context("Failed to run synthprobe analyze")?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        anyhow::bail!("synthprobe analyze failed: {}", stderr.trim());
    }

    let content = std::fs::read_to_string(&record_path)
        .with_context(|| format!("Failed to read record {}", record_path.display()))?;
    let records: Vec<MediaRecord> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse record {}", record_path.display()))?;

    records
        .into_iter()
        .next()
        .ok_or_else(|| anyhow::anyhow!("Empty record file {}", record_path.display()))
}

fn fixture_name(fixture: &Path) -> String {
    fixture
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Find a binary by name, checking PATH first, then target/release and
/// target/debug.
fn find_binary(name: &str) -> Result<PathBuf> {
    if let Ok(path) = which::which(name) {
        return Ok(path);
    }

    if let Ok(cwd) = std::env::current_dir() {
        let release_path = cwd.join("target/release").join(name);
        if release_path.exists() {
            return Ok(release_path);
        }

        let debug_path = cwd.join("target/debug").join(name);
        if debug_path.exists() {
            return Ok(debug_path);
        }
    }

    anyhow::bail!("{} not found in PATH or target/ directory", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::compare_record;
    use crate::truth::FixtureTruth;

    #[test]
    fn test_is_media_fixture() {
        assert!(is_media_fixture(Path::new("clip.mp4")));
        assert!(is_media_fixture(Path::new("CLIP.MOV")));
        assert!(is_media_fixture(Path::new("dir/clip.webm")));
        assert!(!is_media_fixture(Path::new("clip.mp4.truth.json")));
        assert!(!is_media_fixture(Path::new("notes.txt")));
        assert!(!is_media_fixture(Path::new("noextension")));
    }

    #[test]
    fn test_list_fixtures_filters_and_sorts() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.mp4"), b"x").unwrap();
        std::fs::write(dir.path().join("a.mov"), b"x").unwrap();
        std::fs::write(dir.path().join("a.mov.truth.json"), b"{}").unwrap();
        std::fs::write(dir.path().join("readme.md"), b"x").unwrap();
        std::fs::create_dir(dir.path().join("sub.mp4")).unwrap();

        let fixtures = list_fixtures(dir.path()).unwrap();
        let names: Vec<_> = fixtures.iter().map(|p| fixture_name(p)).collect();
        assert_eq!(names, vec!["a.mov", "b.mp4"]);
    }

    #[test]
    fn test_list_fixtures_missing_dir() {
        let err = list_fixtures(Path::new("/nonexistent/fixtures")).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to read fixtures directory"));
    }

    #[test]
    fn test_fixture_result_failures() {
        let truth: FixtureTruth =
            serde_json::from_str(r#"{"is_ai_generated": true, "has_credential": true}"#).unwrap();
        let record = MediaRecord::new(synthprobe_record_schema::FileDescriptor {
            path: "/fixtures/clip.mp4".into(),
            filename: "clip.mp4".into(),
            extension: Some("mp4".into()),
            size_bytes: 1,
            created: None,
            modified: None,
            accessed: None,
        });

        let checks = compare_record(&record, &truth);
        let result = FixtureResult {
            fixture: "clip.mp4".to_string(),
            has_truth: true,
            passed: false,
            checks,
            error: None,
            duration_seconds: 0.1,
        };

        let failures = result.failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("is_ai_generated"));
    }
}
