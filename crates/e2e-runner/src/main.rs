//! Synthprobe end-to-end fixture runner.
//!
//! Analyzes every media fixture in a directory through the real binary
//! and judges the records against per-fixture truth files.

mod metrics;
mod report;
mod runner;
mod truth;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "synthprobe-e2e-runner")]
#[command(author, version, about = "End-to-end fixture runner for synthprobe")]
struct Cli {
    /// Directory containing media fixtures
    #[arg(long)]
    fixtures: PathBuf,

    /// Directory containing truth files (defaults to the fixtures directory)
    #[arg(long)]
    truth: Option<PathBuf>,

    /// Write a markdown report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Output directory for per-fixture records and results
    #[arg(long, default_value = "./artifacts")]
    artifacts: PathBuf,

    /// Per-fixture timeout in seconds
    #[arg(long, default_value = "120")]
    timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();

    let config = runner::RunConfig {
        truth_dir: cli.truth.unwrap_or_else(|| cli.fixtures.clone()),
        fixtures_dir: cli.fixtures,
        artifacts_dir: cli.artifacts,
        timeout_seconds: cli.timeout,
    };

    info!("Running fixtures from {}", config.fixtures_dir.display());
    let results = runner::run_suite(&config).await?;
    let summary = metrics::summarize(&results);

    report::print_summary(&results, &summary);

    let results_json = serde_json::to_string_pretty(&serde_json::json!({
        "summary": &summary,
        "results": &results,
    }))?;
    let results_path = config.artifacts_dir.join("results.json");
    std::fs::write(&results_path, results_json)
        .with_context(|| format!("Failed to write results to {}", results_path.display()))?;

    if let Some(report_path) = &cli.report {
        let markdown = report::render_markdown(&results, &summary);
        std::fs::write(report_path, markdown)
            .with_context(|| format!("Failed to write report to {}", report_path.display()))?;
        println!("\nReport written to: {}", report_path.display());
    }

    if summary.failed > 0 || summary.errored > 0 {
        std::process::exit(1);
    }

    Ok(())
}
