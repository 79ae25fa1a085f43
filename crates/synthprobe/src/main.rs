//! Synthprobe CLI - media provenance probing and AI-generation detection.

mod bundle;
mod render;
mod watermark;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use synthprobe_extractors::{analyze_file, default_registry, Analysis, AnalysisConfig, AnalyzeOptions};
use synthprobe_mp4box::{parse_file, DEFAULT_MAX_DEPTH};
use synthprobe_record_schema::{validate_record, MediaRecord};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "synthprobe")]
#[command(
    author,
    version,
    about = "Media provenance probing and AI-generation detection"
)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze media files for AI-generation provenance
    Analyze {
        /// Media file(s) to analyze
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Full analysis: scan raw bytes for interesting strings and
        /// default to the full report
        #[arg(long)]
        full: bool,

        /// Output format (defaults to `full` under --full)
        #[arg(long, value_enum)]
        format: Option<OutputFormat>,

        /// Save all records to a JSON report file
        #[arg(long, short)]
        out: Option<PathBuf>,

        /// Write an audit bundle (tar.gz; single input file only)
        #[arg(long)]
        bundle: Option<PathBuf>,

        /// Merge watermark detections from an external detector run
        /// (JSON file; single input file only)
        #[arg(long)]
        watermark: Option<PathBuf>,
    },

    /// Show extractor availability on this machine
    Status,

    /// Dump the container box tree of a file
    Boxes {
        /// MP4-family media file
        file: PathBuf,

        /// Maximum nesting depth to descend
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: u32,

        /// Emit JSON instead of the indented listing
        #[arg(long)]
        json: bool,
    },

    /// Validate a saved record against the schema
    Validate {
        /// Record JSON file to validate
        record: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Default,
    Full,
    Json,
    Quiet,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    match cli.command {
        Commands::Analyze {
            files,
            full,
            format,
            out,
            bundle,
            watermark,
        } => {
            let any_failed = run_analyze(files, full, format, out, bundle, watermark).await?;
            if any_failed {
                std::process::exit(1);
            }
        }

        Commands::Status => run_status()?,

        Commands::Boxes {
            file,
            max_depth,
            json,
        } => run_boxes(&file, max_depth, json)?,

        Commands::Validate { record } => {
            if !run_validate(&record)? {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

/// Analyze each file in turn. Per-file failures are reported and counted,
/// never fatal; the return value says whether any file failed.
async fn run_analyze(
    files: Vec<PathBuf>,
    full: bool,
    format: Option<OutputFormat>,
    out: Option<PathBuf>,
    bundle_out: Option<PathBuf>,
    watermark_file: Option<PathBuf>,
) -> anyhow::Result<bool> {
    if bundle_out.is_some() && files.len() != 1 {
        anyhow::bail!("--bundle requires exactly one input file");
    }
    if watermark_file.is_some() && files.len() != 1 {
        anyhow::bail!("--watermark requires exactly one input file");
    }

    let format = format.unwrap_or(if full {
        OutputFormat::Full
    } else {
        OutputFormat::Default
    });

    let config = AnalysisConfig::load()?;
    let options = AnalyzeOptions { full_scan: full };
    let detections = match &watermark_file {
        Some(path) => watermark::load_detections(path)?,
        None => Vec::new(),
    };

    let mut analyses: Vec<Analysis> = Vec::new();
    let mut errors = 0usize;

    for file in &files {
        println!("Analyzing: {}", file.display());
        match analyze_file(file, &config, &options).await {
            Ok(mut analysis) => {
                for detection in &detections {
                    analysis.record.attach_watermark(detection.clone());
                }
                print_record(&analysis.record, format)?;
                println!();
                analyses.push(analysis);
            }
            Err(e) => {
                eprintln!("Error analyzing {}: {}", file.display(), e);
                errors += 1;
            }
        }
    }

    if let Some(out) = &out {
        let records: Vec<&MediaRecord> = analyses.iter().map(|a| &a.record).collect();
        std::fs::write(out, serde_json::to_string_pretty(&records)?)
            .with_context(|| format!("Failed to write report to {}", out.display()))?;
        println!("Report saved to: {}", out.display());
    }

    if let Some(bundle_path) = &bundle_out {
        if let Some(analysis) = analyses.first() {
            bundle::write_bundle(analysis, bundle_path)?;
            println!("Audit bundle written to: {}", bundle_path.display());
        }
    }

    Ok(errors > 0)
}

fn print_record(record: &MediaRecord, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Default => println!("{}", render::format_default(record)),
        OutputFormat::Full => println!("{}", render::format_full(record)),
        OutputFormat::Json => println!("{}", record.to_json()?),
        OutputFormat::Quiet => println!("{}", render::format_quiet(record)),
    }
    Ok(())
}

fn run_status() -> anyhow::Result<()> {
    let config = AnalysisConfig::load()?;
    let mut extractors: Vec<(String, u32, bool)> = default_registry(&config)
        .iter()
        .map(|e| (e.name().to_string(), e.priority(), e.is_available()))
        .collect();
    extractors.sort_by_key(|&(_, priority, _)| priority);
    println!("{}", render::format_status(&extractors));
    Ok(())
}

fn run_boxes(file: &Path, max_depth: u32, json: bool) -> anyhow::Result<()> {
    if !file.exists() {
        anyhow::bail!("File not found: {}", file.display());
    }

    let records = parse_file(file, max_depth);
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else if records.is_empty() {
        println!("No boxes parsed from {}", file.display());
    } else {
        println!(
            "Box structure of {} ({} boxes):",
            file.display(),
            records.len()
        );
        println!("{}", render::format_box_tree(&records, 0));
    }
    Ok(())
}

fn run_validate(record_path: &Path) -> anyhow::Result<bool> {
    info!("Validating record: {}", record_path.display());
    let content = std::fs::read_to_string(record_path)
        .with_context(|| format!("Failed to read {}", record_path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&content)?;
    let result = validate_record(&value)?;

    if result.valid {
        println!("Record is valid");
    } else {
        println!("Record validation failed:");
        for error in &result.errors {
            println!("  - {}", error);
        }
    }

    if !result.warnings.is_empty() {
        println!("Warnings:");
        for warning in &result.warnings {
            println!("  - {}", warning);
        }
    }

    Ok(result.valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_analyze_with_options() {
        let cli = Cli::try_parse_from([
            "synthprobe",
            "analyze",
            "clip.mp4",
            "other.mov",
            "--full",
            "--format",
            "json",
            "--out",
            "report.json",
        ])
        .unwrap();
        match cli.command {
            Commands::Analyze {
                files,
                full,
                format,
                out,
                bundle,
                watermark,
            } => {
                assert_eq!(files.len(), 2);
                assert!(full);
                assert_eq!(format, Some(OutputFormat::Json));
                assert_eq!(out, Some(PathBuf::from("report.json")));
                assert!(bundle.is_none());
                assert!(watermark.is_none());
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn test_cli_analyze_requires_files() {
        assert!(Cli::try_parse_from(["synthprobe", "analyze"]).is_err());
    }

    #[test]
    fn test_cli_boxes_defaults() {
        let cli = Cli::try_parse_from(["synthprobe", "boxes", "clip.mp4"]).unwrap();
        match cli.command {
            Commands::Boxes {
                file,
                max_depth,
                json,
            } => {
                assert_eq!(file, PathBuf::from("clip.mp4"));
                assert_eq!(max_depth, DEFAULT_MAX_DEPTH);
                assert!(!json);
            }
            _ => panic!("expected boxes"),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(
            Cli::try_parse_from(["synthprobe", "analyze", "clip.mp4", "--format", "yaml"])
                .is_err()
        );
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::try_parse_from(["synthprobe", "status", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[tokio::test]
    async fn test_bundle_with_multiple_files_is_rejected() {
        let err = run_analyze(
            vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")],
            false,
            None,
            None,
            Some(PathBuf::from("audit.tgz")),
            None,
        )
        .await
        .unwrap_err();
        assert!(err.to_string().contains("exactly one input file"));
    }
}
