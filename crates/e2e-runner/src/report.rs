//! Suite report rendering: console summary plus a markdown report.

use crate::metrics::SuiteSummary;
use crate::runner::FixtureResult;
use synthprobe_common::Timestamp;

fn status_label(result: &FixtureResult) -> &'static str {
    if result.error.is_some() {
        "ERROR"
    } else if !result.has_truth {
        "SKIP"
    } else if result.passed {
        "PASS"
    } else {
        "FAIL"
    }
}

/// Print the suite outcome to stdout.
pub fn print_summary(results: &[FixtureResult], summary: &SuiteSummary) {
    println!("\n=== Fixture Results ===");
    println!("{:-<80}", "");
    println!(
        "{:<40} {:>8} {:>8} {:>10}",
        "Fixture", "Status", "Checks", "Time(s)"
    );
    println!("{:-<80}", "");

    for result in results {
        println!(
            "{:<40} {:>8} {:>8} {:>10.2}",
            &result.fixture[..result.fixture.len().min(40)],
            status_label(result),
            result.checks.len(),
            result.duration_seconds
        );
    }
    println!("{:-<80}", "");
    println!(
        "Passed: {}/{} (skipped: {}, errored: {})",
        summary.passed, summary.with_truth, summary.skipped, summary.errored
    );

    println!("\nField accuracy:");
    for accuracy in &summary.field_accuracy {
        println!(
            "  {:<18} {:>6.1}%  ({}/{} checks)",
            accuracy.field,
            accuracy.ratio() * 100.0,
            accuracy.correct,
            accuracy.checked
        );
    }

    let problems: Vec<_> = results
        .iter()
        .filter(|r| r.error.is_some() || (r.has_truth && !r.passed))
        .collect();
    if !problems.is_empty() {
        println!("\nFailures:");
        for result in problems {
            println!("\n  {} ({:.2}s):", result.fixture, result.duration_seconds);
            if let Some(error) = &result.error {
                println!("    error: {}", error);
            }
            for failure in result.failures() {
                println!("    - {}", failure);
            }
        }
    }
}

/// Render the markdown report.
pub fn render_markdown(results: &[FixtureResult], summary: &SuiteSummary) -> String {
    let mut lines = Vec::new();

    lines.push("# synthprobe e2e report".to_string());
    lines.push(String::new());
    lines.push(format!("Generated: {}", Timestamp::now().to_iso8601()));
    lines.push(String::new());

    lines.push("## Summary".to_string());
    lines.push(String::new());
    lines.push("| Metric | Value |".to_string());
    lines.push("|--------|-------|".to_string());
    lines.push(format!("| Fixtures | {} |", summary.total));
    lines.push(format!("| With truth | {} |", summary.with_truth));
    lines.push(format!("| Passed | {} |", summary.passed));
    lines.push(format!("| Failed | {} |", summary.failed));
    lines.push(format!("| Errored | {} |", summary.errored));
    lines.push(format!("| Skipped (no truth) | {} |", summary.skipped));
    lines.push(String::new());

    lines.push("## Field accuracy".to_string());
    lines.push(String::new());
    lines.push("| Field | Accuracy | Correct | Checked |".to_string());
    lines.push("|-------|----------|---------|---------|".to_string());
    for accuracy in &summary.field_accuracy {
        lines.push(format!(
            "| {} | {:.1}% | {} | {} |",
            accuracy.field,
            accuracy.ratio() * 100.0,
            accuracy.correct,
            accuracy.checked
        ));
    }
    lines.push(String::new());

    lines.push("## Fixtures".to_string());
    lines.push(String::new());
    lines.push("| Fixture | Status | Time | Notes |".to_string());
    lines.push("|---------|--------|------|-------|".to_string());
    for result in results {
        let notes = match &result.error {
            Some(error) => error.replace('\n', " "),
            None => result.failures().join("; "),
        };
        lines.push(format!(
            "| {} | {} | {:.2}s | {} |",
            result.fixture,
            status_label(result),
            result.duration_seconds,
            notes.replace('|', "\\|")
        ));
    }
    lines.push(String::new());

    lines.join("\n")
}
