//! Truth comparison and suite metrics.

use crate::runner::FixtureResult;
use crate::truth::FixtureTruth;
use serde::{Deserialize, Serialize};
use synthprobe_record_schema::MediaRecord;

/// Truth fields in report order.
const TRUTH_FIELDS: [&str; 4] = [
    "is_ai_generated",
    "generator",
    "has_credential",
    "min_confidence",
];

/// One checked expectation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldCheck {
    pub field: String,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

impl FieldCheck {
    fn new(field: &str, expected: impl ToString, actual: impl ToString, passed: bool) -> Self {
        Self {
            field: field.to_string(),
            expected: expected.to_string(),
            actual: actual.to_string(),
            passed,
        }
    }

    /// Failure line, e.g. `generator: expected "OpenAI Sora", got none`.
    pub fn failure_line(&self) -> String {
        format!(
            "{}: expected {}, got {}",
            self.field, self.expected, self.actual
        )
    }
}

/// Compare a record against declared expectations. Undeclared fields
/// produce no check.
pub fn compare_record(record: &MediaRecord, truth: &FixtureTruth) -> Vec<FieldCheck> {
    let mut checks = Vec::new();

    if let Some(expected) = truth.is_ai_generated {
        let actual = record.ai_verdict.is_ai_generated;
        checks.push(FieldCheck::new(
            "is_ai_generated",
            expected,
            actual,
            actual == expected,
        ));
    }

    if let Some(expected) = &truth.generator {
        let actual = record.ai_verdict.generator.as_deref();
        let passed = actual.map_or(false, |g| g.eq_ignore_ascii_case(expected));
        checks.push(FieldCheck::new(
            "generator",
            format!("\"{expected}\""),
            actual
                .map(|g| format!("\"{g}\""))
                .unwrap_or_else(|| "none".to_string()),
            passed,
        ));
    }

    if let Some(expected) = truth.has_credential {
        let actual = record.provenance.credential.has_credential;
        checks.push(FieldCheck::new(
            "has_credential",
            expected,
            actual,
            actual == expected,
        ));
    }

    if let Some(min) = truth.min_confidence {
        let actual = record.ai_verdict.confidence;
        checks.push(FieldCheck::new(
            "min_confidence",
            format!(">= {min:.2}"),
            format!("{actual:.2}"),
            actual >= min,
        ));
    }

    checks
}

/// Aggregate counts and per-field accuracy across a suite run.
#[derive(Debug, Clone, Serialize)]
pub struct SuiteSummary {
    pub total: usize,
    pub with_truth: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Fixtures analyzed without a truth file.
    pub skipped: usize,
    pub field_accuracy: Vec<FieldAccuracy>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldAccuracy {
    pub field: String,
    pub checked: usize,
    pub correct: usize,
}

impl FieldAccuracy {
    /// Fraction of checks that passed; 1.0 when nothing was checked.
    pub fn ratio(&self) -> f64 {
        if self.checked == 0 {
            1.0
        } else {
            self.correct as f64 / self.checked as f64
        }
    }
}

/// Fold fixture results into a suite summary.
pub fn summarize(results: &[FixtureResult]) -> SuiteSummary {
    let mut summary = SuiteSummary {
        total: results.len(),
        with_truth: 0,
        passed: 0,
        failed: 0,
        errored: 0,
        skipped: 0,
        field_accuracy: TRUTH_FIELDS
            .iter()
            .map(|field| FieldAccuracy {
                field: field.to_string(),
                checked: 0,
                correct: 0,
            })
            .collect(),
    };

    for result in results {
        if result.has_truth {
            summary.with_truth += 1;
        }

        if result.error.is_some() {
            summary.errored += 1;
        } else if !result.has_truth {
            summary.skipped += 1;
        } else if result.passed {
            summary.passed += 1;
        } else {
            summary.failed += 1;
        }

        for check in &result.checks {
            if let Some(accuracy) = summary
                .field_accuracy
                .iter_mut()
                .find(|a| a.field == check.field)
            {
                accuracy.checked += 1;
                if check.passed {
                    accuracy.correct += 1;
                }
            }
        }
    }

    summary
}
