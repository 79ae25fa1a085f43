//! Record validation utilities.

use crate::schema;
use jsonschema::JSONSchema;
use serde_json::Value;
use thiserror::Error;

/// Validation error type.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error("Verdict confidence {overall} is below detected signal '{signal}' at {expected}")]
    UnderstatedConfidence {
        overall: f64,
        signal: String,
        expected: f64,
    },

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result of record validation.
#[derive(Debug)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a serialized record against the JSON schema plus the verdict
/// consistency rules the schema alone cannot express.
pub fn validate_record(record: &Value) -> Result<ValidationResult, ValidationError> {
    let mut result = ValidationResult::new();

    let schema_value = schema::record_schema();
    let compiled = JSONSchema::compile(&schema_value)
        .map_err(|e| ValidationError::SchemaError(e.to_string()))?;

    let validation = compiled.validate(record);
    if let Err(errors) = validation {
        for error in errors {
            result.add_error(ValidationError::SchemaError(format!(
                "{} at {}",
                error, error.instance_path
            )));
        }
    }

    check_verdict_consistency(record, &mut result);
    check_credential_consistency(record, &mut result);

    Ok(result)
}

/// Overall confidence must be at least the max of detected signals; the
/// fusion rules make it exactly that, so anything lower means a record was
/// edited outside the fusion path.
fn check_verdict_consistency(record: &Value, result: &mut ValidationResult) {
    let Some(verdict) = record.get("ai_verdict") else {
        return;
    };
    let overall = verdict
        .get("confidence")
        .and_then(|c| c.as_f64())
        .unwrap_or(0.0);

    if let Some(signals) = verdict.get("signals").and_then(|s| s.as_object()) {
        for (name, signal) in signals {
            let detected = signal
                .get("detected")
                .and_then(|d| d.as_bool())
                .unwrap_or(false);
            let confidence = signal
                .get("confidence")
                .and_then(|c| c.as_f64())
                .unwrap_or(0.0);
            if detected && confidence > overall + 1e-9 {
                result.add_error(ValidationError::UnderstatedConfidence {
                    overall,
                    signal: name.clone(),
                    expected: confidence,
                });
            }
        }
    }

    let is_ai = verdict
        .get("is_ai_generated")
        .and_then(|v| v.as_bool())
        .unwrap_or(false);
    let any_detected = verdict
        .get("signals")
        .and_then(|s| s.as_object())
        .map(|signals| {
            signals
                .values()
                .any(|s| s.get("detected").and_then(|d| d.as_bool()).unwrap_or(false))
        })
        .unwrap_or(false);
    if is_ai && !any_detected {
        result.add_warning("is_ai_generated set without any detected signal".to_string());
    }
}

fn check_credential_consistency(record: &Value, result: &mut ValidationResult) {
    let Some(credential) = record
        .get("provenance")
        .and_then(|p| p.get("credential"))
    else {
        return;
    };
    let has_credential = credential
        .get("has_credential")
        .and_then(|h| h.as_bool())
        .unwrap_or(false);
    let source_set = credential
        .get("source")
        .map(|s| !s.is_null())
        .unwrap_or(false);
    if has_credential && !source_set {
        result.add_warning("credential recorded without an extractor source".to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileDescriptor, MediaRecord};

    fn minimal_record() -> MediaRecord {
        MediaRecord::new(FileDescriptor {
            path: "/videos/clip.mp4".into(),
            filename: "clip.mp4".into(),
            extension: Some("mp4".into()),
            size_bytes: 10,
            created: None,
            modified: None,
            accessed: None,
        })
    }

    #[test]
    fn test_validate_default_record() {
        let record = minimal_record();
        let value = serde_json::to_value(&record).unwrap();
        let result = validate_record(&value).unwrap();
        assert!(result.valid, "Errors: {:?}", result.errors);
    }

    #[test]
    fn test_validate_populated_record() {
        let mut record = minimal_record();
        record
            .ai_verdict
            .add_signal("audio_96khz", true, 0.9, "96 kHz audio", false);
        record.ai_verdict.mark_ai_generated();
        let value = serde_json::to_value(&record).unwrap();
        let result = validate_record(&value).unwrap();
        assert!(result.valid, "Errors: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_section_fails() {
        let value = serde_json::json!({
            "schema_version": "1.0.0"
        });
        let result = validate_record(&value).unwrap();
        assert!(!result.valid);
    }

    #[test]
    fn test_understated_confidence_detected() {
        let mut record = minimal_record();
        record
            .ai_verdict
            .add_signal("tiktok_aigc", true, 0.95, "embedded label", true);
        // Damage the invariant the way an external edit would.
        record.ai_verdict.confidence = 0.2;
        let value = serde_json::to_value(&record).unwrap();
        let result = validate_record(&value).unwrap();
        assert!(!result.valid);
        assert!(matches!(
            result.errors[0],
            ValidationError::UnderstatedConfidence { .. }
        ));
    }

    #[test]
    fn test_credential_without_source_warns() {
        let mut record = minimal_record();
        record.provenance.credential.has_credential = true;
        let value = serde_json::to_value(&record).unwrap();
        let result = validate_record(&value).unwrap();
        assert!(result.valid);
        assert_eq!(result.warnings.len(), 1);
    }
}
