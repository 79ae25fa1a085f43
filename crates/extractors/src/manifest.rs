//! Shared parse of a content-credential manifest store.
//!
//! The in-process reader and the CLI fallback emit the same JSON shape; both
//! extractors funnel through [`apply_manifest_store`].

use crate::de;
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use synthprobe_common::Timestamp;
use synthprobe_record_schema::descriptive::TimestampSource;
use synthprobe_record_schema::provenance::{
    ContainerCredential, CredentialAction, CredentialSource, GenerationMode, IngredientSummary,
};
use synthprobe_record_schema::MediaRecord;
use synthprobe_signals::{match_signing_authority, normalize_generator};

/// Generation-task id baked into Sora-style manifest titles.
static TASK_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^([a-f0-9]{32})_media\.(mp4|webm|mov)$").unwrap());

const IMAGE_FORMAT_TOKENS: &[&str] = &["image", "jpeg", "jpg", "png", "webp"];
const VIDEO_FORMAT_TOKENS: &[&str] = &["video", "mp4", "webm", "mov"];

/// Populate the record's credential facts from a manifest store document.
pub fn apply_manifest_store(data: &Value, source: CredentialSource, record: &mut MediaRecord) {
    record.raw.c2pa_manifest = Some(data.clone());
    record.provenance.credential.has_credential = true;
    record.provenance.credential.source = Some(source);

    let Some(active_id) = data.get("active_manifest").and_then(de::string_from_value) else {
        return;
    };
    record.provenance.credential.manifest_id = Some(active_id.clone());

    let Some(manifest) = data
        .get("manifests")
        .and_then(|m| m.get(active_id.as_str()))
    else {
        return;
    };

    let creation = parse_manifest(data, manifest, &mut record.provenance.credential);
    if let Some((ts, raw)) = creation {
        record
            .descriptive
            .creation_timestamp
            .assign(ts, TimestampSource::C2pa, Some(raw));
    }
    update_verdict(record);
}

/// Fill the credential from the active manifest, returning the creation
/// timestamp claimed by a `c2pa.created` / `c2pa.published` action, if any.
fn parse_manifest(
    store: &Value,
    manifest: &Value,
    cred: &mut ContainerCredential,
) -> Option<(Timestamp, String)> {
    cred.title = manifest.get("title").and_then(de::string_from_value);
    cred.format = manifest.get("format").and_then(de::string_from_value);
    cred.instance_id = manifest
        .get("instance_id")
        .or_else(|| manifest.get("instanceId"))
        .and_then(de::string_from_value);

    if let Some(title) = &cred.title {
        if let Some(caps) = TASK_ID_PATTERN.captures(title) {
            cred.task_id = caps.get(1).map(|m| m.as_str().to_string());
        }
    }

    parse_claim_generator(manifest, cred);
    parse_signature_info(manifest, cred);

    let mut creation = None;
    if let Some(assertions) = manifest.get("assertions").and_then(Value::as_array) {
        for assertion in assertions {
            let label = assertion
                .get("label")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if label.starts_with("c2pa.actions") {
                let parsed = parse_actions(assertion.get("data"), cred);
                creation = creation.or(parsed);
            }
        }
    }

    cred.validation_state = store.get("validation_state").and_then(de::string_from_value);
    cred.claim_signature_valid = cred
        .validation_state
        .as_deref()
        .map(|state| state == "Valid");

    if let Some(statuses) = store.get("validation_status").and_then(Value::as_array) {
        for status in statuses {
            let message = status
                .get("explanation")
                .or_else(|| status.get("code"))
                .and_then(de::string_from_value);
            if let Some(message) = message {
                cred.validation_errors.push(message);
            }
            let code = status
                .get("code")
                .and_then(Value::as_str)
                .unwrap_or_default();
            if code.to_lowercase().contains("untrusted") {
                cred.cert_trusted = Some(false);
            }
        }
    }
    // An untrusted code above forces false; a clean Valid state means the
    // chain resolved against the trust list.
    if cred.cert_trusted.is_none() && cred.validation_state.as_deref() == Some("Valid") {
        cred.cert_trusted = Some(true);
    }

    if let Some(ingredients) = manifest.get("ingredients").and_then(Value::as_array) {
        cred.ingredient_count = ingredients.len();
        cred.ingredients = ingredients.iter().map(ingredient_summary).collect();
    }

    infer_generation_mode(cred);
    creation
}

fn parse_claim_generator(manifest: &Value, cred: &mut ContainerCredential) {
    let Some(first) = manifest
        .get("claim_generator_info")
        .and_then(Value::as_array)
        .and_then(|list| list.first())
    else {
        return;
    };
    match first {
        Value::Object(info) => {
            cred.claim_generator = info.get("name").and_then(de::string_from_value);
            // SDK identity rides along as e.g. "org.contentauth.c2pa_rs": "0.67.1".
            for (key, value) in info {
                if key.starts_with("org.contentauth.") || key == "version" {
                    cred.claim_generator_product =
                        Some(key.trim_start_matches("org.contentauth.").to_string());
                    cred.claim_generator_version = de::string_from_value(value);
                    break;
                }
            }
        }
        Value::String(name) => cred.claim_generator = Some(name.clone()),
        _ => {}
    }
}

fn parse_signature_info(manifest: &Value, cred: &mut ContainerCredential) {
    let Some(sig) = manifest.get("signature_info") else {
        return;
    };
    cred.issuer = sig.get("issuer").and_then(de::string_from_value);
    cred.signer_name = sig.get("common_name").and_then(de::string_from_value);
    cred.cert_serial_number = sig.get("cert_serial_number").and_then(de::string_from_value);
    cred.signature_algorithm = sig.get("alg").and_then(de::string_from_value);
    cred.cert_trusted = sig.get("cert_trusted").and_then(Value::as_bool);
    cred.signature_time = sig
        .get("time")
        .and_then(de::string_from_value)
        .and_then(|s| Timestamp::parse_iso8601(&s));
}

fn parse_actions(
    data: Option<&Value>,
    cred: &mut ContainerCredential,
) -> Option<(Timestamp, String)> {
    let actions = data?.get("actions").and_then(Value::as_array)?;
    let mut creation = None;

    for action in actions {
        let kind = action
            .get("action")
            .and_then(de::string_from_value)
            .unwrap_or_default();

        let agent = match action.get("softwareAgent") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Object(o)) => o.get("name").and_then(de::string_from_value),
            _ => None,
        };
        if agent.is_some() {
            cred.software_agent = agent.clone();
        }

        let source_type = action
            .get("digitalSourceType")
            .and_then(de::string_from_value)
            .map(|s| trailing_segment(&s).to_string());
        if source_type.is_some() {
            cred.digital_source_type = source_type.clone();
        }

        let when = action.get("when").and_then(de::string_from_value);
        if creation.is_none() && matches!(kind.as_str(), "c2pa.created" | "c2pa.published") {
            if let Some(raw) = &when {
                if let Some(ts) = Timestamp::parse_iso8601(raw) {
                    creation = Some((ts, raw.clone()));
                }
            }
        }

        cred.actions.push(CredentialAction {
            action: kind,
            software_agent: agent,
            digital_source_type: source_type,
            when,
        });
    }
    creation
}

fn ingredient_summary(ingredient: &Value) -> IngredientSummary {
    IngredientSummary {
        title: ingredient.get("title").and_then(de::string_from_value),
        format: ingredient.get("format").and_then(de::string_from_value),
        relationship: ingredient.get("relationship").and_then(de::string_from_value),
        instance_id: ingredient
            .get("instance_id")
            .or_else(|| ingredient.get("instanceId"))
            .and_then(de::string_from_value),
    }
}

/// How the generation was conditioned, judged from the ingredient formats.
/// Only meaningful for AI-declared content; video ingredients beat image.
fn infer_generation_mode(cred: &mut ContainerCredential) {
    if !cred.declares_ai_generation() {
        return;
    }
    if cred.ingredient_count == 0 {
        cred.generation_mode = Some(GenerationMode::TextToVideo);
        return;
    }
    let mut has_image = false;
    let mut has_video = false;
    for ingredient in &cred.ingredients {
        let format = ingredient
            .format
            .as_deref()
            .unwrap_or_default()
            .to_lowercase();
        if IMAGE_FORMAT_TOKENS.iter().any(|t| format.contains(t)) {
            has_image = true;
        }
        if VIDEO_FORMAT_TOKENS.iter().any(|t| format.contains(t)) {
            has_video = true;
        }
    }
    cred.generation_mode = Some(if has_video {
        GenerationMode::VideoToVideo
    } else if has_image {
        GenerationMode::ImageToVideo
    } else {
        GenerationMode::TextToVideo
    });
}

fn update_verdict(record: &mut MediaRecord) {
    let cred = &record.provenance.credential;
    let source_type = cred.digital_source_type.clone();
    let candidates: Vec<String> = [&cred.claim_generator, &cred.software_agent, &cred.signer_name]
        .into_iter()
        .filter_map(|c| c.clone())
        .collect();
    let raw_fallback = cred.claim_generator.clone().or_else(|| cred.software_agent.clone());
    let issuer = cred.issuer.clone();
    let declares_ai = cred.declares_ai_generation();

    if declares_ai {
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.add_signal(
            "c2pa_source_type",
            true,
            1.0,
            format!(
                "digitalSourceType: {}",
                source_type.unwrap_or_default()
            ),
            true,
        );
    }

    let mut attributed = false;
    for candidate in &candidates {
        if let Some((_, display)) = normalize_generator(candidate) {
            record.ai_verdict.attribute_generator(display, candidate.clone());
            record.ai_verdict.mark_ai_generated();
            attributed = true;
            break;
        }
    }
    if !attributed && record.ai_verdict.generator_raw.is_none() {
        record.ai_verdict.generator_raw = raw_fallback;
    }

    if let Some(issuer) = issuer {
        if let Some(authority) = match_signing_authority(&issuer) {
            record.ai_verdict.add_signing_authority(authority);
        }
    }
}

fn trailing_segment(source_type: &str) -> &str {
    match source_type.rfind('/') {
        Some(idx) => &source_type[idx + 1..],
        None => source_type,
    }
}
