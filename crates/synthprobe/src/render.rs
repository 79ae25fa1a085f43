//! Human-readable report rendering for analyzed records.

use synthprobe_mp4box::BoxRecord;
use synthprobe_record_schema::{MediaRecord, ModelConfidence};

const RULE: &str = "======================================================================";
const SUBRULE: &str = "----------------------------------------";

/// Standard audio sample rates; anything else is worth flagging.
const COMMON_SAMPLE_RATES: &[i64] = &[8000, 11025, 16000, 22050, 44100, 48000];

/// One line per file: name | duration | resolution | AI | C2PA.
pub fn format_quiet(record: &MediaRecord) -> String {
    let mut parts = Vec::new();
    parts.push(record.file_info.filename.clone());
    parts.push(record.technical.duration_formatted());
    parts.push(
        record
            .technical
            .video
            .resolution()
            .unwrap_or_else(|| "N/A".to_string()),
    );

    let verdict = &record.ai_verdict;
    if verdict.is_ai_generated {
        let generator = verdict.generator.as_deref().unwrap_or("Unknown");
        parts.push(format!("AI: yes ({generator})"));
    } else {
        parts.push("AI: no".to_string());
    }

    if record.provenance.credential.has_credential {
        parts.push("C2PA: yes".to_string());
    } else {
        parts.push("C2PA: no".to_string());
    }

    parts.join(" | ")
}

/// Concise report: generation facts, video specs, credential validation.
pub fn format_default(record: &MediaRecord) -> String {
    let mut lines = Vec::new();
    lines.push(RULE.to_string());
    lines.push(format!("File: {}", record.file_info.filename));
    lines.push(RULE.to_string());

    let cred = &record.provenance.credential;
    let verdict = &record.ai_verdict;

    if cred.has_credential || verdict.is_ai_generated {
        lines.push(String::new());
        lines.push("## AI GENERATION".to_string());

        let generator = verdict
            .generator
            .as_deref()
            .or(cred.claim_generator.as_deref())
            .unwrap_or("Unknown");
        lines.push(format!("  Generator:    {generator}"));

        if let Some(time) = cred.signature_time {
            lines.push(format!("  Created:      {}", time.to_display()));
        }
        if let Some(title) = &cred.title {
            lines.push(format!("  Title:        {title}"));
        }
        if let Some(dst) = &cred.digital_source_type {
            lines.push(format!("  Source Type:  {dst}"));
        }
        match (&cred.issuer, &cred.signer_name) {
            (Some(issuer), Some(signer)) => {
                lines.push(format!("  Signed By:    {issuer} ({signer})"));
            }
            (Some(issuer), None) => lines.push(format!("  Signed By:    {issuer}")),
            _ => {}
        }
    }

    lines.push(String::new());
    lines.push("## VIDEO INFO".to_string());

    let tech = &record.technical;
    lines.push(format!("  Duration:     {}", tech.duration_formatted()));
    if let Some(resolution) = tech.video.resolution() {
        match tech.video.aspect_ratio() {
            Some(aspect) => lines.push(format!("  Resolution:   {resolution} ({aspect})")),
            None => lines.push(format!("  Resolution:   {resolution}")),
        }
    }
    if let Some(fps) = tech.video.fps {
        lines.push(format!("  Frame Rate:   {fps:.0} fps"));
    }
    lines.push(format!("  Size:         {}", record.file_info.size_human()));

    if cred.has_credential {
        lines.push(String::new());
        lines.push("## C2PA VALIDATION".to_string());
        lines.push(format!(
            "  Status:       {}",
            cred.validation_state.as_deref().unwrap_or("Unknown")
        ));
        if let Some(id) = &cred.manifest_id {
            lines.push(format!("  Manifest ID:  {id}"));
        }
    }

    lines.push(String::new());
    lines.push(RULE.to_string());
    lines.join("\n")
}

/// Everything the record holds, section by section.
pub fn format_full(record: &MediaRecord) -> String {
    let mut lines = Vec::new();
    lines.push(RULE.to_string());
    lines.push("MEDIA PROVENANCE REPORT (FULL)".to_string());
    lines.push(RULE.to_string());
    lines.push(String::new());

    push_file_section(record, &mut lines);
    push_technical_section(record, &mut lines);
    push_credential_section(record, &mut lines);
    push_verdict_section(record, &mut lines);
    push_platform_section(record, &mut lines);
    push_watermark_section(record, &mut lines);
    push_descriptive_section(record, &mut lines);
    push_raw_section(record, &mut lines);

    lines.push(RULE.to_string());
    lines.join("\n")
}

fn push_file_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let info = &record.file_info;
    lines.push("## FILE INFORMATION".to_string());
    lines.push(format!("  filename: {}", info.filename));
    lines.push(format!("  path: {}", info.path));
    lines.push(format!("  size_bytes: {}", info.size_bytes));
    lines.push(format!("  size_human: {}", info.size_human()));
    if let Some(created) = info.created {
        lines.push(format!("  created: {}", created.to_iso8601()));
    }
    if let Some(modified) = info.modified {
        lines.push(format!("  modified: {}", modified.to_iso8601()));
    }
    if let Some(extension) = &info.extension {
        lines.push(format!("  extension: {extension}"));
    }
    lines.push(String::new());
}

fn push_technical_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let tech = &record.technical;
    lines.push("## TECHNICAL INFORMATION".to_string());
    if let Some(container) = &tech.container {
        lines.push(format!("  container: {container}"));
    }
    if let Some(long) = &tech.container_long {
        lines.push(format!("  container_long: {long}"));
    }
    if let Some(duration) = tech.duration_seconds {
        lines.push(format!("  duration: {duration:.6}s"));
    }
    if let Some(bitrate) = tech.bitrate {
        lines.push(format!("  bitrate: {bitrate}"));
    }
    if let Some(count) = tech.stream_count {
        lines.push(format!("  stream_count: {count}"));
    }
    lines.push(String::new());

    let video = &tech.video;
    if video.codec.is_some() {
        lines.push("  [VIDEO]".to_string());
        if let Some(codec) = &video.codec {
            lines.push(format!("    codec: {codec}"));
        }
        if let Some(long) = &video.codec_long {
            lines.push(format!("    codec_long: {long}"));
        }
        if let Some(profile) = &video.profile {
            lines.push(format!("    profile: {profile}"));
        }
        if let Some(resolution) = video.resolution() {
            lines.push(format!("    resolution: {resolution}"));
        }
        if let Some(fps) = video.fps {
            lines.push(format!("    fps: {fps}"));
        }
        if let Some(bitrate) = video.bitrate {
            lines.push(format!("    bitrate: {bitrate}"));
        }
        if let Some(pix) = &video.pixel_format {
            lines.push(format!("    pixel_format: {pix}"));
        }
        if let Some(encoder) = &video.encoder {
            lines.push(format!("    encoder: {encoder}"));
        }
        if let Some(handler) = &video.handler {
            lines.push(format!("    handler: {handler}"));
        }
        lines.push(String::new());
    }

    let audio = &tech.audio;
    if audio.codec.is_some() {
        lines.push("  [AUDIO]".to_string());
        if let Some(codec) = &audio.codec {
            lines.push(format!("    codec: {codec}"));
        }
        if let Some(long) = &audio.codec_long {
            lines.push(format!("    codec_long: {long}"));
        }
        if let Some(profile) = &audio.profile {
            lines.push(format!("    profile: {profile}"));
        }
        if let Some(rate) = audio.sample_rate {
            lines.push(format!("    sample_rate: {rate}"));
            if rate == 96000 {
                lines.push("    sample_rate_note: Sora signature (typical: 48000)".to_string());
            } else if !COMMON_SAMPLE_RATES.contains(&rate) {
                lines.push(
                    "    sample_rate_note: Unusual rate (typical: 44100/48000)".to_string(),
                );
            }
        }
        if let Some(channels) = audio.channels {
            lines.push(format!("    channels: {channels}"));
        }
        if let Some(layout) = &audio.channel_layout {
            lines.push(format!("    channel_layout: {layout}"));
        }
        if let Some(bitrate) = audio.bitrate {
            lines.push(format!("    bitrate: {bitrate}"));
        }
        lines.push(String::new());
    }
}

fn push_credential_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let cred = &record.provenance.credential;
    if !cred.has_credential {
        return;
    }

    lines.push("## C2PA / PROVENANCE".to_string());
    lines.push(format!("  has_credential: {}", cred.has_credential));
    if let Some(source) = cred.source {
        lines.push(format!("  source: {source}"));
    }
    if let Some(id) = &cred.manifest_id {
        lines.push(format!("  manifest_id: {id}"));
    }
    if let Some(title) = &cred.title {
        lines.push(format!("  title: {title}"));
    }
    if let Some(task_id) = &cred.task_id {
        lines.push(format!("  task_id: {task_id}"));
    }
    if let Some(instance) = &cred.instance_id {
        lines.push(format!("  instance_id: {instance}"));
    }
    if let Some(generator) = &cred.claim_generator {
        lines.push(format!("  claim_generator: {generator}"));
    }
    if let Some(agent) = &cred.software_agent {
        lines.push(format!("  software_agent: {agent}"));
    }
    if let Some(version) = &cred.claim_generator_version {
        lines.push(format!("  claim_generator_version: {version}"));
    }
    if let Some(issuer) = &cred.issuer {
        lines.push(format!("  issuer: {issuer}"));
    }
    if let Some(signer) = &cred.signer_name {
        lines.push(format!("  signer_name: {signer}"));
    }
    if let Some(time) = cred.signature_time {
        lines.push(format!("  signature_time: {}", time.to_iso8601()));
    }
    if let Some(alg) = &cred.signature_algorithm {
        lines.push(format!("  signature_algorithm: {alg}"));
    }
    if let Some(dst) = &cred.digital_source_type {
        lines.push(format!("  digital_source_type: {dst}"));
    }
    if let Some(state) = &cred.validation_state {
        lines.push(format!("  validation_state: {state}"));
    }
    // Explicit even when false; an untrusted chain is the headline.
    if let Some(trusted) = cred.cert_trusted {
        lines.push(format!("  cert_trusted: {trusted}"));
    }
    if !cred.actions.is_empty() {
        lines.push(format!("  actions: {} action(s)", cred.actions.len()));
        for action in &cred.actions {
            match &action.when {
                Some(when) => lines.push(format!("    - {} (when: {when})", action.action)),
                None => lines.push(format!("    - {}", action.action)),
            }
        }
    }
    if cred.ingredient_count > 0 {
        lines.push(format!(
            "  ingredients: {} ingredient(s)",
            cred.ingredient_count
        ));
        for ingredient in cred.ingredients.iter().take(5) {
            let title = ingredient.title.as_deref().unwrap_or("unknown");
            let format = ingredient.format.as_deref().unwrap_or("");
            lines.push(format!("    - {title} ({format})"));
        }
        if cred.ingredient_count > 5 {
            lines.push(format!("    ... and {} more", cred.ingredient_count - 5));
        }
    } else {
        lines.push("  ingredients: None".to_string());
    }
    if let Some(mode) = cred.generation_mode {
        lines.push(format!("  generation_mode: {mode} [ANALYSIS]"));
    }
    lines.push(String::new());

    let has_validation_details = cred.claim_signature_valid.is_some()
        || !cred.validation_errors.is_empty()
        || cred.cert_serial_number.is_some();
    if has_validation_details {
        lines.push("  [VALIDATION DETAILS]".to_string());
        if let Some(valid) = cred.claim_signature_valid {
            lines.push(format!("    claim_signature_valid: {valid}"));
        }
        if let Some(serial) = &cred.cert_serial_number {
            lines.push(format!("    cert_serial_number: {serial}"));
        }
        if !cred.validation_errors.is_empty() {
            lines.push("    warnings:".to_string());
            for error in &cred.validation_errors {
                lines.push(format!("      - {error}"));
            }
        }
        lines.push(String::new());
    }
}

fn push_verdict_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let verdict = &record.ai_verdict;
    if !verdict.is_ai_generated && verdict.signals.is_empty() {
        return;
    }

    lines.push("## AI DETECTION".to_string());
    lines.push(format!("  is_ai_generated: {}", verdict.is_ai_generated));
    if let Some(generator) = &verdict.generator {
        lines.push(format!("  generator: {generator}"));
    }
    if let Some(raw) = &verdict.generator_raw {
        lines.push(format!("  generator_raw: {raw}"));
    }
    match (&verdict.inferred_model, verdict.model_confidence) {
        (Some(model), confidence) => {
            lines.push(format!("  inferred_model: {model} ({confidence}) [ANALYSIS]"));
        }
        (None, ModelConfidence::Ambiguous) => {
            let resolution = record
                .technical
                .video
                .resolution()
                .unwrap_or_else(|| "unknown".to_string());
            lines.push(format!(
                "  inferred_model: sora-2 or sora-2-pro ({resolution}) [ANALYSIS]"
            ));
        }
        _ => {}
    }
    lines.push(format!("  confidence: {:.2}", verdict.confidence));
    if !verdict.signing_authorities.is_empty() {
        lines.push(format!(
            "  signing_authorities: {}",
            verdict.signing_authorities.join(", ")
        ));
    }

    let facts: Vec<_> = verdict.signals.iter().filter(|(_, s)| s.is_fact).collect();
    let analysis: Vec<_> = verdict.signals.iter().filter(|(_, s)| !s.is_fact).collect();
    if !facts.is_empty() {
        lines.push("  signals [FACT - from metadata]:".to_string());
        for (name, signal) in facts {
            let icon = if signal.detected { "✓" } else { "✗" };
            lines.push(format!("    {icon} {name}: {}", signal.description));
        }
    }
    if !analysis.is_empty() {
        lines.push("  signals [ANALYSIS - inferred]:".to_string());
        for (name, signal) in analysis {
            let icon = if signal.detected { "✓" } else { "✗" };
            lines.push(format!("    {icon} {name}: {}", signal.description));
        }
    }
    lines.push(String::new());
}

fn push_platform_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let platform = &record.provenance.platform;
    let has_api_answer = platform.youtube_contains_synthetic_media.is_some()
        || platform.tiktok_api_video_tag_type.is_some();
    if !has_api_answer {
        return;
    }

    lines.push("## PLATFORM API LABELS".to_string());

    if let Some(synthetic) = platform.youtube_contains_synthetic_media {
        lines.push("  [YOUTUBE DATA API v3]".to_string());
        if let Some(id) = &platform.youtube_video_id {
            lines.push(format!("    video_id: {id}"));
        }
        lines.push(format!("    contains_synthetic_media: {synthetic}"));
        if synthetic {
            lines.push("    interpretation: Video contains AI-generated content".to_string());
        } else {
            lines.push("    interpretation: No AI label from YouTube".to_string());
        }
    }

    if let Some(tag_type) = &platform.tiktok_api_video_tag_type {
        lines.push("  [TIKTOK RESEARCH API]".to_string());
        if let Some(number) = platform.tiktok_api_video_tag_number {
            let meaning = match number {
                1 => "Creator labeled",
                2 => "Auto-detected",
                _ => "Unknown",
            };
            lines.push(format!("    video_tag_number: {number} ({meaning})"));
        }
        lines.push(format!("    video_tag_type: {tag_type}"));
        if matches!(platform.tiktok_api_video_tag_number, Some(1) | Some(2)) {
            lines.push("    interpretation: TikTok flagged as AI-generated".to_string());
        }
    }

    lines.push(String::new());
}

fn push_watermark_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let watermarks = &record.provenance.watermarks;
    if watermarks.detections.is_empty() {
        return;
    }

    lines.push("## WATERMARK DETECTION".to_string());
    lines.push(format!("  has_watermark: {}", watermarks.has_watermark));
    lines.push(format!(
        "  overall_confidence: {:.2}",
        watermarks.overall_confidence
    ));
    lines.push(format!("  detectors_run: {}", watermarks.detections.len()));
    lines.push(String::new());

    for detection in &watermarks.detections {
        lines.push(format!("  [{}]", detection.detector.to_uppercase()));
        lines.push(format!("    detected: {}", detection.detected));
        lines.push(format!("    confidence: {:.4}", detection.confidence));
        if let Some(kind) = detection.watermark_type {
            lines.push(format!("    watermark_type: {kind}"));
        }
        if let Some(bits) = detection.message_bits {
            lines.push(format!("    message_bits: {bits}"));
        }
        if let Some(message) = &detection.message_decoded {
            lines.push(format!("    message_decoded: {message}"));
        }
        if let Some(frames) = detection.frames_analyzed {
            lines.push(format!("    frames_analyzed: {frames}"));
        }
        if let Some(positive) = detection.positive_frames {
            lines.push(format!("    positive_frames: {positive}"));
        }
        if let Some(threshold) = detection.detection_threshold {
            lines.push(format!("    detection_threshold: {threshold}"));
        }
    }
    lines.push(String::new());
}

fn push_descriptive_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let desc = &record.descriptive;
    let has_descriptive = desc.title.is_some()
        || desc.creator.is_some()
        || desc.description.is_some()
        || desc.software.is_some()
        || desc.creation_timestamp.is_set();
    if has_descriptive {
        lines.push("## DESCRIPTIVE METADATA".to_string());
        if let Some(title) = &desc.title {
            lines.push(format!("  title: {title}"));
        }
        if let Some(creator) = &desc.creator {
            lines.push(format!("  creator: {creator}"));
        }
        if let Some(description) = &desc.description {
            lines.push(format!("  description: {description}"));
        }
        if let Some(software) = &desc.software {
            lines.push(format!("  software: {software}"));
        }
        if let Some(copyright) = &desc.copyright {
            lines.push(format!("  copyright: {copyright}"));
        }
        lines.push(String::new());

        lines.push("  [TIMESTAMPS]".to_string());
        if let Some(value) = desc.creation_timestamp.value {
            lines.push(format!("    creation_time: {}", value.to_iso8601()));
            if let Some(source) = desc.creation_timestamp.source {
                lines.push(format!("    creation_source: {source}"));
            }
            if let Some(raw) = &desc.creation_timestamp.raw {
                lines.push(format!("    creation_raw: {raw}"));
            }
        }
        if let Some(value) = desc.modification_timestamp.value {
            lines.push(format!("    modification_time: {}", value.to_iso8601()));
            if let Some(source) = desc.modification_timestamp.source {
                lines.push(format!("    modification_source: {source}"));
            }
        }
        lines.push(String::new());
    }

    let iptc = &desc.iptc_ai;
    if iptc.declares_anything() || iptc.ai_prompt_info.is_some() {
        lines.push("## IPTC AI METADATA (2025.1)".to_string());
        if let Some(generated) = iptc.ai_generated {
            lines.push(format!("  ai_generated: {generated}"));
        }
        if let Some(system) = &iptc.ai_system_used {
            lines.push(format!("  ai_system_used: {system}"));
        }
        if let Some(version) = &iptc.ai_system_version {
            lines.push(format!("  ai_system_version: {version}"));
        }
        if let Some(prompt) = &iptc.ai_prompt_info {
            lines.push(format!("  ai_prompt_info: {prompt}"));
        }
        if let Some(writer) = &iptc.ai_prompt_writer_name {
            lines.push(format!("  ai_prompt_writer_name: {writer}"));
        }
        if let Some(usage) = &iptc.ai_training_mining_usage {
            lines.push(format!("  ai_training_mining_usage: {usage}"));
        }
        lines.push(String::new());
    }
}

fn push_raw_section(record: &MediaRecord, lines: &mut Vec<String>) {
    let raw = &record.raw;

    if !raw.box_structure.is_empty() {
        lines.push("## MP4 BOX STRUCTURE".to_string());
        for line in format_box_tree(&raw.box_structure, 50).lines() {
            lines.push(line.to_string());
        }
        lines.push(String::new());
    }

    if !raw.format_tags.is_empty() {
        lines.push("## FORMAT TAGS".to_string());
        for (key, value) in &raw.format_tags {
            lines.push(format!("  {key}: {value}"));
        }
        lines.push(String::new());
    }

    if !raw.strings.is_empty() {
        lines.push("## INTERESTING STRINGS".to_string());
        for s in raw.strings.iter().take(30) {
            let preview: String = s.chars().take(150).collect();
            lines.push(format!("  {preview}"));
        }
        if raw.strings.len() > 30 {
            lines.push(format!("  ... and {} more", raw.strings.len() - 30));
        }
        lines.push(String::new());
    }
}

/// Render a box list as an indented tree, capped at `limit` rows (0 = all).
pub fn format_box_tree(records: &[BoxRecord], limit: usize) -> String {
    let shown = if limit == 0 {
        records
    } else {
        &records[..records.len().min(limit)]
    };
    let mut lines = Vec::new();
    for record in shown {
        let indent = "  ".repeat(record.depth as usize);
        lines.push(format!(
            "  {indent}{:8} size={:>12}  offset={}",
            record.box_type,
            thousands(record.size),
            record.offset
        ));
    }
    if limit != 0 && records.len() > limit {
        lines.push(format!("  ... and {} more boxes", records.len() - limit));
    }
    lines.join("\n")
}

/// Group digits by thousands: 1234567 -> "1,234,567".
fn thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Extractor availability and trust-order listing for `status`.
pub fn format_status(extractors: &[(String, u32, bool)]) -> String {
    let mut lines = Vec::new();
    lines.push("synthprobe status".to_string());
    lines.push(RULE[..50].to_string());
    lines.push(String::new());
    lines.push("Extractors:".to_string());
    lines.push(SUBRULE.to_string());
    for (name, priority, available) in extractors {
        let icon = if *available { "✓" } else { "✗" };
        lines.push(format!("  {icon} {name} (priority {priority})"));
    }
    lines.push(SUBRULE.to_string());
    lines.push(String::new());
    lines.push("Timestamp sources (priority order):".to_string());
    lines.push("  1. C2PA action when  - cryptographically signed".to_string());
    lines.push("  2. exiftool          - XMP/EXIF embedded metadata".to_string());
    lines.push("  3. ffprobe           - container tags".to_string());
    lines.push("  4. filesystem        - OS timestamps (least reliable)".to_string());
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthprobe_record_schema::{CredentialSource, FileDescriptor, WatermarkDetection};

    fn sample_record() -> MediaRecord {
        let mut record = MediaRecord::new(FileDescriptor {
            path: "/videos/clip.mp4".into(),
            filename: "clip.mp4".into(),
            extension: Some("mp4".into()),
            size_bytes: 2 * 1024 * 1024,
            created: None,
            modified: None,
            accessed: None,
        });
        record.technical.duration_seconds = Some(75.0);
        record.technical.video.width = Some(1280);
        record.technical.video.height = Some(720);
        record.technical.video.fps = Some(30.0);
        record.technical.video.codec = Some("h264".into());
        record
    }

    #[test]
    fn test_quiet_line_for_clean_file() {
        let record = sample_record();
        assert_eq!(
            format_quiet(&record),
            "clip.mp4 | 1:15 | 1280x720 | AI: no | C2PA: no"
        );
    }

    #[test]
    fn test_quiet_line_for_ai_file() {
        let mut record = sample_record();
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.attribute_generator("OpenAI Sora", "Sora");
        record.provenance.credential.has_credential = true;
        assert_eq!(
            format_quiet(&record),
            "clip.mp4 | 1:15 | 1280x720 | AI: yes (OpenAI Sora) | C2PA: yes"
        );
    }

    #[test]
    fn test_default_report_without_credential_has_no_ai_section() {
        let record = sample_record();
        let out = format_default(&record);
        assert!(!out.contains("## AI GENERATION"));
        assert!(out.contains("## VIDEO INFO"));
        assert!(out.contains("Resolution:   1280x720 (16:9)"));
        assert!(out.contains("Frame Rate:   30 fps"));
        assert!(out.contains("Size:         2.00 MB"));
        assert!(!out.contains("## C2PA VALIDATION"));
    }

    #[test]
    fn test_default_report_with_credential() {
        let mut record = sample_record();
        let cred = &mut record.provenance.credential;
        cred.has_credential = true;
        cred.claim_generator = Some("OpenAI-API".into());
        cred.manifest_id = Some("urn:uuid:abc".into());
        cred.validation_state = Some("Valid".into());
        cred.issuer = Some("Truepic".into());
        cred.signer_name = Some("Truepic Lens".into());
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.attribute_generator("OpenAI Sora", "OpenAI-API");

        let out = format_default(&record);
        assert!(out.contains("## AI GENERATION"));
        assert!(out.contains("Generator:    OpenAI Sora"));
        assert!(out.contains("Signed By:    Truepic (Truepic Lens)"));
        assert!(out.contains("## C2PA VALIDATION"));
        assert!(out.contains("Status:       Valid"));
        assert!(out.contains("Manifest ID:  urn:uuid:abc"));
    }

    #[test]
    fn test_full_report_splits_fact_and_analysis_signals() {
        let mut record = sample_record();
        record
            .ai_verdict
            .add_signal("tiktok_aigc", true, 0.95, "embedded label", true);
        record
            .ai_verdict
            .add_signal("audio_96khz", true, 0.9, "96 kHz audio", false);
        record.ai_verdict.mark_ai_generated();

        let out = format_full(&record);
        let fact_at = out.find("signals [FACT - from metadata]:").unwrap();
        let analysis_at = out.find("signals [ANALYSIS - inferred]:").unwrap();
        assert!(fact_at < analysis_at);
        assert!(out.contains("✓ tiktok_aigc: embedded label"));
        assert!(out.contains("✓ audio_96khz: 96 kHz audio"));
    }

    #[test]
    fn test_full_report_flags_96khz_audio() {
        let mut record = sample_record();
        record.technical.audio.codec = Some("aac".into());
        record.technical.audio.sample_rate = Some(96000);
        let out = format_full(&record);
        assert!(out.contains("sample_rate_note: Sora signature (typical: 48000)"));

        record.technical.audio.sample_rate = Some(48000);
        let out = format_full(&record);
        assert!(!out.contains("sample_rate_note"));
    }

    #[test]
    fn test_full_report_ambiguous_model_names_both_candidates() {
        let mut record = sample_record();
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.attribute_generator("OpenAI Sora", "sora");
        record.ai_verdict.model_confidence = ModelConfidence::Ambiguous;
        let out = format_full(&record);
        assert!(out.contains("inferred_model: sora-2 or sora-2-pro (1280x720) [ANALYSIS]"));
    }

    #[test]
    fn test_full_report_credential_source_and_mode() {
        let mut record = sample_record();
        let cred = &mut record.provenance.credential;
        cred.has_credential = true;
        cred.source = Some(CredentialSource::Library);
        cred.generation_mode =
            Some(synthprobe_record_schema::GenerationMode::TextToVideo);
        let out = format_full(&record);
        assert!(out.contains("source: library"));
        assert!(out.contains("generation_mode: text2video [ANALYSIS]"));
        assert!(out.contains("ingredients: None"));
    }

    #[test]
    fn test_full_report_watermark_section() {
        let mut record = sample_record();
        record.attach_watermark(WatermarkDetection {
            detector: "audioseal".into(),
            detected: true,
            confidence: 0.91,
            watermark_type: Some(synthprobe_record_schema::WatermarkKind::Audio),
            message_bits: Some(16),
            message_decoded: None,
            frames_analyzed: Some(480),
            positive_frames: Some(470),
            detection_threshold: Some(0.5),
        });
        let out = format_full(&record);
        assert!(out.contains("## WATERMARK DETECTION"));
        assert!(out.contains("[AUDIOSEAL]"));
        assert!(out.contains("confidence: 0.9100"));
        assert!(out.contains("message_bits: 16"));
    }

    #[test]
    fn test_box_tree_rendering_and_cap() {
        let records: Vec<BoxRecord> = (0..60)
            .map(|i| BoxRecord {
                box_type: "free".into(),
                size: 1234567,
                offset: i * 8,
                depth: 0,
                data_preview: None,
            })
            .collect();
        let out = format_box_tree(&records, 50);
        assert!(out.contains("size=   1,234,567"));
        assert!(out.contains("... and 10 more boxes"));
        let uncapped = format_box_tree(&records, 0);
        assert!(!uncapped.contains("more boxes"));
    }

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1000), "1,000");
        assert_eq!(thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_status_listing() {
        let extractors = vec![
            ("ffprobe".to_string(), 10, true),
            ("youtube-api".to_string(), 5, false),
        ];
        let out = format_status(&extractors);
        assert!(out.contains("✓ ffprobe (priority 10)"));
        assert!(out.contains("✗ youtube-api (priority 5)"));
        assert!(out.contains("Timestamp sources (priority order):"));
    }
}
