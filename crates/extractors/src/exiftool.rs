//! Tag prober backed by exiftool (XMP, EXIF, IPTC, QuickTime keys).

use crate::config::AnalysisConfig;
use crate::de;
use crate::pipeline::Extractor;
use crate::tool;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use synthprobe_common::{Error, Result, Timestamp};
use synthprobe_record_schema::descriptive::TimestampSource;
use synthprobe_record_schema::MediaRecord;
use synthprobe_signals::normalize_generator;

const EXIFTOOL_BIN: &str = "exiftool";

/// Creation-date keys in descending trust order; first parseable wins.
const CREATE_DATE_KEYS: &[&str] = &[
    "XMP:CreateDate",
    "XMP:DateCreated",
    "EXIF:DateTimeOriginal",
    "EXIF:CreateDate",
    "QuickTime:CreateDate",
    "QuickTime:CreationDate",
];

const MODIFY_DATE_KEYS: &[&str] = &["XMP:ModifyDate", "EXIF:ModifyDate", "QuickTime:ModifyDate"];

/// Embedded tags via `exiftool -json -n -G1 -s`.
pub struct ExiftoolExtractor {
    timeout_seconds: u64,
}

impl ExiftoolExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            timeout_seconds: config.exiftool_timeout_seconds,
        }
    }
}

#[async_trait]
impl Extractor for ExiftoolExtractor {
    fn name(&self) -> &'static str {
        "exiftool"
    }

    fn priority(&self) -> u32 {
        15
    }

    fn is_available(&self) -> bool {
        tool::binary_available(EXIFTOOL_BIN)
    }

    async fn extract(&self, path: &Path, record: &mut MediaRecord) -> Result<()> {
        let output = tool::run_tool_on_file(
            EXIFTOOL_BIN,
            &["-json", "-n", "-G1", "-s"],
            path,
            self.timeout_seconds,
        )
        .await?;

        if !output.success() && output.stdout.trim().is_empty() {
            return Err(Error::ToolExecution {
                tool: EXIFTOOL_BIN.to_string(),
                reason: format!(
                    "exit code {:?}: {}",
                    output.exit_code,
                    output.stderr.trim()
                ),
            });
        }

        let parsed: Value = serde_json::from_str(&output.stdout).map_err(|e| Error::ToolOutput {
            tool: EXIFTOOL_BIN.to_string(),
            reason: e.to_string(),
        })?;
        // exiftool emits an array with one entry per input file.
        let entry = parsed
            .as_array()
            .and_then(|a| a.first())
            .ok_or_else(|| Error::ToolOutput {
                tool: EXIFTOOL_BIN.to_string(),
                reason: "expected a one-element array".to_string(),
            })?;

        apply_document(entry, record);
        Ok(())
    }
}

/// Tag document with group-normalized key lookup.
///
/// `-G1` spells family-1 groups (`XMP-dc`, `ExifIFD`, `Track1`); lookups use
/// the family-0 names, so family-1 keys are folded onto them at load. `Keys`
/// stays distinct because the TikTok AIGC fields live there.
struct TagDocument(BTreeMap<String, Value>);

impl TagDocument {
    fn from_value(entry: &Value) -> Self {
        let mut map = BTreeMap::new();
        if let Some(object) = entry.as_object() {
            for (key, value) in object {
                map.entry(key.clone()).or_insert_with(|| value.clone());
                if let Some(folded) = fold_group(key) {
                    map.entry(folded).or_insert_with(|| value.clone());
                }
            }
        }
        Self(map)
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    fn string(&self, key: &str) -> Option<String> {
        self.get(key).and_then(de::string_from_value)
    }

    fn float(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(de::float_from_value)
    }

    fn first_string(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| self.string(key))
    }

    /// String-or-array field joined with `, `.
    fn joined(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.get(key)? {
            Value::Array(items) => {
                let parts: Vec<String> =
                    items.iter().filter_map(de::string_from_value).collect();
                (!parts.is_empty()).then(|| parts.join(", "))
            }
            other => de::string_from_value(other),
        })
    }
}

fn fold_group(key: &str) -> Option<String> {
    let (group, tag) = key.split_once(':')?;
    let family0 = if group.starts_with("XMP-") {
        "XMP"
    } else if matches!(group, "ExifIFD" | "IFD0" | "IFD1" | "GPS") {
        "EXIF"
    } else if matches!(group, "ItemList" | "UserData") || group.starts_with("Track") {
        "QuickTime"
    } else {
        return None;
    };
    Some(format!("{family0}:{tag}"))
}

/// Map one exiftool entry into the record.
pub fn apply_document(entry: &Value, record: &mut MediaRecord) {
    let doc = TagDocument::from_value(entry);
    apply_descriptive(&doc, record);
    apply_iptc_ai(&doc, record);
    apply_timestamps(&doc, record);
    apply_platform_labels(&doc, record);
    record.raw.exiftool = Some(entry.clone());
}

fn apply_descriptive(doc: &TagDocument, record: &mut MediaRecord) {
    let desc = &mut record.descriptive;

    set_if_empty(
        &mut desc.title,
        doc.first_string(&["XMP:Title", "QuickTime:Title", "IPTC:ObjectName"]),
    );
    set_if_empty(
        &mut desc.description,
        doc.first_string(&[
            "XMP:Description",
            "EXIF:ImageDescription",
            "IPTC:Caption-Abstract",
        ]),
    );
    set_if_empty(
        &mut desc.creator,
        doc.joined(&["XMP:Creator", "EXIF:Artist", "IPTC:By-line"]),
    );
    set_if_empty(
        &mut desc.copyright,
        doc.first_string(&["XMP:Rights", "EXIF:Copyright", "IPTC:CopyrightNotice"]),
    );
    set_if_empty(
        &mut desc.software,
        doc.first_string(&["XMP:CreatorTool", "EXIF:Software"]),
    );

    for key in ["XMP:Subject", "IPTC:Keywords"] {
        if let Some(value) = doc.get(key) {
            for keyword in keyword_list(value) {
                if !desc.keywords.contains(&keyword) {
                    desc.keywords.push(keyword);
                }
            }
        }
    }

    if !desc.has_gps() {
        desc.gps_latitude = doc.float("EXIF:GPSLatitude");
        desc.gps_longitude = doc.float("EXIF:GPSLongitude");
        desc.gps_altitude = doc.float("EXIF:GPSAltitude");
    }

    set_if_empty(&mut desc.camera_make, doc.string("EXIF:Make"));
    set_if_empty(&mut desc.camera_model, doc.string("EXIF:Model"));
}

/// IPTC 2025.1 AI content declaration fields.
fn apply_iptc_ai(doc: &TagDocument, record: &mut MediaRecord) {
    let ai = &mut record.descriptive.iptc_ai;

    ai.ai_system_used = doc.first_string(&["XMP:AISystemUsed", "IPTC:AISystemUsed"]);
    ai.ai_system_version = doc.string("XMP:AISystemVersion");
    ai.ai_prompt_info = doc.string("XMP:AIPromptInfo");
    ai.ai_prompt_writer_name = doc.string("XMP:AIPromptWriterName");
    ai.ai_training_mining_usage = doc.string("XMP:AITrainingMiningUsage");

    if let Some(flag) = doc.get("XMP:AIGenerated") {
        ai.ai_generated = parse_flexible_bool(flag);
    }

    let generated = record.descriptive.iptc_ai.ai_generated == Some(true);
    let system_used = record.descriptive.iptc_ai.ai_system_used.clone();

    if generated {
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.add_signal(
            "iptc_ai_generated",
            true,
            0.95,
            "IPTC AIGenerated flag is true",
            true,
        );
    }
    if let Some(system) = system_used {
        record.ai_verdict.add_signal(
            "iptc_ai_system",
            true,
            0.9,
            format!("IPTC AISystemUsed: {system}"),
            true,
        );
        if let Some((_, display)) = normalize_generator(&system) {
            record.ai_verdict.attribute_generator(display, system);
        } else if record.ai_verdict.generator_raw.is_none() {
            record.ai_verdict.generator_raw = Some(system);
        }
    }
}

fn apply_timestamps(doc: &TagDocument, record: &mut MediaRecord) {
    let desc = &mut record.descriptive;

    for key in CREATE_DATE_KEYS {
        if let Some(raw) = doc.string(key) {
            if let Some(ts) = Timestamp::parse_exif(&raw) {
                desc.creation_timestamp
                    .assign(ts, TimestampSource::Exiftool, Some(raw));
                break;
            }
        }
    }

    for key in MODIFY_DATE_KEYS {
        if let Some(raw) = doc.string(key) {
            if let Some(ts) = Timestamp::parse_exif(&raw) {
                desc.modification_timestamp
                    .assign(ts, TimestampSource::Exiftool, Some(raw));
                break;
            }
        }
    }
}

/// TikTok embeds its AIGC label and video identity in QuickTime `Keys`.
fn apply_platform_labels(doc: &TagDocument, record: &mut MediaRecord) {
    let platform = &mut record.provenance.platform;

    if let Some(info) = doc.get("Keys:AigcInfo") {
        // Either a JSON string `{"aigc_label_type":2}` or already an object.
        let label = match info {
            Value::String(s) => serde_json::from_str::<Value>(s)
                .ok()
                .as_ref()
                .and_then(|v| v.get("aigc_label_type"))
                .and_then(de::int_from_value),
            Value::Object(_) => info.get("aigc_label_type").and_then(de::int_from_value),
            _ => None,
        };
        if label.is_some() {
            platform.tiktok_aigc_label_type = label;
        }
    }

    if let Some(comment) = doc.string("Keys:Comment") {
        if let Some(id) = comment.strip_prefix("vid:") {
            platform.tiktok_video_id = Some(id.to_string());
        }
    }
    if let Some(md5) = doc.string("Keys:VidMd5") {
        platform.tiktok_video_md5 = Some(md5);
    }

    if record.provenance.platform.tiktok_labeled_ai() {
        let label = record.provenance.platform.tiktok_aigc_label_type;
        record.ai_verdict.mark_ai_generated();
        record.ai_verdict.add_signal(
            "tiktok_aigc",
            true,
            0.95,
            format!(
                "TikTok AIGC label: aigc_label_type={}",
                label.unwrap_or_default()
            ),
            true,
        );
    }
}

fn parse_flexible_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::Number(n) => n.as_i64().map(|i| i != 0),
        Value::String(s) => Some(s.eq_ignore_ascii_case("true")),
        _ => None,
    }
}

fn keyword_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(de::string_from_value).collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}

fn set_if_empty(slot: &mut Option<String>, value: Option<String>) {
    if slot.is_none() {
        *slot = value;
    }
}
