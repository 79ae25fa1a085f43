//! Technical prober backed by ffprobe.

use crate::config::AnalysisConfig;
use crate::de;
use crate::pipeline::Extractor;
use crate::tool;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;
use synthprobe_common::{Error, Result, Timestamp};
use synthprobe_record_schema::descriptive::TimestampSource;
use synthprobe_record_schema::MediaRecord;
use tracing::debug;

const FFPROBE_BIN: &str = "ffprobe";

/// Container and stream facts via `ffprobe -print_format json`.
pub struct FfprobeExtractor {
    timeout_seconds: u64,
}

impl FfprobeExtractor {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            timeout_seconds: config.ffprobe_timeout_seconds,
        }
    }
}

#[async_trait]
impl Extractor for FfprobeExtractor {
    fn name(&self) -> &'static str {
        "ffprobe"
    }

    fn priority(&self) -> u32 {
        10
    }

    fn is_available(&self) -> bool {
        tool::binary_available(FFPROBE_BIN)
    }

    async fn extract(&self, path: &Path, record: &mut MediaRecord) -> Result<()> {
        let output = tool::run_tool_on_file(
            FFPROBE_BIN,
            &[
                "-v",
                "quiet",
                "-print_format",
                "json",
                "-show_format",
                "-show_streams",
                "-show_chapters",
                "-show_programs",
            ],
            path,
            self.timeout_seconds,
        )
        .await?;

        if !output.success() && output.stdout.trim().is_empty() {
            return Err(Error::ToolExecution {
                tool: FFPROBE_BIN.to_string(),
                reason: format!(
                    "exit code {:?}: {}",
                    output.exit_code,
                    output.stderr.trim()
                ),
            });
        }

        let document: Value =
            serde_json::from_str(&output.stdout).map_err(|e| Error::ToolOutput {
                tool: FFPROBE_BIN.to_string(),
                reason: e.to_string(),
            })?;
        apply_document(&document, record).map_err(|e| Error::ToolOutput {
            tool: FFPROBE_BIN.to_string(),
            reason: e.to_string(),
        })
    }
}

/// The slice of ffprobe's document we interpret. Everything else rides
/// along untouched in the raw artifact.
#[derive(Debug, Deserialize, Default)]
struct FfprobeDocument {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Deserialize, Default)]
struct FfprobeFormat {
    #[serde(default, deserialize_with = "de::lenient")]
    format_name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    format_long_name: Option<String>,
    #[serde(default, deserialize_with = "de::float_lenient")]
    duration: Option<f64>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    bit_rate: Option<i64>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    nb_streams: Option<i64>,
    #[serde(default)]
    tags: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize, Default)]
struct FfprobeStream {
    #[serde(default, deserialize_with = "de::lenient")]
    codec_type: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    codec_name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    codec_long_name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    profile: Option<String>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    level: Option<i64>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    width: Option<i64>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    height: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient")]
    r_frame_rate: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    avg_frame_rate: Option<String>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    bit_rate: Option<i64>,
    #[serde(default, deserialize_with = "de::float_lenient")]
    duration: Option<f64>,
    #[serde(default, deserialize_with = "de::lenient")]
    pix_fmt: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    field_order: Option<String>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    sample_rate: Option<i64>,
    #[serde(default, deserialize_with = "de::int_lenient")]
    channels: Option<i64>,
    #[serde(default, deserialize_with = "de::lenient")]
    channel_layout: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    sample_fmt: Option<String>,
    #[serde(default)]
    tags: BTreeMap<String, Value>,
}

/// Map one ffprobe JSON document into the record.
pub fn apply_document(document: &Value, record: &mut MediaRecord) -> serde_json::Result<()> {
    let parsed: FfprobeDocument = serde_json::from_value(document.clone())?;

    apply_format(&parsed.format, record);
    apply_streams(&parsed.streams, record);
    record.raw.ffprobe = Some(document.clone());
    Ok(())
}

fn apply_format(format: &FfprobeFormat, record: &mut MediaRecord) {
    let tech = &mut record.technical;
    set_if_empty(&mut tech.container, format.format_name.clone());
    set_if_empty(&mut tech.container_long, format.format_long_name.clone());
    set_if_empty(&mut tech.duration_seconds, format.duration);
    set_if_empty(&mut tech.bitrate, format.bit_rate);
    set_if_empty(&mut tech.stream_count, format.nb_streams);

    // Tags arrive with whatever casing the muxer chose.
    let mut tags: BTreeMap<String, String> = BTreeMap::new();
    for (key, value) in &format.tags {
        if let Some(text) = de::string_from_value(value) {
            record.raw.format_tags.insert(key.clone(), text.clone());
            tags.insert(key.to_lowercase(), text);
        }
    }

    let desc = &mut record.descriptive;
    set_if_empty(&mut desc.title, tags.get("title").cloned());
    set_if_empty(
        &mut desc.creator,
        tags.get("artist").or_else(|| tags.get("author")).cloned(),
    );
    set_if_empty(
        &mut desc.description,
        tags.get("description")
            .or_else(|| tags.get("comment"))
            .cloned(),
    );
    set_if_empty(&mut desc.copyright, tags.get("copyright").cloned());
    set_if_empty(
        &mut desc.software,
        tags.get("encoder")
            .or_else(|| tags.get("encoding_tool"))
            .cloned(),
    );
    set_if_empty(&mut desc.genre, tags.get("genre").cloned());

    if let Some(raw) = tags.get("creation_time") {
        if let Some(ts) = Timestamp::parse_iso8601(raw) {
            desc.creation_timestamp
                .assign(ts, TimestampSource::Ffprobe, Some(raw.clone()));
        } else {
            debug!("Unparseable creation_time tag: {raw}");
        }
    }
}

fn apply_streams(streams: &[FfprobeStream], record: &mut MediaRecord) {
    let mut video_done = false;
    let mut audio_done = false;

    for stream in streams {
        match stream.codec_type.as_deref() {
            Some("video") if !video_done => {
                video_done = true;
                apply_video_stream(stream, record);
            }
            Some("audio") if !audio_done => {
                audio_done = true;
                apply_audio_stream(stream, record);
            }
            _ => {}
        }
    }
}

fn apply_video_stream(stream: &FfprobeStream, record: &mut MediaRecord) {
    let video = &mut record.technical.video;
    video.codec = stream.codec_name.clone();
    video.codec_long = stream.codec_long_name.clone();
    video.profile = stream.profile.clone();
    video.level = stream.level;
    video.width = stream.width;
    video.height = stream.height;
    video.fps = stream.r_frame_rate.as_deref().and_then(parse_fraction);
    video.avg_fps = stream.avg_frame_rate.as_deref().and_then(parse_fraction);
    video.bitrate = stream.bit_rate;
    video.duration = stream.duration;
    video.pixel_format = stream.pix_fmt.clone();
    video.field_order = stream.field_order.clone();
    video.encoder = stream_tag(stream, "encoder");
    video.handler = stream_tag(stream, "handler_name");
}

fn apply_audio_stream(stream: &FfprobeStream, record: &mut MediaRecord) {
    let audio = &mut record.technical.audio;
    audio.codec = stream.codec_name.clone();
    audio.codec_long = stream.codec_long_name.clone();
    audio.profile = stream.profile.clone();
    audio.sample_rate = stream.sample_rate;
    audio.channels = stream.channels;
    audio.channel_layout = stream.channel_layout.clone();
    audio.bitrate = stream.bit_rate;
    audio.duration = stream.duration;
    audio.sample_format = stream.sample_fmt.clone();
    audio.handler = stream_tag(stream, "handler_name");
}

fn stream_tag(stream: &FfprobeStream, name: &str) -> Option<String> {
    stream
        .tags
        .iter()
        .find(|(key, _)| key.to_lowercase() == name)
        .and_then(|(_, value)| de::string_from_value(value))
}

/// ffprobe frame rates are rationals like `30000/1001`; `0/0` means unknown.
fn parse_fraction(s: &str) -> Option<f64> {
    match s.split_once('/') {
        Some((num, den)) => {
            let num: f64 = num.trim().parse().ok()?;
            let den: f64 = den.trim().parse().ok()?;
            (den != 0.0).then(|| num / den)
        }
        None => s.trim().parse().ok(),
    }
}

fn set_if_empty<T>(slot: &mut Option<T>, value: Option<T>) {
    if slot.is_none() {
        *slot = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use synthprobe_record_schema::FileDescriptor;

    fn record() -> MediaRecord {
        MediaRecord::new(FileDescriptor::default())
    }

    fn sora_like_document() -> Value {
        serde_json::json!({
            "streams": [
                {
                    "index": 0,
                    "codec_name": "h264",
                    "codec_long_name": "H.264 / AVC / MPEG-4 AVC / MPEG-4 part 10",
                    "profile": "High",
                    "codec_type": "video",
                    "level": 40,
                    "width": 1280,
                    "height": 720,
                    "pix_fmt": "yuv420p",
                    "field_order": "progressive",
                    "r_frame_rate": "30000/1001",
                    "avg_frame_rate": "30000/1001",
                    "duration": "10.010000",
                    "bit_rate": "2500000",
                    "tags": {
                        "handler_name": "VideoHandler",
                        "encoder": "Lavc60.31.102 libx264"
                    }
                },
                {
                    "index": 1,
                    "codec_name": "aac",
                    "codec_long_name": "AAC (Advanced Audio Coding)",
                    "profile": "LC",
                    "codec_type": "audio",
                    "sample_fmt": "fltp",
                    "sample_rate": "96000",
                    "channels": 2,
                    "channel_layout": "stereo",
                    "duration": "10.005333",
                    "bit_rate": "192000",
                    "tags": { "handler_name": "SoundHandler" }
                }
            ],
            "format": {
                "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
                "format_long_name": "QuickTime / MOV",
                "nb_streams": 2,
                "duration": "10.010000",
                "bit_rate": "2700000",
                "tags": {
                    "major_brand": "isom",
                    "encoder": "Lavf60.16.100",
                    "creation_time": "2025-02-11T18:02:33.000000Z"
                }
            }
        })
    }

    #[test]
    fn test_format_section_maps_to_technical() {
        let mut rec = record();
        apply_document(&sora_like_document(), &mut rec).unwrap();
        let tech = &rec.technical;
        assert_eq!(tech.container.as_deref(), Some("mov,mp4,m4a,3gp,3g2,mj2"));
        assert_eq!(tech.duration_seconds, Some(10.01));
        assert_eq!(tech.bitrate, Some(2_700_000));
        assert_eq!(tech.stream_count, Some(2));
    }

    #[test]
    fn test_stringly_numerics_parse() {
        let mut rec = record();
        apply_document(&sora_like_document(), &mut rec).unwrap();
        assert_eq!(rec.technical.video.bitrate, Some(2_500_000));
        assert_eq!(rec.technical.audio.sample_rate, Some(96_000));
        assert!((rec.technical.video.fps.unwrap() - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_stream_fields_map() {
        let mut rec = record();
        apply_document(&sora_like_document(), &mut rec).unwrap();
        let video = &rec.technical.video;
        assert_eq!(video.codec.as_deref(), Some("h264"));
        assert_eq!(video.profile.as_deref(), Some("High"));
        assert_eq!(video.width, Some(1280));
        assert_eq!(video.height, Some(720));
        assert_eq!(video.encoder.as_deref(), Some("Lavc60.31.102 libx264"));
        assert_eq!(video.handler.as_deref(), Some("VideoHandler"));
        let audio = &rec.technical.audio;
        assert_eq!(audio.codec.as_deref(), Some("aac"));
        assert_eq!(audio.channels, Some(2));
        assert_eq!(audio.handler.as_deref(), Some("SoundHandler"));
    }

    #[test]
    fn test_first_stream_of_each_type_wins() {
        let document = serde_json::json!({
            "streams": [
                { "codec_type": "video", "codec_name": "h264", "width": 1920 },
                { "codec_type": "video", "codec_name": "mjpeg", "width": 320 },
                { "codec_type": "audio", "codec_name": "aac", "sample_rate": "48000" },
                { "codec_type": "audio", "codec_name": "mp3", "sample_rate": "44100" }
            ],
            "format": {}
        });
        let mut rec = record();
        apply_document(&document, &mut rec).unwrap();
        assert_eq!(rec.technical.video.codec.as_deref(), Some("h264"));
        assert_eq!(rec.technical.video.width, Some(1920));
        assert_eq!(rec.technical.audio.codec.as_deref(), Some("aac"));
        assert_eq!(rec.technical.audio.sample_rate, Some(48_000));
    }

    #[test]
    fn test_format_tags_map_to_descriptive_and_raw() {
        let document = serde_json::json!({
            "streams": [],
            "format": {
                "tags": {
                    "title": "Beach Sunset",
                    "artist": "Jordan",
                    "comment": "test clip",
                    "copyright": "(c) 2025",
                    "encoder": "Lavf60.16.100",
                    "genre": "Travel"
                }
            }
        });
        let mut rec = record();
        apply_document(&document, &mut rec).unwrap();
        let desc = &rec.descriptive;
        assert_eq!(desc.title.as_deref(), Some("Beach Sunset"));
        assert_eq!(desc.creator.as_deref(), Some("Jordan"));
        assert_eq!(desc.description.as_deref(), Some("test clip"));
        assert_eq!(desc.copyright.as_deref(), Some("(c) 2025"));
        assert_eq!(desc.software.as_deref(), Some("Lavf60.16.100"));
        assert_eq!(desc.genre.as_deref(), Some("Travel"));
        assert_eq!(
            rec.raw.format_tags.get("title").map(String::as_str),
            Some("Beach Sunset")
        );
    }

    #[test]
    fn test_creation_time_assigned_with_ffprobe_source() {
        let mut rec = record();
        apply_document(&sora_like_document(), &mut rec).unwrap();
        let fact = &rec.descriptive.creation_timestamp;
        assert!(fact.is_set());
        assert_eq!(fact.source, Some(TimestampSource::Ffprobe));
        assert_eq!(fact.raw.as_deref(), Some("2025-02-11T18:02:33.000000Z"));
    }

    #[test]
    fn test_existing_descriptive_values_not_overwritten() {
        let mut rec = record();
        rec.descriptive.title = Some("already here".to_string());
        apply_document(&sora_like_document(), &mut rec).unwrap();
        assert_eq!(rec.descriptive.title.as_deref(), Some("already here"));
    }

    #[test]
    fn test_malformed_fields_do_not_sink_the_document() {
        let document = serde_json::json!({
            "streams": [
                { "codec_type": "video", "codec_name": "h264", "width": "wide", "level": [4] }
            ],
            "format": { "duration": {"seconds": 3}, "nb_streams": "2" }
        });
        let mut rec = record();
        apply_document(&document, &mut rec).unwrap();
        assert_eq!(rec.technical.video.codec.as_deref(), Some("h264"));
        assert_eq!(rec.technical.video.width, None);
        assert_eq!(rec.technical.video.level, None);
        assert_eq!(rec.technical.duration_seconds, None);
        assert_eq!(rec.technical.stream_count, Some(2));
    }

    #[test]
    fn test_parse_fraction() {
        assert_eq!(parse_fraction("30/1"), Some(30.0));
        assert_eq!(parse_fraction("24"), Some(24.0));
        assert_eq!(parse_fraction("0/0"), None);
        assert_eq!(parse_fraction("nan/"), None);
        assert!((parse_fraction("30000/1001").unwrap() - 29.97).abs() < 0.01);
    }

    #[test]
    fn test_raw_document_preserved_verbatim() {
        let document = sora_like_document();
        let mut rec = record();
        apply_document(&document, &mut rec).unwrap();
        assert_eq!(rec.raw.ffprobe.as_ref(), Some(&document));
    }
}
