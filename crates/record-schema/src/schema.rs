//! JSON schema definition for record validation.

/// JSON Schema for a serialized evidence record.
pub const RECORD_SCHEMA: &str = r##"{
  "$schema": "https://json-schema.org/draft/2020-12/schema",
  "$id": "https://synthprobe.dev/schemas/record.json",
  "title": "Synthprobe Evidence Record",
  "type": "object",
  "required": ["schema_version", "file_info", "technical", "descriptive", "provenance", "ai_verdict", "raw"],
  "properties": {
    "schema_version": {
      "type": "string",
      "pattern": "^\\d+\\.\\d+\\.\\d+$"
    },
    "file_info": {
      "type": "object",
      "required": ["path", "filename", "size_bytes"],
      "properties": {
        "path": { "type": "string" },
        "filename": { "type": "string" },
        "extension": { "type": ["string", "null"] },
        "size_bytes": { "type": "integer", "minimum": 0 },
        "created": { "type": ["string", "null"], "format": "date-time" },
        "modified": { "type": ["string", "null"], "format": "date-time" },
        "accessed": { "type": ["string", "null"], "format": "date-time" }
      }
    },
    "technical": {
      "type": "object",
      "required": ["video", "audio"],
      "properties": {
        "container": { "type": ["string", "null"] },
        "container_long": { "type": ["string", "null"] },
        "duration_seconds": { "type": ["number", "null"] },
        "bitrate": { "type": ["integer", "null"] },
        "stream_count": { "type": ["integer", "null"] },
        "video": {
          "type": "object",
          "properties": {
            "codec": { "type": ["string", "null"] },
            "width": { "type": ["integer", "null"] },
            "height": { "type": ["integer", "null"] },
            "fps": { "type": ["number", "null"] },
            "encoder": { "type": ["string", "null"] },
            "handler": { "type": ["string", "null"] }
          }
        },
        "audio": {
          "type": "object",
          "properties": {
            "codec": { "type": ["string", "null"] },
            "sample_rate": { "type": ["integer", "null"] },
            "channels": { "type": ["integer", "null"] }
          }
        }
      }
    },
    "descriptive": {
      "type": "object",
      "required": ["creation_timestamp", "modification_timestamp"],
      "properties": {
        "title": { "type": ["string", "null"] },
        "creator": { "type": ["string", "null"] },
        "keywords": { "type": "array", "items": { "type": "string" } },
        "iptc_ai": {
          "type": "object",
          "properties": {
            "ai_generated": { "type": ["boolean", "null"] },
            "ai_system_used": { "type": ["string", "null"] },
            "ai_system_version": { "type": ["string", "null"] },
            "ai_prompt_info": { "type": ["string", "null"] },
            "ai_prompt_writer_name": { "type": ["string", "null"] },
            "ai_training_mining_usage": { "type": ["string", "null"] }
          }
        },
        "creation_timestamp": { "$ref": "#/$defs/timestamp_fact" },
        "modification_timestamp": { "$ref": "#/$defs/timestamp_fact" }
      }
    },
    "provenance": {
      "type": "object",
      "required": ["credential", "platform", "watermarks"],
      "properties": {
        "credential": {
          "type": "object",
          "required": ["has_credential"],
          "properties": {
            "has_credential": { "type": "boolean" },
            "source": { "type": ["string", "null"], "enum": ["library", "cli", null] },
            "manifest_id": { "type": ["string", "null"] },
            "cert_trusted": { "type": ["boolean", "null"] },
            "generation_mode": {
              "type": ["string", "null"],
              "enum": ["text2video", "image2video", "video2video", null]
            },
            "actions": {
              "type": "array",
              "items": {
                "type": "object",
                "required": ["action"],
                "properties": {
                  "action": { "type": "string" },
                  "software_agent": { "type": ["string", "null"] },
                  "digital_source_type": { "type": ["string", "null"] },
                  "when": { "type": ["string", "null"] }
                }
              }
            },
            "ingredient_count": { "type": "integer", "minimum": 0 },
            "validation_errors": { "type": "array", "items": { "type": "string" } }
          }
        },
        "platform": {
          "type": "object",
          "properties": {
            "youtube_video_id": { "type": ["string", "null"] },
            "youtube_contains_synthetic_media": { "type": ["boolean", "null"] },
            "tiktok_video_id": { "type": ["string", "null"] },
            "tiktok_aigc_label_type": { "type": ["integer", "null"] }
          }
        },
        "watermarks": {
          "type": "object",
          "required": ["has_watermark", "overall_confidence", "detections"],
          "properties": {
            "has_watermark": { "type": "boolean" },
            "overall_confidence": { "type": "number", "minimum": 0, "maximum": 1 },
            "detections": {
              "type": "array",
              "items": {
                "type": "object",
                "required": ["detector", "detected", "confidence"],
                "properties": {
                  "detector": { "type": "string" },
                  "detected": { "type": "boolean" },
                  "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
                  "watermark_type": {
                    "type": ["string", "null"],
                    "enum": ["audio", "video", "image", null]
                  }
                }
              }
            }
          }
        }
      }
    },
    "ai_verdict": {
      "type": "object",
      "required": ["is_ai_generated", "confidence", "signals"],
      "properties": {
        "is_ai_generated": { "type": "boolean" },
        "generator": { "type": ["string", "null"] },
        "generator_raw": { "type": ["string", "null"] },
        "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
        "inferred_model": { "type": ["string", "null"] },
        "model_confidence": { "type": "string", "enum": ["confirmed", "ambiguous", "unknown"] },
        "signing_authorities": { "type": "array", "items": { "type": "string" } },
        "signals": {
          "type": "object",
          "additionalProperties": {
            "type": "object",
            "required": ["detected", "confidence", "description", "is_fact"],
            "properties": {
              "detected": { "type": "boolean" },
              "confidence": { "type": "number", "minimum": 0, "maximum": 1 },
              "description": { "type": "string" },
              "is_fact": { "type": "boolean" }
            }
          }
        }
      }
    },
    "raw": {
      "type": "object",
      "required": ["format_tags", "box_structure", "strings"],
      "properties": {
        "format_tags": { "type": "object" },
        "box_structure": {
          "type": "array",
          "items": {
            "type": "object",
            "required": ["type", "size", "offset", "depth"],
            "properties": {
              "type": { "type": "string" },
              "size": { "type": "integer", "minimum": 0 },
              "offset": { "type": "integer", "minimum": 0 },
              "depth": { "type": "integer", "minimum": 0 },
              "data_preview": { "type": ["string", "null"] }
            }
          }
        },
        "strings": { "type": "array", "items": { "type": "string" } }
      }
    }
  },
  "$defs": {
    "timestamp_fact": {
      "type": "object",
      "required": ["value", "source", "raw"],
      "properties": {
        "value": { "type": ["string", "null"], "format": "date-time" },
        "source": {
          "type": ["string", "null"],
          "enum": ["c2pa", "exiftool", "ffprobe", "filesystem", null]
        },
        "raw": { "type": ["string", "null"] }
      }
    }
  }
}"##;

/// Get the record schema as a parsed JSON value.
pub fn record_schema() -> serde_json::Value {
    serde_json::from_str(RECORD_SCHEMA).expect("Invalid record schema")
}
