//! Lenient deserialization helpers for collaborator JSON.
//!
//! ffprobe, exiftool and credential tools all ship JSON whose shapes drift
//! between versions: numbers arrive as strings, single values as arrays,
//! fields appear and vanish. Evidence parsing must degrade field by field,
//! so these helpers turn anything unexpected into `None` instead of failing
//! the whole document.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Deserialize a field as `Option<T>`, mapping a wrong-typed value to
/// `None`. Use with `#[serde(default, deserialize_with = "de::lenient")]`.
pub fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

/// Integer that may be serialized as a JSON number or a numeric string.
pub fn int_lenient<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(int_from_value))
}

/// Float that may be serialized as a JSON number or a numeric string.
pub fn float_lenient<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(float_from_value))
}

/// Field that may be one string or an array of strings.
pub fn string_or_seq<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(vec![s]),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect(),
        ),
        Value::Number(n) => Some(vec![n.to_string()]),
        _ => None,
    }))
}

/// Best-effort integer from a JSON value.
pub fn int_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Best-effort float from a JSON value.
pub fn float_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Best-effort string from a JSON value.
pub fn string_from_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, Default)]
    struct Sample {
        #[serde(default, deserialize_with = "lenient")]
        name: Option<String>,
        #[serde(default, deserialize_with = "int_lenient")]
        rate: Option<i64>,
        #[serde(default, deserialize_with = "float_lenient")]
        duration: Option<f64>,
        #[serde(default, deserialize_with = "string_or_seq")]
        creator: Option<Vec<String>>,
    }

    #[test]
    fn test_stringly_numbers_parse() {
        let s: Sample =
            serde_json::from_str(r#"{"rate": "48000", "duration": "12.345"}"#).unwrap();
        assert_eq!(s.rate, Some(48000));
        assert_eq!(s.duration, Some(12.345));
    }

    #[test]
    fn test_native_numbers_parse() {
        let s: Sample = serde_json::from_str(r#"{"rate": 96000, "duration": 9.5}"#).unwrap();
        assert_eq!(s.rate, Some(96000));
        assert_eq!(s.duration, Some(9.5));
    }

    #[test]
    fn test_wrong_types_become_none() {
        let s: Sample = serde_json::from_str(
            r#"{"name": {"unexpected": true}, "rate": [1, 2], "duration": null}"#,
        )
        .unwrap();
        assert_eq!(s.name, None);
        assert_eq!(s.rate, None);
        assert_eq!(s.duration, None);
    }

    #[test]
    fn test_absent_fields_become_none() {
        let s: Sample = serde_json::from_str("{}").unwrap();
        assert!(s.name.is_none() && s.rate.is_none() && s.creator.is_none());
    }

    #[test]
    fn test_string_or_seq_both_shapes() {
        let s: Sample = serde_json::from_str(r#"{"creator": "Alice"}"#).unwrap();
        assert_eq!(s.creator, Some(vec!["Alice".to_string()]));
        let s: Sample = serde_json::from_str(r#"{"creator": ["Alice", "Bob"]}"#).unwrap();
        assert_eq!(
            s.creator,
            Some(vec!["Alice".to_string(), "Bob".to_string()])
        );
    }

    #[test]
    fn test_unparseable_string_number_is_none() {
        let s: Sample = serde_json::from_str(r#"{"rate": "N/A"}"#).unwrap();
        assert_eq!(s.rate, None);
    }
}
