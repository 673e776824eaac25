//! Field deserializers that never fail.
//!
//! Report data is hand-edited JSON, and a field of the wrong type should
//! show up as `N/A` in the report instead of rejecting the whole document.
//! Each helper deserializes into a [`Value`] first and then keeps whatever
//! it can use. Use them with `#[serde(default, deserialize_with = "...")]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Keys tried, in order, when an object stands in for a list entry.
const ENTRY_KEYS: &[&str] = &["region", "name", "text", "event", "title"];

/// Displayable text for a scalar value.
pub fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Text for one list entry: scalars as-is, objects through [`ENTRY_KEYS`].
fn entry_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => ENTRY_KEYS
            .iter()
            .find_map(|key| map.get(*key).and_then(scalar_text)),
        other => scalar_text(other),
    }
}

/// A string, number or boolean as text; anything else is absent.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(scalar_text(&value))
}

/// A 0-100 score given as a number or a string holding one. Anything
/// outside that range, NaN included, is absent.
pub fn score<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches("/100").trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|s| (0.0..=100.0).contains(s)))
}

/// A list of displayable entries. A lone string becomes a one-item list;
/// entries that cannot be shown are skipped.
pub fn text_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match &value {
        Value::Array(items) => items.iter().filter_map(entry_text).collect(),
        other => scalar_text(other).into_iter().collect(),
    })
}

/// An object's entries in authored order, values rendered as text. Array
/// values are joined with `"; "`.
pub fn text_entries<'de, D>(deserializer: D) -> Result<Vec<(String, String)>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Object(map) = value else {
        return Ok(Vec::new());
    };
    Ok(map
        .into_iter()
        .filter_map(|(key, value)| {
            let text = match &value {
                Value::Array(items) => {
                    let parts: Vec<String> = items.iter().filter_map(entry_text).collect();
                    (!parts.is_empty()).then(|| parts.join("; "))
                }
                other => scalar_text(other),
            };
            text.map(|t| (key, t))
        })
        .collect())
}

/// A nested structure, absent when it does not have the expected shape.
pub fn optional<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}

/// A list of nested structures, skipping entries of the wrong shape.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Default)]
    #[serde(default)]
    struct Sample {
        #[serde(deserialize_with = "text")]
        text: Option<String>,
        #[serde(deserialize_with = "score")]
        score: Option<f64>,
        #[serde(deserialize_with = "text_list")]
        items: Vec<String>,
        #[serde(deserialize_with = "text_entries")]
        entries: Vec<(String, String)>,
    }

    fn fields(json: &str) -> Sample {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_accepts_scalars_only() {
        assert_eq!(fields(r#"{"text": "ok"}"#).text.as_deref(), Some("ok"));
        assert_eq!(fields(r#"{"text": 42}"#).text.as_deref(), Some("42"));
        assert_eq!(fields(r#"{"text": ["a"]}"#).text, None);
        assert_eq!(fields(r#"{"text": "   "}"#).text, None);
        assert_eq!(fields(r#"{"text": null}"#).text, None);
    }

    #[test]
    fn score_parses_numeric_strings() {
        assert_eq!(fields(r#"{"score": 25}"#).score, Some(25.0));
        assert_eq!(fields(r#"{"score": "72.5"}"#).score, Some(72.5));
        assert_eq!(fields(r#"{"score": "65/100"}"#).score, Some(65.0));
        assert_eq!(fields(r#"{"score": "high"}"#).score, None);
        assert_eq!(fields(r#"{"score": {"value": 3}}"#).score, None);
    }

    #[test]
    fn score_rejects_values_outside_range() {
        assert_eq!(fields(r#"{"score": "NaN"}"#).score, None);
        assert_eq!(fields(r#"{"score": "inf"}"#).score, None);
        assert_eq!(fields(r#"{"score": -5}"#).score, None);
        assert_eq!(fields(r#"{"score": 140}"#).score, None);
        assert_eq!(fields(r#"{"score": "0"}"#).score, Some(0.0));
        assert_eq!(fields(r#"{"score": 100}"#).score, Some(100.0));
    }

    #[test]
    fn text_list_keeps_what_it_can() {
        let p = fields(r#"{"items": ["EU", {"region": "North America", "share": "30%"}, null, 7]}"#);
        assert_eq!(p.items, vec!["EU", "North America", "7"]);
        assert_eq!(fields(r#"{"items": "China"}"#).items, vec!["China"]);
        assert!(fields(r#"{"items": {"a": 1}}"#).items.is_empty());
    }

    #[test]
    fn text_entries_preserve_order() {
        let p = fields(r#"{"entries": {"zeta": "Z", "alpha": ["a", "b"], "skip": {}}}"#);
        assert_eq!(
            p.entries,
            vec![
                ("zeta".to_string(), "Z".to_string()),
                ("alpha".to_string(), "a; b".to_string()),
            ]
        );
        assert!(fields(r#"{"entries": "none"}"#).entries.is_empty());
    }
}
