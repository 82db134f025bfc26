//! Lenient field deserializers
//!
//! Browser forms are not strict about types: a budget may arrive as `15000`
//! or `"15000"`, an optional list as `null` or `""`. Every free-text column
//! is TEXT, so scalars are stored in their textual form.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::validation::is_falsy;

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Scalar → text. `null` and missing stay `None`.
pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(Value::Number(n)) => Ok(Some(n.to_string())),
        Some(Value::Bool(b)) => Ok(Some(b.to_string())),
        Some(other) => Err(D::Error::custom(format!(
            "expected text, found {}",
            type_name(&other)
        ))),
    }
}

/// Falsy → empty list, otherwise a list of `T`.
pub fn list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if is_falsy(&value) {
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(D::Error::custom)
}

/// Falsy → `None`, otherwise a `T`.
pub fn object<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if is_falsy(&value) {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some).map_err(D::Error::custom)
}

/// Non-blank text, trimmed.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize)]
    struct Sample {
        #[serde(default, deserialize_with = "text")]
        budget: Option<String>,
        #[serde(default, deserialize_with = "list")]
        tags: Vec<String>,
    }

    #[test]
    fn scalars_become_text() {
        let p: Sample = serde_json::from_value(json!({"budget": 15000})).unwrap();
        assert_eq!(p.budget.as_deref(), Some("15000"));

        let p: Sample = serde_json::from_value(json!({"budget": true})).unwrap();
        assert_eq!(p.budget.as_deref(), Some("true"));

        let p: Sample = serde_json::from_value(json!({"budget": null})).unwrap();
        assert_eq!(p.budget, None);

        let p: Sample = serde_json::from_value(json!({})).unwrap();
        assert_eq!(p.budget, None);
    }

    #[test]
    fn nested_values_are_rejected() {
        let err = serde_json::from_value::<Sample>(json!({"budget": [1]})).unwrap_err();
        assert!(err.to_string().contains("expected text, found array"));
    }

    #[test]
    fn falsy_lists_are_empty() {
        for v in [json!(null), json!(""), json!([]), json!(false)] {
            let p: Sample = serde_json::from_value(json!({ "tags": v })).unwrap();
            assert!(p.tags.is_empty());
        }
        let p: Sample = serde_json::from_value(json!({"tags": ["a"]})).unwrap();
        assert_eq!(p.tags, vec!["a".to_string()]);
    }

    #[test]
    fn non_blank_trims() {
        assert_eq!(non_blank(&Some("  x ".into())), Some("x"));
        assert_eq!(non_blank(&Some("   ".into())), None);
        assert_eq!(non_blank(&None), None);
    }
}
