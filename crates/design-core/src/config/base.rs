//! Shared helpers for path-aware typed parsing.

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Join a path segment onto a dotted path. Index segments (`[3]`)
/// attach without a separating dot.
pub fn extend_path(path: &str, suffix: &str) -> String {
    if path.is_empty() {
        return suffix.to_string();
    }
    if suffix.starts_with('[') {
        format!("{path}{suffix}")
    } else {
        format!("{path}.{suffix}")
    }
}

/// Require the value to be a JSON object.
pub fn require_object<'a>(
    value: &'a Value,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    value
        .as_object()
        .ok_or_else(|| ConfigError::new(path, "expected mapping"))
}

/// Require a non-empty string field.
pub fn require_str(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<String, ConfigError> {
    let key_path = extend_path(path, key);
    let value = map
        .get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| ConfigError::new(&key_path, "expected string"))?;
    if value.trim().is_empty() {
        return Err(ConfigError::new(&key_path, "expected non-empty string"));
    }
    Ok(value.to_string())
}

/// Optional string field; `null` and `""` read as absent.
pub fn optional_str(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<String>, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ConfigError::new(extend_path(path, key), "expected string")),
    }
}

/// Optional boolean field with a default.
pub fn optional_bool(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
    default: bool,
) -> Result<bool, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(ConfigError::new(extend_path(path, key), "expected boolean")),
    }
}

/// Optional integer field with a default.
pub fn optional_i64(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
    default: i64,
) -> Result<i64, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_i64()
            .ok_or_else(|| ConfigError::new(extend_path(path, key), "expected integer")),
    }
}

/// Optional object field, cloned out of the document.
pub fn optional_object(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<Map<String, Value>>, ConfigError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(obj)) => Ok(Some(obj.clone())),
        Some(_) => Err(ConfigError::new(extend_path(path, key), "expected mapping")),
    }
}

/// Read a field that may be a single string or a list of strings.
///
/// Returns `None` when the field is absent. Used for `start` / `end`
/// and memory attachments.
pub fn optional_string_or_list(
    map: &Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<Option<Vec<String>>, ConfigError> {
    let key_path = extend_path(path, key);
    match map.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(vec![s.clone()])),
        Some(Value::Array(items)) => {
            let mut out = Vec::with_capacity(items.len());
            for item in items {
                match item.as_str() {
                    Some(s) => out.push(s.to_string()),
                    None => {
                        return Err(ConfigError::new(
                            &key_path,
                            "expected a string or list of strings",
                        ))
                    }
                }
            }
            Ok(Some(out))
        }
        Some(_) => Err(ConfigError::new(
            &key_path,
            "expected a string or list of strings",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn extend_path_handles_indices() {
        assert_eq!(extend_path("root.graph", "nodes"), "root.graph.nodes");
        assert_eq!(extend_path("root.graph.nodes", "[2]"), "root.graph.nodes[2]");
        assert_eq!(extend_path("", "graph"), "graph");
    }

    #[test]
    fn require_str_rejects_blank() {
        let map = json!({"id": "  "});
        let err = require_str(map.as_object().unwrap(), "id", "root").unwrap_err();
        assert_eq!(err.path, "root.id");
    }

    #[test]
    fn string_or_list_accepts_both_shapes() {
        let map = json!({"end": "a"});
        assert_eq!(
            optional_string_or_list(map.as_object().unwrap(), "end", "graph").unwrap(),
            Some(vec!["a".to_string()])
        );

        let map = json!({"end": ["a", "b"]});
        assert_eq!(
            optional_string_or_list(map.as_object().unwrap(), "end", "graph").unwrap(),
            Some(vec!["a".to_string(), "b".to_string()])
        );

        let map = json!({"end": 3});
        assert!(optional_string_or_list(map.as_object().unwrap(), "end", "graph").is_err());
    }
}
