//! Filesystem YAML reader.

use std::path::Path;

use serde_json::Value;

use crate::error::DesignError;

/// Read a UTF-8 YAML document from `path` into a JSON value tree.
///
/// YAML is deserialized straight into `serde_json::Value` so the rest
/// of the pipeline works on a single tree shape. Root-shape checks
/// are the caller's job.
pub fn read_yaml(path: impl AsRef<Path>) -> Result<Value, DesignError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|err| {
        if err.kind() == std::io::ErrorKind::NotFound {
            DesignError::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            DesignError::Yaml(format!("failed to read {}: {err}", path.display()))
        }
    })?;
    parse_yaml(&text)
}

/// Parse a YAML string into a JSON value tree.
pub fn parse_yaml(text: &str) -> Result<Value, DesignError> {
    serde_yaml::from_str(text).map_err(|err| DesignError::Yaml(err.to_string()))
}
