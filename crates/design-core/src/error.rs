//! Error types for design loading and validation.

use thiserror::Error;

use crate::registry::SchemaCategory;

/// Result type alias using [`DesignError`].
pub type Result<T> = std::result::Result<T, DesignError>;

/// Configuration parse error carrying a dotted path into the document.
///
/// The path identifies the exact subtree that failed, e.g.
/// `root.graph.nodes[2].config.provider`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{path}: {message}")]
pub struct ConfigError {
    /// Dotted path to the offending subtree.
    pub path: String,
    /// Human-readable description of the mismatch.
    pub message: String,
}

impl ConfigError {
    /// Create a new config error at the given path.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Errors raised by the schema registry and its bootstrap.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A `(category, name)` pair was registered twice.
    #[error("{category} schema '{name}' is already registered")]
    Duplicate {
        category: SchemaCategory,
        name: String,
    },

    /// Lookup of an unregistered `(category, name)` pair.
    #[error("{category} schema '{name}' is not registered")]
    UnknownType {
        category: SchemaCategory,
        name: String,
    },

    /// Registration attempted after the registry was frozen.
    #[error("schema registry is frozen; registrations are only allowed during bootstrap")]
    Frozen,

    /// Bootstrap collected no registrations at all.
    ///
    /// This means no registration provider crate is linked into the
    /// binary, so the registry would be unusable.
    #[error("schema registry bootstrap collected no registrations")]
    EmptyBootstrap,

    /// The registry was accessed before a successful bootstrap.
    #[error("schema registry is not populated; call ensure_schema_registry_populated() first")]
    NotBootstrapped,
}

/// Fatal errors surfaced to callers of the loader facade.
#[derive(Debug, Error)]
pub enum DesignError {
    /// The design YAML file does not exist.
    #[error("Design file not found: {path}")]
    FileNotFound { path: String },

    /// The document could not be parsed as YAML.
    #[error("{0}")]
    Yaml(String),

    /// The YAML root is not a mapping.
    #[error("YAML root must be a mapping")]
    RootNotMapping,

    /// Schema validation produced one or more violations.
    #[error("Invalid schema in {source_path}:\n{rendered}")]
    Schema {
        source_path: String,
        rendered: String,
    },

    /// Typed config parsing failed.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Structural analysis produced one or more issues.
    #[error("Workflow issues in {source_path}:\n{rendered}")]
    Structure {
        source_path: String,
        rendered: String,
    },

    /// A node uses a type with no registration.
    #[error("Unsupported node type '{type_name}' on node '{node_id}'; registered types: {}", allowed.join(", "))]
    UnsupportedNodeType {
        node_id: String,
        type_name: String,
        allowed: Vec<String>,
    },

    /// A node config uses a key that has been retired.
    #[error("node '{node_id}': '{key}' is deprecated; {hint}")]
    DeprecatedKey {
        node_id: String,
        key: String,
        hint: String,
    },

    /// Registry failure (bootstrap or lookup).
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Render a list of error strings as a bulleted block.
pub(crate) fn render_bullets(errors: &[String]) -> String {
    errors
        .iter()
        .map(|e| format!("- {e}"))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display_includes_path() {
        let err = ConfigError::new("root.graph.nodes[0]", "expected string");
        assert_eq!(err.to_string(), "root.graph.nodes[0]: expected string");
    }

    #[test]
    fn unsupported_node_type_lists_alternatives() {
        let err = DesignError::UnsupportedNodeType {
            node_id: "a".to_string(),
            type_name: "mystery".to_string(),
            allowed: vec!["agent".to_string(), "subgraph".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Unsupported node type 'mystery'"));
        assert!(msg.contains("agent, subgraph"));
    }

    #[test]
    fn deprecated_key_names_replacement() {
        let err = DesignError::DeprecatedKey {
            node_id: "coder".to_string(),
            key: "memory".to_string(),
            hint: "declare memory stores under graph.memory".to_string(),
        };
        assert!(err.to_string().contains("'memory' is deprecated"));
    }
}
