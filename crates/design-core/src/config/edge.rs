//! Edge configuration: endpoints, transfer flags and conditions.

use serde::Serialize;
use serde_json::Value;

use crate::config::base::{extend_path, optional_bool, optional_str, require_object, require_str};
use crate::error::ConfigError;
use crate::registry::{SchemaCategory, SchemaRegistry};

/// Condition gating traversal of an edge.
///
/// A bare string in the document is shorthand: `"true"` means
/// [`Always`](EdgeCondition::Always), anything else is an
/// [`Expression`](EdgeCondition::Expression). The object form is
/// discriminated on `type` against the edge-condition category of the
/// schema registry.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EdgeCondition {
    /// Unconditional traversal.
    Always,
    /// Expression evaluated against the source node's output.
    Expression { expr: String },
    /// Named predicate function resolved through the function catalog.
    Function { name: String },
    /// Host-registered condition type without a built-in variant.
    Other { type_name: String, raw: Value },
}

impl EdgeCondition {
    /// Parse a condition value (string shorthand or tagged object).
    pub fn from_value(
        value: &Value,
        registry: &SchemaRegistry,
        path: &str,
    ) -> Result<Self, ConfigError> {
        match value {
            // YAML renders an unquoted `condition: true` as a boolean.
            Value::Bool(true) => Ok(Self::Always),
            Value::Bool(false) => Err(ConfigError::new(
                path,
                "'false' would never traverse; omit the edge instead",
            )),
            Value::String(s) if s == "true" || s.is_empty() => Ok(Self::Always),
            Value::String(s) => Ok(Self::Expression { expr: s.clone() }),
            Value::Object(map) => {
                let type_name = require_str(map, "type", path)?;
                if !registry.contains(SchemaCategory::EdgeCondition, &type_name) {
                    return Err(ConfigError::new(
                        extend_path(path, "type"),
                        format!("unsupported edge condition type '{type_name}'"),
                    ));
                }
                match type_name.as_str() {
                    "always" => Ok(Self::Always),
                    "expression" => {
                        let expr = require_str(map, "expr", path)?;
                        Ok(Self::Expression { expr })
                    }
                    "function" => {
                        let name = require_str(map, "name", path)?;
                        Ok(Self::Function { name })
                    }
                    _ => Ok(Self::Other {
                        type_name,
                        raw: value.clone(),
                    }),
                }
            }
            _ => Err(ConfigError::new(path, "expected string or mapping")),
        }
    }

    /// Condition type discriminant as it appears in documents.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Always => "always",
            Self::Expression { .. } => "expression",
            Self::Function { .. } => "function",
            Self::Other { type_name, .. } => type_name,
        }
    }
}

/// A directed edge between two nodes of the same graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeConfig {
    /// Source node ID (`from` in the document).
    pub source: String,
    /// Target node ID (`to` in the document).
    pub target: String,
    /// Optional traversal condition; absent means always.
    pub condition: Option<EdgeCondition>,
    /// Whether traversal triggers the target node.
    pub trigger: bool,
    /// Whether the source output is carried to the target input.
    pub carry_data: bool,
    /// Whether the carried message is pinned in the target context.
    pub keep_message: bool,
    /// Human-readable note.
    pub description: Option<String>,
}

impl EdgeConfig {
    /// Parse one edge mapping.
    pub fn from_value(
        value: &Value,
        registry: &SchemaRegistry,
        path: &str,
    ) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        let source = require_str(map, "from", path)?;
        let target = require_str(map, "to", path)?;
        let condition = match map.get("condition") {
            None | Some(Value::Null) => None,
            Some(cond) => Some(EdgeCondition::from_value(
                cond,
                registry,
                &extend_path(path, "condition"),
            )?),
        };
        Ok(Self {
            source,
            target,
            condition,
            trigger: optional_bool(map, "trigger", path, true)?,
            carry_data: optional_bool(map, "carry_data", path, true)?,
            keep_message: optional_bool(map, "keep_message", path, false)?,
            description: optional_str(map, "description", path)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaSpec;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let mut registry = SchemaRegistry::new();
        for name in ["always", "expression", "function"] {
            registry
                .register(
                    SchemaCategory::EdgeCondition,
                    SchemaSpec {
                        name: name.to_string(),
                        summary: String::new(),
                        schema: json!({"type": "object"}),
                        constructor: None,
                    },
                )
                .unwrap();
        }
        registry
    }

    #[test]
    fn bare_true_is_always() {
        let cond =
            EdgeCondition::from_value(&json!("true"), &registry(), "graph.edges[0].condition")
                .unwrap();
        assert_eq!(cond, EdgeCondition::Always);
    }

    #[test]
    fn bare_string_is_expression() {
        let cond = EdgeCondition::from_value(
            &json!("output.score > 0.5"),
            &registry(),
            "graph.edges[0].condition",
        )
        .unwrap();
        assert_eq!(
            cond,
            EdgeCondition::Expression {
                expr: "output.score > 0.5".to_string()
            }
        );
    }

    #[test]
    fn tagged_function_condition() {
        let cond = EdgeCondition::from_value(
            &json!({"type": "function", "name": "has_output"}),
            &registry(),
            "graph.edges[0].condition",
        )
        .unwrap();
        assert_eq!(
            cond,
            EdgeCondition::Function {
                name: "has_output".to_string()
            }
        );
    }

    #[test]
    fn unregistered_condition_type_fails() {
        let err = EdgeCondition::from_value(
            &json!({"type": "mystery"}),
            &registry(),
            "graph.edges[0].condition",
        )
        .unwrap_err();
        assert_eq!(err.path, "graph.edges[0].condition.type");
        assert!(err.message.contains("mystery"));
    }

    #[test]
    fn edge_defaults() {
        let edge = EdgeConfig::from_value(
            &json!({"from": "a", "to": "b"}),
            &registry(),
            "graph.edges[0]",
        )
        .unwrap();
        assert_eq!(edge.source, "a");
        assert_eq!(edge.target, "b");
        assert!(edge.trigger);
        assert!(edge.carry_data);
        assert!(!edge.keep_message);
        assert!(edge.condition.is_none());
    }

    #[test]
    fn edge_missing_endpoint_pinpoints_path() {
        let err = EdgeConfig::from_value(&json!({"from": "a"}), &registry(), "graph.edges[1]")
            .unwrap_err();
        assert_eq!(err.path, "graph.edges[1].to");
    }
}
