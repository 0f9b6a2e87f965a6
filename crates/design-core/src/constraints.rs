//! MVP constraint checks applied after schema and structural
//! validation.
//!
//! These enforce forward-compat guarantees the JSON schema cannot
//! express conveniently, and produce targeted migration messages.
//! They run on the raw mapping because the deprecated keys they hunt
//! for never survive a typed parse.

use serde_json::Value;

use crate::error::{ConfigError, DesignError};
use crate::registry::{SchemaCategory, SchemaRegistry};

/// Reject unsupported node types and retired legacy keys.
///
/// Fails on the first offense; callers surface the message directly.
/// Recurses into inline subgraphs so nested graphs obey the same
/// constraints.
pub fn ensure_supported(graph: &Value, registry: &SchemaRegistry) -> Result<(), DesignError> {
    ensure_supported_at(graph, registry, "graph")
}

fn ensure_supported_at(
    graph: &Value,
    registry: &SchemaRegistry,
    base_path: &str,
) -> Result<(), DesignError> {
    let Some(nodes) = graph.get("nodes").and_then(Value::as_array) else {
        return Ok(());
    };

    for (i, node) in nodes.iter().enumerate() {
        let Some(node_map) = node.as_object() else {
            continue;
        };
        let node_id = node_map
            .get("id")
            .and_then(Value::as_str)
            .unwrap_or("<unnamed>");
        let Some(type_name) = node_map.get("type").and_then(Value::as_str) else {
            continue;
        };

        if !registry.contains(SchemaCategory::Node, type_name) {
            return Err(DesignError::UnsupportedNodeType {
                node_id: node_id.to_string(),
                type_name: type_name.to_string(),
                allowed: registry.names(SchemaCategory::Node),
            });
        }

        let config = node_map.get("config");
        match type_name {
            "agent" => {
                let Some(config_map) = config.and_then(Value::as_object) else {
                    return Err(DesignError::Config(ConfigError::new(
                        format!("{base_path}.nodes[{i}].config"),
                        "agent config must be a mapping",
                    )));
                };
                if config_map.contains_key("memory") {
                    return Err(DesignError::DeprecatedKey {
                        node_id: node_id.to_string(),
                        key: "memory".to_string(),
                        hint: "declare memory stores under graph.memory and reference \
                               them from config.memories"
                            .to_string(),
                    });
                }
            }
            "subgraph" => {
                let inline = config
                    .and_then(Value::as_object)
                    .filter(|map| map.get("type").and_then(Value::as_str) == Some("config"))
                    .and_then(|map| map.get("config"));
                if let Some(inner) = inline {
                    let inner_path = format!("{base_path}.nodes[{i}].config.config");
                    ensure_supported_at(inner, registry, &inner_path)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_registry;
    use serde_json::json;

    #[test]
    fn known_types_pass() {
        let graph = json!({"nodes": [
            {"id": "a", "type": "agent", "config": {"provider": "echo"}},
            {"id": "b", "type": "human", "config": {}}
        ]});
        ensure_supported(&graph, &test_registry()).unwrap();
    }

    #[test]
    fn unknown_type_lists_alternatives() {
        let graph = json!({"nodes": [
            {"id": "a", "type": "mystery", "config": {}}
        ]});
        let err = ensure_supported(&graph, &test_registry()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unsupported node type 'mystery'"));
        assert!(msg.contains("agent"));
        assert!(msg.contains("subgraph"));
    }

    #[test]
    fn deprecated_agent_memory_key_fails() {
        let graph = json!({"nodes": [
            {"id": "coder", "type": "agent",
             "config": {"provider": "echo", "memory": {"kind": "simple"}}}
        ]});
        let err = ensure_supported(&graph, &test_registry()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("'memory' is deprecated"));
        assert!(msg.contains("graph.memory"));
    }

    #[test]
    fn agent_config_must_be_mapping() {
        let graph = json!({"nodes": [
            {"id": "a", "type": "agent", "config": "nope"}
        ]});
        let err = ensure_supported(&graph, &test_registry()).unwrap_err();
        assert!(err.to_string().contains("graph.nodes[0].config"));
    }

    #[test]
    fn nested_subgraph_nodes_are_checked() {
        let graph = json!({"nodes": [{
            "id": "outer",
            "type": "subgraph",
            "config": {"type": "config", "config": {
                "nodes": [{"id": "x", "type": "mystery", "config": {}}]
            }}
        }]});
        let err = ensure_supported(&graph, &test_registry()).unwrap_err();
        assert!(err.to_string().contains("Unsupported node type 'mystery'"));
    }
}
