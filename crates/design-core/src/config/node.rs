//! Node configuration: the polymorphic `config` payload and its
//! built-in variants.
//!
//! A node's `type` selects a registered schema; the registered
//! constructor parses the `config` payload into one arm of
//! [`NodeConfig`]. Host-registered types without a built-in variant
//! land in [`NodeConfig::Other`] with the raw payload preserved.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::base::{
    extend_path, optional_bool, optional_i64, optional_object, optional_str, require_object,
    require_str,
};
use crate::config::graph::GraphDefinition;
use crate::error::ConfigError;
use crate::registry::{SchemaCategory, SchemaRegistry};

/// An addressable unit within a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Node {
    /// Unique identifier within the owning graph.
    pub id: String,
    /// Registered node type name.
    pub type_name: String,
    /// Human-readable note shown in consoles and logs.
    pub description: Option<String>,
    /// Whether this node's output is logged.
    pub log_output: bool,
    /// Context messages visible during execution (0 = none kept,
    /// -1 = unlimited).
    pub context_window: i64,
    /// Type-specific configuration payload.
    pub config: NodeConfig,
}

impl Node {
    /// Parse one node mapping, dispatching `config` through the
    /// registered constructor for its type.
    pub fn from_value(
        value: &Value,
        registry: &SchemaRegistry,
        path: &str,
    ) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        let id = require_str(map, "id", path)?;
        let type_name = require_str(map, "type", path)?;

        let spec = registry
            .lookup(SchemaCategory::Node, &type_name)
            .map_err(|_| {
                ConfigError::new(
                    extend_path(path, "type"),
                    format!("unsupported node type '{type_name}'"),
                )
            })?;

        let config_path = extend_path(path, "config");
        let config_value = match map.get("config") {
            None | Some(Value::Null) => {
                return Err(ConfigError::new(&config_path, "node config block required"))
            }
            Some(value) => value,
        };
        let config = match spec.constructor {
            Some(constructor) => constructor(config_value, registry, &config_path)?,
            None => NodeConfig::Other {
                type_name: type_name.clone(),
                raw: config_value.clone(),
            },
        };

        Ok(Self {
            id,
            type_name,
            description: optional_str(map, "description", path)?,
            log_output: optional_bool(map, "log_output", path, true)?,
            context_window: optional_i64(map, "context_window", path, 0)?,
            config,
        })
    }

    /// The agent payload, if this node is an agent.
    pub fn as_agent(&self) -> Option<&AgentConfig> {
        match &self.config {
            NodeConfig::Agent(agent) => Some(agent),
            _ => None,
        }
    }

    /// The subgraph payload, if this node embeds or references a graph.
    pub fn as_subgraph(&self) -> Option<&SubgraphConfig> {
        match &self.config {
            NodeConfig::Subgraph(subgraph) => Some(subgraph),
            _ => None,
        }
    }
}

/// Tagged node configuration payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node_type", rename_all = "snake_case")]
pub enum NodeConfig {
    Agent(AgentConfig),
    Human(HumanConfig),
    Subgraph(SubgraphConfig),
    PythonRunner(PythonRunnerConfig),
    LoopTimer(LoopTimerConfig),
    /// Host-registered type with no built-in variant; payload kept raw.
    Other { type_name: String, raw: Value },
}

/// Reference to a graph-level memory store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemoryAttachment {
    /// Name of a store declared under `graph.memory`.
    pub name: String,
}

impl MemoryAttachment {
    fn from_value(value: &Value, path: &str) -> Result<Self, ConfigError> {
        match value {
            Value::String(name) if !name.trim().is_empty() => Ok(Self { name: name.clone() }),
            Value::Object(map) => {
                let name = require_str(map, "name", path)?;
                Ok(Self { name })
            }
            _ => Err(ConfigError::new(path, "expected store name or mapping")),
        }
    }
}

/// Thinking strategy applied before an agent answers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThinkingConfig {
    /// Registered thinking strategy name.
    pub type_name: String,
    /// Strategy-specific parameters.
    pub params: Map<String, Value>,
}

impl ThinkingConfig {
    fn from_value(
        value: &Value,
        registry: &SchemaRegistry,
        path: &str,
    ) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        let type_name = require_str(map, "type", path)?;
        if !registry.contains(SchemaCategory::Thinking, &type_name) {
            return Err(ConfigError::new(
                extend_path(path, "type"),
                format!("unsupported thinking strategy '{type_name}'"),
            ));
        }
        let mut params = map.clone();
        params.remove("type");
        Ok(Self { type_name, params })
    }
}

/// Configuration for an LLM-backed agent node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgentConfig {
    /// Registered model provider name.
    pub provider: String,
    /// Provider-specific model identifier.
    pub model: Option<String>,
    /// Role played in prompts.
    pub role: Option<String>,
    /// System prompt template.
    pub prompt: Option<String>,
    /// Sampling temperature.
    pub temperature: Option<f64>,
    /// Graph-level memory stores this agent reads and writes.
    pub memories: Vec<MemoryAttachment>,
    /// Optional thinking strategy.
    pub thinking: Option<ThinkingConfig>,
    /// Provider passthrough parameters.
    pub params: Map<String, Value>,
}

impl AgentConfig {
    /// Parse an agent `config` payload.
    pub fn from_value(
        value: &Value,
        registry: &SchemaRegistry,
        path: &str,
    ) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        let provider = require_str(map, "provider", path)?;
        if !registry.contains(SchemaCategory::ModelProvider, &provider) {
            return Err(ConfigError::new(
                extend_path(path, "provider"),
                format!("unsupported model provider '{provider}'"),
            ));
        }

        let temperature = match map.get("temperature") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_f64().ok_or_else(|| {
                ConfigError::new(extend_path(path, "temperature"), "expected number")
            })?),
        };

        let mut memories = Vec::new();
        if let Some(items) = map.get("memories") {
            let items = items.as_array().ok_or_else(|| {
                ConfigError::new(extend_path(path, "memories"), "expected list")
            })?;
            for (idx, item) in items.iter().enumerate() {
                let item_path = extend_path(&extend_path(path, "memories"), &format!("[{idx}]"));
                memories.push(MemoryAttachment::from_value(item, &item_path)?);
            }
        }

        let thinking = match map.get("thinking") {
            None | Some(Value::Null) => None,
            Some(value) => Some(ThinkingConfig::from_value(
                value,
                registry,
                &extend_path(path, "thinking"),
            )?),
        };

        Ok(Self {
            provider,
            model: optional_str(map, "model", path)?,
            role: optional_str(map, "role", path)?,
            prompt: optional_str(map, "prompt", path)?,
            temperature,
            memories,
            thinking,
            params: optional_object(map, "params", path)?.unwrap_or_default(),
        })
    }
}

/// Configuration for a human-in-the-loop node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HumanConfig {
    /// Prompt shown when input is requested.
    pub prompt: Option<String>,
    /// Description of the operator's role.
    pub description: Option<String>,
    /// Seconds to wait before giving up; `None` waits forever.
    pub timeout_seconds: Option<i64>,
}

impl HumanConfig {
    pub fn from_value(value: &Value, path: &str) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        let timeout_seconds = match map.get("timeout_seconds") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_i64().ok_or_else(|| {
                ConfigError::new(extend_path(path, "timeout_seconds"), "expected integer")
            })?),
        };
        Ok(Self {
            prompt: optional_str(map, "prompt", path)?,
            description: optional_str(map, "description", path)?,
            timeout_seconds,
        })
    }
}

/// Configuration for a subgraph node: an embedded graph, or a
/// reference to one stored in a separate file.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SubgraphConfig {
    /// Inline graph definition (`type: config`).
    Inline { graph: GraphDefinition },
    /// Reference to a design file (`type: file`); not resolved here.
    File { path: String },
}

impl SubgraphConfig {
    pub fn from_value(
        value: &Value,
        registry: &SchemaRegistry,
        path: &str,
    ) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        let kind = require_str(map, "type", path)?;
        let inner_path = extend_path(path, "config");
        match kind.as_str() {
            "config" => {
                let inner = map
                    .get("config")
                    .ok_or_else(|| ConfigError::new(&inner_path, "expected mapping"))?;
                let graph = GraphDefinition::from_value(inner, registry, &inner_path)?;
                Ok(Self::Inline { graph })
            }
            "file" => {
                let inner = map
                    .get("config")
                    .and_then(Value::as_object)
                    .ok_or_else(|| ConfigError::new(&inner_path, "expected mapping"))?;
                let file_path = require_str(inner, "path", &inner_path)?;
                Ok(Self::File { path: file_path })
            }
            other => Err(ConfigError::new(
                extend_path(path, "type"),
                format!("must be 'config' or 'file', got '{other}'"),
            )),
        }
    }
}

/// Configuration for a sandboxed Python snippet node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PythonRunnerConfig {
    /// Inline source code to execute.
    pub code: String,
    /// Seconds before the snippet is killed.
    pub timeout_seconds: i64,
}

impl PythonRunnerConfig {
    pub fn from_value(value: &Value, path: &str) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        Ok(Self {
            code: require_str(map, "code", path)?,
            timeout_seconds: optional_i64(map, "timeout_seconds", path, 60)?,
        })
    }
}

/// Configuration for a loop timer node that re-triggers its
/// successors on a fixed interval.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoopTimerConfig {
    /// Interval between triggers.
    pub interval_seconds: i64,
    /// Maximum number of iterations; `None` loops until cancelled.
    pub max_iterations: Option<i64>,
}

impl LoopTimerConfig {
    pub fn from_value(value: &Value, path: &str) -> Result<Self, ConfigError> {
        let map = require_object(value, path)?;
        let interval_seconds = optional_i64(map, "interval_seconds", path, 1)?;
        if interval_seconds <= 0 {
            return Err(ConfigError::new(
                extend_path(path, "interval_seconds"),
                "expected positive integer",
            ));
        }
        let max_iterations = match map.get("max_iterations") {
            None | Some(Value::Null) => None,
            Some(value) => Some(value.as_i64().ok_or_else(|| {
                ConfigError::new(extend_path(path, "max_iterations"), "expected integer")
            })?),
        };
        Ok(Self {
            interval_seconds,
            max_iterations,
        })
    }
}

// Constructors registered against the node category by the built-in
// registration crate.

pub fn agent_constructor(
    value: &Value,
    registry: &SchemaRegistry,
    path: &str,
) -> Result<NodeConfig, ConfigError> {
    Ok(NodeConfig::Agent(AgentConfig::from_value(
        value, registry, path,
    )?))
}

pub fn human_constructor(
    value: &Value,
    _registry: &SchemaRegistry,
    path: &str,
) -> Result<NodeConfig, ConfigError> {
    Ok(NodeConfig::Human(HumanConfig::from_value(value, path)?))
}

pub fn subgraph_constructor(
    value: &Value,
    registry: &SchemaRegistry,
    path: &str,
) -> Result<NodeConfig, ConfigError> {
    Ok(NodeConfig::Subgraph(SubgraphConfig::from_value(
        value, registry, path,
    )?))
}

pub fn python_runner_constructor(
    value: &Value,
    _registry: &SchemaRegistry,
    path: &str,
) -> Result<NodeConfig, ConfigError> {
    Ok(NodeConfig::PythonRunner(PythonRunnerConfig::from_value(
        value, path,
    )?))
}

pub fn loop_timer_constructor(
    value: &Value,
    _registry: &SchemaRegistry,
    path: &str,
) -> Result<NodeConfig, ConfigError> {
    Ok(NodeConfig::LoopTimer(LoopTimerConfig::from_value(
        value, path,
    )?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_registry;
    use serde_json::json;

    #[test]
    fn parse_agent_node() {
        let registry = test_registry();
        let node = Node::from_value(
            &json!({
                "id": "coder",
                "type": "agent",
                "config": {"provider": "echo", "role": "programmer", "temperature": 0.2}
            }),
            &registry,
            "root.graph.nodes[0]",
        )
        .unwrap();

        assert_eq!(node.id, "coder");
        assert!(node.log_output);
        assert_eq!(node.context_window, 0);
        let agent = node.as_agent().unwrap();
        assert_eq!(agent.provider, "echo");
        assert_eq!(agent.role.as_deref(), Some("programmer"));
        assert_eq!(agent.temperature, Some(0.2));
    }

    #[test]
    fn unknown_node_type_pinpoints_type_field() {
        let registry = test_registry();
        let err = Node::from_value(
            &json!({"id": "x", "type": "mystery", "config": {}}),
            &registry,
            "root.graph.nodes[0]",
        )
        .unwrap_err();
        assert_eq!(err.path, "root.graph.nodes[0].type");
        assert!(err.message.contains("mystery"));
    }

    #[test]
    fn missing_config_block_fails() {
        let registry = test_registry();
        let err = Node::from_value(
            &json!({"id": "x", "type": "agent"}),
            &registry,
            "root.graph.nodes[0]",
        )
        .unwrap_err();
        assert_eq!(err.path, "root.graph.nodes[0].config");
    }

    #[test]
    fn agent_rejects_unknown_provider() {
        let registry = test_registry();
        let err = Node::from_value(
            &json!({"id": "x", "type": "agent", "config": {"provider": "mystery"}}),
            &registry,
            "root.graph.nodes[0]",
        )
        .unwrap_err();
        assert_eq!(err.path, "root.graph.nodes[0].config.provider");
    }

    #[test]
    fn subgraph_file_variant_requires_path() {
        let registry = test_registry();
        let cfg = SubgraphConfig::from_value(
            &json!({"type": "file", "config": {"path": "sub.yaml"}}),
            &registry,
            "root.graph.nodes[0].config",
        )
        .unwrap();
        assert_eq!(
            cfg,
            SubgraphConfig::File {
                path: "sub.yaml".to_string()
            }
        );

        let err = SubgraphConfig::from_value(
            &json!({"type": "file", "config": {}}),
            &registry,
            "root.graph.nodes[0].config",
        )
        .unwrap_err();
        assert_eq!(err.path, "root.graph.nodes[0].config.config.path");
    }

    #[test]
    fn subgraph_rejects_other_kinds() {
        let registry = test_registry();
        let err = SubgraphConfig::from_value(
            &json!({"type": "url", "config": {}}),
            &registry,
            "root.graph.nodes[0].config",
        )
        .unwrap_err();
        assert_eq!(err.path, "root.graph.nodes[0].config.type");
    }

    #[test]
    fn memory_attachment_accepts_both_shapes() {
        let registry = test_registry();
        let agent = AgentConfig::from_value(
            &json!({"provider": "echo", "memories": ["scratch", {"name": "kb"}]}),
            &registry,
            "cfg",
        )
        .unwrap();
        let names: Vec<&str> = agent.memories.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["scratch", "kb"]);
    }

    #[test]
    fn loop_timer_rejects_non_positive_interval() {
        let err = LoopTimerConfig::from_value(&json!({"interval_seconds": 0}), "cfg").unwrap_err();
        assert_eq!(err.path, "cfg.interval_seconds");
    }
}
