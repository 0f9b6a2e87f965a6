//! Export of the typed tree back into the canonical document shape.
//!
//! `parse(export(design))` yields a design structurally equal to the
//! original, which is what editor save flows rely on.

use serde_json::{json, Map, Value};

use crate::config::edge::{EdgeCondition, EdgeConfig};
use crate::config::graph::{DesignConfig, GraphDefinition, MemoryStoreConfig};
use crate::config::node::{Node, NodeConfig, ThinkingConfig};

impl DesignConfig {
    /// Render the typed tree as a canonical design mapping.
    pub fn to_design_value(&self) -> Value {
        let mut root = Map::new();
        root.insert("version".to_string(), Value::String(self.version.clone()));
        if !self.vars.is_empty() {
            root.insert("vars".to_string(), Value::Object(self.vars.clone()));
        }
        root.insert("graph".to_string(), self.graph.to_design_value());
        if !self.metadata.is_empty() {
            root.insert("metadata".to_string(), Value::Object(self.metadata.clone()));
        }
        Value::Object(root)
    }
}

impl GraphDefinition {
    /// Render this graph as a canonical graph mapping.
    pub fn to_design_value(&self) -> Value {
        let mut map = Map::new();
        if let Some(id) = &self.id {
            map.insert("id".to_string(), Value::String(id.clone()));
        }
        if let Some(description) = &self.description {
            map.insert("description".to_string(), Value::String(description.clone()));
        }
        if self.is_majority_voting {
            map.insert("is_majority_voting".to_string(), Value::Bool(true));
        }
        map.insert(
            "nodes".to_string(),
            Value::Array(self.nodes.iter().map(Node::to_design_value).collect()),
        );
        map.insert(
            "edges".to_string(),
            Value::Array(self.edges.iter().map(EdgeConfig::to_design_value).collect()),
        );
        if !self.memory.is_empty() {
            map.insert(
                "memory".to_string(),
                Value::Array(
                    self.memory
                        .iter()
                        .map(MemoryStoreConfig::to_design_value)
                        .collect(),
                ),
            );
        }
        if let Some(instruction) = &self.initial_instruction {
            map.insert(
                "initial_instruction".to_string(),
                Value::String(instruction.clone()),
            );
        }
        if !self.start_nodes.is_empty() {
            map.insert(
                "start".to_string(),
                Value::Array(
                    self.start_nodes
                        .iter()
                        .map(|id| Value::String(id.clone()))
                        .collect(),
                ),
            );
        }
        if let Some(end_nodes) = &self.end_nodes {
            map.insert(
                "end".to_string(),
                Value::Array(end_nodes.iter().map(|id| Value::String(id.clone())).collect()),
            );
        }
        Value::Object(map)
    }
}

impl MemoryStoreConfig {
    fn to_design_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".to_string(), Value::String(self.name.clone()));
        map.insert("type".to_string(), Value::String(self.store_type.clone()));
        if !self.params.is_empty() {
            map.insert("params".to_string(), Value::Object(self.params.clone()));
        }
        Value::Object(map)
    }
}

impl Node {
    fn to_design_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("id".to_string(), Value::String(self.id.clone()));
        map.insert("type".to_string(), Value::String(self.type_name.clone()));
        if let Some(description) = &self.description {
            map.insert("description".to_string(), Value::String(description.clone()));
        }
        if !self.log_output {
            map.insert("log_output".to_string(), Value::Bool(false));
        }
        if self.context_window != 0 {
            map.insert("context_window".to_string(), json!(self.context_window));
        }
        map.insert("config".to_string(), self.config.to_design_value());
        Value::Object(map)
    }
}

impl NodeConfig {
    fn to_design_value(&self) -> Value {
        match self {
            Self::Agent(agent) => {
                let mut map = Map::new();
                map.insert("provider".to_string(), Value::String(agent.provider.clone()));
                if let Some(model) = &agent.model {
                    map.insert("model".to_string(), Value::String(model.clone()));
                }
                if let Some(role) = &agent.role {
                    map.insert("role".to_string(), Value::String(role.clone()));
                }
                if let Some(prompt) = &agent.prompt {
                    map.insert("prompt".to_string(), Value::String(prompt.clone()));
                }
                if let Some(temperature) = agent.temperature {
                    map.insert("temperature".to_string(), json!(temperature));
                }
                if !agent.memories.is_empty() {
                    map.insert(
                        "memories".to_string(),
                        Value::Array(
                            agent
                                .memories
                                .iter()
                                .map(|m| Value::String(m.name.clone()))
                                .collect(),
                        ),
                    );
                }
                if let Some(thinking) = &agent.thinking {
                    map.insert("thinking".to_string(), thinking.to_design_value());
                }
                if !agent.params.is_empty() {
                    map.insert("params".to_string(), Value::Object(agent.params.clone()));
                }
                Value::Object(map)
            }
            Self::Human(human) => {
                let mut map = Map::new();
                if let Some(prompt) = &human.prompt {
                    map.insert("prompt".to_string(), Value::String(prompt.clone()));
                }
                if let Some(description) = &human.description {
                    map.insert("description".to_string(), Value::String(description.clone()));
                }
                if let Some(timeout) = human.timeout_seconds {
                    map.insert("timeout_seconds".to_string(), json!(timeout));
                }
                Value::Object(map)
            }
            Self::Subgraph(subgraph) => match subgraph {
                crate::config::SubgraphConfig::Inline { graph } => json!({
                    "type": "config",
                    "config": graph.to_design_value(),
                }),
                crate::config::SubgraphConfig::File { path } => json!({
                    "type": "file",
                    "config": {"path": path},
                }),
            },
            Self::PythonRunner(runner) => json!({
                "code": runner.code,
                "timeout_seconds": runner.timeout_seconds,
            }),
            Self::LoopTimer(timer) => {
                let mut map = Map::new();
                map.insert("interval_seconds".to_string(), json!(timer.interval_seconds));
                if let Some(max) = timer.max_iterations {
                    map.insert("max_iterations".to_string(), json!(max));
                }
                Value::Object(map)
            }
            Self::Other { raw, .. } => raw.clone(),
        }
    }
}

impl ThinkingConfig {
    fn to_design_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("type".to_string(), Value::String(self.type_name.clone()));
        for (key, value) in &self.params {
            map.insert(key.clone(), value.clone());
        }
        Value::Object(map)
    }
}

impl EdgeConfig {
    fn to_design_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("from".to_string(), Value::String(self.source.clone()));
        map.insert("to".to_string(), Value::String(self.target.clone()));
        if let Some(condition) = &self.condition {
            map.insert("condition".to_string(), condition.to_design_value());
        }
        if !self.trigger {
            map.insert("trigger".to_string(), Value::Bool(false));
        }
        if !self.carry_data {
            map.insert("carry_data".to_string(), Value::Bool(false));
        }
        if self.keep_message {
            map.insert("keep_message".to_string(), Value::Bool(true));
        }
        if let Some(description) = &self.description {
            map.insert("description".to_string(), Value::String(description.clone()));
        }
        Value::Object(map)
    }
}

impl EdgeCondition {
    fn to_design_value(&self) -> Value {
        match self {
            Self::Always => Value::String("true".to_string()),
            Self::Expression { expr } => Value::String(expr.clone()),
            Self::Function { name } => json!({"type": "function", "name": name}),
            Self::Other { raw, .. } => raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_registry;

    #[test]
    fn export_then_parse_is_identity() {
        let registry = test_registry();
        let doc = json!({
            "version": "0.4.0",
            "vars": {"name": "Alice"},
            "graph": {
                "id": "pipeline",
                "end": ["b"],
                "memory": [{"name": "kb", "type": "simple"}],
                "nodes": [
                    {"id": "a", "type": "agent",
                     "config": {"provider": "echo", "memories": ["kb"]}},
                    {"id": "b", "type": "human", "config": {"prompt": "review"}},
                    {"id": "c", "type": "agent", "config": {"provider": "echo"}}
                ],
                "edges": [
                    {"from": "a", "to": "b",
                     "condition": {"type": "function", "name": "has_output"}},
                    {"from": "a", "to": "c", "condition": "output.ok"}
                ]
            }
        });

        let design = DesignConfig::from_value(&doc, &registry).unwrap();
        let exported = design.to_design_value();
        let reloaded = DesignConfig::from_value(&exported, &registry).unwrap();
        assert_eq!(design, reloaded);
    }
}
