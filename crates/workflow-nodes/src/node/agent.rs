//! Agent Node
//!
//! An LLM-backed participant. The `config` payload selects a
//! registered model provider, an optional model/role/prompt, memory
//! attachments referencing graph-level stores, and an optional
//! thinking strategy.
//!
//! # Config
//! - `provider` (required) - registered model provider name
//! - `model` (optional) - provider-specific model identifier
//! - `role` (optional) - role played in prompts
//! - `prompt` (optional) - system prompt template
//! - `temperature` (optional) - sampling temperature, 0..=2
//! - `memories` (optional) - store names or `{name}` mappings
//! - `thinking` (optional) - `{type, ...}` strategy settings
//! - `params` (optional) - provider passthrough parameters

use design_core::config::agent_constructor;
use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["provider"],
        "properties": {
            "provider": {"$ref": "#/definitions/provider_name"},
            "model": {"type": "string"},
            "role": {"type": "string"},
            "prompt": {"type": "string"},
            "temperature": {"type": "number", "minimum": 0.0, "maximum": 2.0},
            "memories": {
                "type": "array",
                "items": {
                    "anyOf": [
                        {"type": "string", "minLength": 1},
                        {
                            "type": "object",
                            "required": ["name"],
                            "properties": {"name": {"type": "string", "minLength": 1}},
                        },
                    ],
                },
            },
            "thinking": {"$ref": "#/definitions/thinking"},
            "params": {"type": "object"},
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::Node,
    name: "agent",
    summary: "LLM-backed agent answering through a registered model provider",
    schema: config_schema,
    constructor: Some(agent_constructor),
});
