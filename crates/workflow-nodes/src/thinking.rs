//! Built-in thinking strategy registrations.
//!
//! Strategies are attached to agents via `config.thinking` and shape
//! how the agent reasons before answering.

use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn direct_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {"type": {"const": "direct"}},
    })
}

fn chain_of_thought_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {
            "type": {"const": "chain_of_thought"},
            "max_steps": {"type": "integer", "minimum": 1},
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::Thinking,
    name: "direct",
    summary: "Answer immediately without intermediate reasoning",
    schema: direct_schema,
    constructor: None,
});

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::Thinking,
    name: "chain_of_thought",
    summary: "Reason step by step before answering",
    schema: chain_of_thought_schema,
    constructor: None,
});
