//! Subgraph Node
//!
//! Embeds another graph, either inline (`type: config`) or by
//! reference to a separate design file (`type: file`). Inline graphs
//! are validated recursively against the same graph definition.
//!
//! # Config
//! - `type` (required) - `config` for an inline graph, `file` for a
//!   reference
//! - `config` - the inline graph mapping, or `{path}` for a file
//!   reference

use design_core::config::subgraph_constructor;
use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type", "config"],
        "properties": {
            "type": {"enum": ["config", "file"]},
            "config": {
                "anyOf": [
                    {"$ref": "#/definitions/graph"},
                    {
                        "type": "object",
                        "required": ["path"],
                        "properties": {"path": {"type": "string", "minLength": 1}},
                    },
                ],
            },
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::Node,
    name: "subgraph",
    summary: "Embeds a nested graph inline or by file reference",
    schema: config_schema,
    constructor: Some(subgraph_constructor),
});
