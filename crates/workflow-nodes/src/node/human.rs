//! Human Node
//!
//! Pauses the workflow and waits for operator input.
//!
//! # Config
//! - `prompt` (optional) - prompt shown when input is requested
//! - `description` (optional) - operator role description
//! - `timeout_seconds` (optional) - give up after this long; absent
//!   waits forever

use design_core::config::human_constructor;
use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "prompt": {"type": "string"},
            "description": {"type": "string"},
            "timeout_seconds": {"type": "integer", "minimum": 1},
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::Node,
    name: "human",
    summary: "Waits for operator input before continuing",
    schema: config_schema,
    constructor: Some(human_constructor),
});
