//! Python Runner Node
//!
//! Executes an inline Python snippet in a sandboxed interpreter.
//!
//! # Config
//! - `code` (required) - snippet source
//! - `timeout_seconds` (optional, default 60) - kill the snippet
//!   after this long

use design_core::config::python_runner_constructor;
use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn config_schema() -> Value {
    json!({
        "type": "object",
        "required": ["code"],
        "properties": {
            "code": {"type": "string", "minLength": 1},
            "timeout_seconds": {"type": "integer", "minimum": 1, "default": 60},
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::Node,
    name: "python_runner",
    summary: "Runs an inline Python snippet with a timeout",
    schema: config_schema,
    constructor: Some(python_runner_constructor),
});
