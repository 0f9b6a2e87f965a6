//! Built-in edge condition registrations.
//!
//! Documents may write conditions as shorthand strings (`"true"` or
//! an expression) or as tagged objects; these fragments describe the
//! tagged forms.

use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn always_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type"],
        "properties": {"type": {"const": "always"}},
    })
}

fn expression_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type", "expr"],
        "properties": {
            "type": {"const": "expression"},
            "expr": {"type": "string", "minLength": 1},
        },
    })
}

fn function_schema() -> Value {
    json!({
        "type": "object",
        "required": ["type", "name"],
        "properties": {
            "type": {"const": "function"},
            "name": {"type": "string", "minLength": 1},
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::EdgeCondition,
    name: "always",
    summary: "Unconditional traversal",
    schema: always_schema,
    constructor: None,
});

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::EdgeCondition,
    name: "expression",
    summary: "Expression evaluated against the source node's output",
    schema: expression_schema,
    constructor: None,
});

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::EdgeCondition,
    name: "function",
    summary: "Named predicate resolved through the function catalog",
    schema: function_schema,
    constructor: None,
});
