//! Built-in memory store registrations.
//!
//! Stores are declared under `graph.memory` and referenced from agent
//! `config.memories`. `simple` keeps messages in process memory;
//! `file` persists them under a directory.

use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn simple_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "type"],
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "type": {"const": "simple"},
            "params": {
                "type": "object",
                "properties": {
                    "max_messages": {"type": "integer", "minimum": 1},
                },
            },
        },
    })
}

fn file_schema() -> Value {
    json!({
        "type": "object",
        "required": ["name", "type"],
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "type": {"const": "file"},
            "params": {
                "type": "object",
                "properties": {
                    "path": {"type": "string", "minLength": 1},
                },
            },
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::MemoryStore,
    name: "simple",
    summary: "In-process message store",
    schema: simple_schema,
    constructor: None,
});

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::MemoryStore,
    name: "file",
    summary: "Message store persisted to a directory",
    schema: file_schema,
    constructor: None,
});
