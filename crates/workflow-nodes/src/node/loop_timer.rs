//! Loop Timer Node
//!
//! Re-triggers its successors on a fixed interval, optionally capped
//! at a maximum iteration count.
//!
//! # Config
//! - `interval_seconds` (optional, default 1) - seconds between
//!   triggers, must be positive
//! - `max_iterations` (optional) - stop after this many iterations;
//!   absent loops until cancelled

use design_core::config::loop_timer_constructor;
use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn config_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "interval_seconds": {"type": "integer", "minimum": 1, "default": 1},
            "max_iterations": {"type": "integer", "minimum": 1},
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::Node,
    name: "loop_timer",
    summary: "Re-triggers successors on a fixed interval",
    schema: config_schema,
    constructor: Some(loop_timer_constructor),
});
