//! Built-in model provider registrations.
//!
//! Provider names appear in agent `config.provider`; the composed
//! schema exposes them as an enum. `echo` answers with its own input
//! and exists so designs can be exercised without credentials.

use design_core::{SchemaCategory, SchemaRegistration};
use serde_json::{json, Value};

fn passthrough_params() -> Value {
    json!({"type": "object"})
}

fn openai_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "api_key_env": {"type": "string"},
            "base_url": {"type": "string"},
        },
    })
}

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::ModelProvider,
    name: "echo",
    summary: "Replies with the incoming message; useful for dry runs",
    schema: passthrough_params,
    constructor: None,
});

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::ModelProvider,
    name: "openai",
    summary: "OpenAI chat completion models",
    schema: openai_schema,
    constructor: None,
});

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::ModelProvider,
    name: "claude_code",
    summary: "Anthropic models driven through the local CLI",
    schema: passthrough_params,
    constructor: None,
});

inventory::submit!(SchemaRegistration {
    category: SchemaCategory::ModelProvider,
    name: "gemini",
    summary: "Google Gemini models",
    schema: passthrough_params,
    constructor: None,
});
