//! JSON-schema validation for design documents.
//!
//! The root schema is composed from the live [`SchemaRegistry`]: node
//! arms, memory store shapes, edge condition variants, provider and
//! thinking type enums all come from registered fragments, so a new
//! builtin extends the accepted surface without touching this module.

use jsonschema::JSONSchema;
use serde_json::{json, Value};

use crate::catalog::FunctionCatalog;
use crate::registry::{SchemaCategory, SchemaRegistry};

/// Build the draft-07 root schema for a full design document.
pub fn compose_root_schema(registry: &SchemaRegistry) -> Value {
    let node_arms: Vec<Value> = registry
        .iter_category(SchemaCategory::Node)
        .map(|(name, spec)| {
            json!({
                "type": "object",
                "required": ["id", "type", "config"],
                "properties": {
                    "id": {"type": "string", "minLength": 1},
                    "type": {"const": name},
                    "description": {"type": "string"},
                    "log_output": {"type": "boolean", "default": true},
                    "context_window": {"type": "integer"},
                    "config": spec.schema.clone(),
                }
            })
        })
        .collect();

    let condition_arms: Vec<Value> = registry
        .iter_category(SchemaCategory::EdgeCondition)
        .map(|(_, spec)| spec.schema.clone())
        .collect();

    let memory_arms: Vec<Value> = registry
        .iter_category(SchemaCategory::MemoryStore)
        .map(|(_, spec)| spec.schema.clone())
        .collect();

    let thinking_arms: Vec<Value> = registry
        .iter_category(SchemaCategory::Thinking)
        .map(|(_, spec)| spec.schema.clone())
        .collect();

    json!({
        "$schema": "http://json-schema.org/draft-07/schema#",
        "type": "object",
        "required": ["graph"],
        "properties": {
            "version": {"type": "string", "default": "0.0.0"},
            "vars": {"type": "object"},
            "graph": {"$ref": "#/definitions/graph"},
            "metadata": {"type": "object"},
        },
        "definitions": {
            "graph": {
                "type": "object",
                "required": ["nodes"],
                "properties": {
                    "id": {"type": "string"},
                    "description": {"type": "string"},
                    "is_majority_voting": {"type": "boolean", "default": false},
                    "initial_instruction": {"type": "string"},
                    "nodes": {
                        "type": "array",
                        "items": {"oneOf": node_arms},
                    },
                    "edges": {
                        "type": "array",
                        "items": {"$ref": "#/definitions/edge"},
                    },
                    "memory": {
                        "type": "array",
                        "items": {"oneOf": memory_arms},
                    },
                    "start": {"$ref": "#/definitions/node_list"},
                    "end": {"$ref": "#/definitions/node_list"},
                },
            },
            "edge": {
                "type": "object",
                "required": ["from", "to"],
                "properties": {
                    "from": {"type": "string", "minLength": 1},
                    "to": {"type": "string", "minLength": 1},
                    "condition": {"$ref": "#/definitions/edge_condition"},
                    "trigger": {"type": "boolean", "default": true},
                    "carry_data": {"type": "boolean", "default": true},
                    "keep_message": {"type": "boolean", "default": false},
                    "description": {"type": "string"},
                },
            },
            "edge_condition": {
                "anyOf": [
                    {"const": true},
                    {"type": "string"},
                    {"oneOf": condition_arms},
                ],
            },
            "node_list": {
                "anyOf": [
                    {"type": "string"},
                    {"type": "array", "items": {"type": "string"}},
                ],
            },
            "provider_name": {
                "enum": registry.names(SchemaCategory::ModelProvider),
            },
            "thinking": {"oneOf": thinking_arms},
        },
    })
}

/// Validate a design document against the registry-composed schema.
///
/// Returns one rendered message per issue, with instance locations as
/// dotted paths (`graph.nodes[0].type`). When `set_defaults` is true,
/// schema defaults are filled into `data` in place before validating.
/// When a [`FunctionCatalog`] is given, function-typed edge conditions
/// must reference a cataloged name.
pub fn validate_design(
    data: &mut Value,
    registry: &SchemaRegistry,
    set_defaults: bool,
    fn_catalog: Option<&FunctionCatalog>,
) -> Vec<String> {
    let schema = compose_root_schema(registry);
    if set_defaults {
        apply_defaults(data, &schema, &schema);
    }

    let compiled = match JSONSchema::compile(&schema) {
        Ok(compiled) => compiled,
        Err(err) => return vec![format!("internal schema error: {err}")],
    };

    let mut issues = Vec::new();
    if let Err(errors) = compiled.validate(data) {
        for err in errors {
            let location = pointer_to_dotted(&err.instance_path.to_string());
            issues.push(format!("{location}: {err}"));
        }
    }

    if let Some(catalog) = fn_catalog {
        if let Some(graph) = data.get("graph") {
            issues.extend(catalog.unknown_references(graph));
        }
    }
    issues
}

/// Render a JSON pointer (`/graph/nodes/0/type`) as a dotted path
/// (`graph.nodes[0].type`). The empty pointer becomes `<root>`.
fn pointer_to_dotted(pointer: &str) -> String {
    if pointer.is_empty() {
        return "<root>".to_string();
    }
    let mut out = String::new();
    for segment in pointer.split('/').skip(1) {
        let segment = segment.replace("~1", "/").replace("~0", "~");
        if segment.bytes().all(|b| b.is_ascii_digit()) && !segment.is_empty() {
            out.push('[');
            out.push_str(&segment);
            out.push(']');
        } else {
            if !out.is_empty() {
                out.push('.');
            }
            out.push_str(&segment);
        }
    }
    out
}

/// Fill schema `default`s into `instance`, recursively.
///
/// Handles the subset of draft-07 the composed schema uses: local
/// `$ref`s into `#/definitions`, `properties`, array `items`, and
/// `oneOf` arms discriminated by a `type` const.
fn apply_defaults(instance: &mut Value, schema: &Value, root: &Value) {
    let schema = resolve_ref(schema, root);

    if let Some(arms) = schema.get("oneOf").and_then(Value::as_array) {
        if let Some(arm) = pick_arm(instance, arms, root) {
            apply_defaults(instance, arm, root);
        }
        return;
    }

    if let (Some(obj), Some(props)) = (
        instance.as_object_mut(),
        schema.get("properties").and_then(Value::as_object),
    ) {
        for (key, prop_schema) in props {
            let resolved = resolve_ref(prop_schema, root);
            if !obj.contains_key(key) {
                if let Some(default) = resolved.get("default") {
                    obj.insert(key.clone(), default.clone());
                    continue;
                }
            }
            if let Some(child) = obj.get_mut(key) {
                apply_defaults(child, resolved, root);
            }
        }
        return;
    }

    if let (Some(items), Some(item_schema)) =
        (instance.as_array_mut(), schema.get("items"))
    {
        for item in items {
            apply_defaults(item, item_schema, root);
        }
    }
}

fn resolve_ref<'a>(schema: &'a Value, root: &'a Value) -> &'a Value {
    let Some(reference) = schema.get("$ref").and_then(Value::as_str) else {
        return schema;
    };
    reference
        .strip_prefix("#/definitions/")
        .and_then(|name| root.get("definitions").and_then(|defs| defs.get(name)))
        .unwrap_or(schema)
}

fn pick_arm<'a>(instance: &Value, arms: &'a [Value], root: &'a Value) -> Option<&'a Value> {
    let type_name = instance.get("type").and_then(Value::as_str)?;
    arms.iter().map(|arm| resolve_ref(arm, root)).find(|arm| {
        arm.get("properties")
            .and_then(|p| p.get("type"))
            .and_then(|t| t.get("const"))
            .and_then(Value::as_str)
            == Some(type_name)
    })
}
