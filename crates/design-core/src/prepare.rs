//! Design mapping preparation: variable overlay, `${NAME}`
//! placeholder resolution and legacy-shape normalization.
//!
//! Preparation is a textual pre-pass kept separate from schema
//! validation so the save-time flow can skip it entirely (placeholders
//! may intentionally refer to environment variables that are not yet
//! configured).

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::error::ConfigError;

/// Prepare a raw document for validation.
///
/// Applied in order: overlay `vars_override` into `vars`, resolve
/// `${NAME}` placeholders from `vars` then the process environment,
/// then normalize recognized legacy shapes into the canonical design
/// mapping. The input is never mutated; the result is a fresh tree.
pub fn prepare_design_mapping(
    raw: &Value,
    vars_override: &BTreeMap<String, Value>,
) -> Result<Value, ConfigError> {
    let map = raw
        .as_object()
        .ok_or_else(|| ConfigError::new("root", "expected mapping"))?;

    let mut prepared = map.clone();
    overlay_vars(&mut prepared, vars_override);

    let vars = prepared
        .get("vars")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    // The root vars block itself stays verbatim; everything below it
    // is fair game, including nested keys that happen to be named
    // "vars".
    for (key, item) in prepared.iter_mut() {
        if key == "vars" {
            continue;
        }
        resolve_placeholders(item, &vars);
    }

    let mut root = Value::Object(prepared);
    normalize_legacy(&mut root);
    Ok(root)
}

/// Merge caller-supplied variables into `vars`, replacing on key
/// collision.
pub fn overlay_vars(map: &mut Map<String, Value>, vars_override: &BTreeMap<String, Value>) {
    if vars_override.is_empty() {
        return;
    }
    let mut vars = map
        .get("vars")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();
    for (key, value) in vars_override {
        vars.insert(key.clone(), value.clone());
    }
    map.insert("vars".to_string(), Value::Object(vars));
}

fn resolve_placeholders(value: &mut Value, vars: &Map<String, Value>) {
    match value {
        Value::String(s) => {
            if s.contains('$') {
                *s = substitute(s, vars);
            }
        }
        Value::Array(items) => {
            for item in items {
                resolve_placeholders(item, vars);
            }
        }
        Value::Object(map) => {
            for item in map.values_mut() {
                resolve_placeholders(item, vars);
            }
        }
        _ => {}
    }
}

/// Substitute `${NAME}` occurrences in one string scalar.
///
/// Resolution order: document `vars` first, then the process
/// environment. Unresolved tokens stay textually intact. `$${NAME}`
/// escapes to a literal `${NAME}`.
fn substitute(input: &str, vars: &Map<String, Value>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        if let Some(stripped) = tail.strip_prefix("$${") {
            // Escaped: emit a literal `${...}` without resolving.
            match stripped.find('}') {
                Some(end) => {
                    out.push_str("${");
                    out.push_str(&stripped[..=end]);
                    rest = &stripped[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    return out;
                }
            }
        } else if let Some(stripped) = tail.strip_prefix("${") {
            match stripped.find('}') {
                Some(end) => {
                    let name = &stripped[..end];
                    match resolve_name(name, vars) {
                        Some(replacement) => out.push_str(&replacement),
                        None => {
                            out.push_str("${");
                            out.push_str(name);
                            out.push('}');
                        }
                    }
                    rest = &stripped[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    return out;
                }
            }
        } else {
            out.push('$');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    out
}

fn resolve_name(name: &str, vars: &Map<String, Value>) -> Option<String> {
    if name.is_empty() {
        return None;
    }
    if let Some(value) = vars.get(name) {
        return Some(match value {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
    }
    std::env::var(name).ok()
}

/// Rewrite recognized legacy shapes into the canonical design
/// mapping: a flat top-level `nodes` list is promoted into
/// `graph.nodes`, and a stray top-level `edges` key moves into
/// `graph.edges`.
fn normalize_legacy(root: &mut Value) {
    let Some(map) = root.as_object_mut() else {
        return;
    };

    let top_nodes = match map.get("nodes") {
        Some(Value::Array(_)) => map.remove("nodes"),
        _ => None,
    };
    let top_edges = match map.get("edges") {
        Some(Value::Array(_)) => map.remove("edges"),
        _ => None,
    };
    if top_nodes.is_none() && top_edges.is_none() {
        return;
    }

    let graph = map
        .entry("graph".to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    let Some(graph_map) = graph.as_object_mut() else {
        return;
    };
    if let Some(nodes) = top_nodes {
        graph_map.entry("nodes".to_string()).or_insert(nodes);
    }
    if let Some(edges) = top_edges {
        graph_map.entry("edges".to_string()).or_insert(edges);
    }
}
