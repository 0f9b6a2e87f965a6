//! Graph structural analysis: terminal-node contract across nested
//! subgraphs.
//!
//! Works on the raw prepared mapping rather than the typed tree so
//! the save-time flow can run it before a full typed parse. A
//! workflow only executes cleanly when the runtime knows which node
//! is terminal; implicit termination is allowed only when it is
//! structurally unambiguous (exactly one natural sink).

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;

/// Check the terminal contract of every graph and nested subgraph.
///
/// Returns all issues found; empty means success. Majority-voting
/// graphs are exempt because their parallel branches converge via
/// voting rather than via a single terminal.
pub fn check_workflow_structure(data: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let Some(map) = data.as_object() else {
        return vec!["<root>.graph is required".to_string()];
    };
    let Some(graph) = map.get("graph") else {
        return vec!["<root>.graph is required".to_string()];
    };
    if !graph.is_object() {
        return vec!["<root>.graph must be object".to_string()];
    }
    analyze_graph(graph, "graph", &mut errors);
    errors
}

fn node_ids(graph: &Value) -> Vec<&str> {
    graph
        .get("nodes")
        .and_then(Value::as_array)
        .map(|nodes| {
            nodes
                .iter()
                .filter_map(|node| node.get("id").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

fn edge_list(graph: &Value) -> Vec<&Value> {
    graph
        .get("edges")
        .and_then(Value::as_array)
        .map(|edges| {
            edges
                .iter()
                // Edges missing endpoints are skipped defensively;
                // the schema pass reports them with better messages.
                .filter(|edge| {
                    edge.is_object() && edge.get("from").is_some() && edge.get("to").is_some()
                })
                .collect()
        })
        .unwrap_or_default()
}

fn analyze_graph(graph: &Value, base_path: &str, errors: &mut Vec<String>) {
    // Majority voting graphs skip start/end structure checks.
    if graph
        .get("is_majority_voting")
        .and_then(Value::as_bool)
        .unwrap_or(false)
    {
        return;
    }

    let nodes = node_ids(graph);
    let node_set: BTreeSet<&str> = nodes.iter().copied().collect();

    // Validate a declared end: string, list of strings, nothing else;
    // every listed ID must exist in this graph scope.
    let end = graph.get("end").filter(|v| !v.is_null());
    let end_declared = end.is_some();
    if let Some(end) = end {
        let end_list: Vec<&Value> = match end {
            Value::String(_) => vec![end],
            Value::Array(items) => items.iter().collect(),
            _ => {
                errors.push(format!(
                    "{base_path}.end must be a string or list of strings"
                ));
                return;
            }
        };
        for end_value in end_list {
            match end_value.as_str() {
                Some(end_id) if node_set.contains(end_id) => {}
                Some(end_id) => errors.push(format!(
                    "{base_path}.end references unknown node id '{end_id}'"
                )),
                None => errors.push(format!(
                    "{base_path}.end contains non-string element: {end_value}"
                )),
            }
        }
    }

    // In/out degrees within this graph scope only.
    let mut out_degree: BTreeMap<&str, usize> = nodes.iter().map(|id| (*id, 0)).collect();
    for edge in edge_list(graph) {
        if let Some(from) = edge.get("from").and_then(Value::as_str) {
            if let Some(count) = out_degree.get_mut(from) {
                *count += 1;
            }
        }
    }

    let sinks: Vec<&str> = nodes
        .iter()
        .copied()
        .filter(|id| out_degree.get(id).copied().unwrap_or(0) == 0)
        .collect();

    if sinks.len() != 1 && !end_declared {
        errors.push(format!(
            "{base_path}: graph lacks a unique natural end; specify 'end' explicitly"
        ));
    }

    // Recurse into subgraph nodes.
    let Some(node_list) = graph.get("nodes").and_then(Value::as_array) else {
        return;
    };
    for (i, node) in node_list.iter().enumerate() {
        if node.get("type").and_then(Value::as_str) != Some("subgraph") {
            continue;
        }
        let Some(config) = node.get("config").and_then(Value::as_object) else {
            errors.push(format!(
                "{base_path}.nodes[{i}].config must be object for subgraph nodes"
            ));
            continue;
        };
        match config.get("type").and_then(Value::as_str) {
            Some("config") => match config.get("config") {
                Some(inner) if inner.is_object() => {
                    let inner_path = format!("{base_path}.nodes[{i}].config.config");
                    analyze_graph(inner, &inner_path, errors);
                }
                _ => errors.push(format!(
                    "{base_path}.nodes[{i}].config.config must be object when type=config"
                )),
            },
            Some("file") => {
                let has_path = config
                    .get("config")
                    .and_then(Value::as_object)
                    .and_then(|inner| inner.get("path"))
                    .is_some_and(Value::is_string);
                if !has_path {
                    errors.push(format!(
                        "{base_path}.nodes[{i}].config.config.path must be string when type=file"
                    ));
                }
            }
            _ => errors.push(format!(
                "{base_path}.nodes[{i}].config.type must be 'config' or 'file'"
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn agent(id: &str) -> Value {
        json!({"id": id, "type": "agent", "config": {"provider": "echo"}})
    }

    #[test]
    fn single_natural_sink_needs_no_end() {
        let data = json!({"graph": {
            "nodes": [agent("a")],
            "edges": []
        }});
        assert!(check_workflow_structure(&data).is_empty());
    }

    #[test]
    fn cycle_without_end_is_flagged_once() {
        let data = json!({"graph": {
            "nodes": [agent("a"), agent("b")],
            "edges": [
                {"from": "a", "to": "b"},
                {"from": "b", "to": "a"}
            ]
        }});
        let errors = check_workflow_structure(&data);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("graph lacks a unique natural end"));
        assert!(errors[0].starts_with("graph"));
    }

    #[test]
    fn cycle_with_declared_end_passes() {
        let data = json!({"graph": {
            "end": "a",
            "nodes": [agent("a"), agent("b")],
            "edges": [
                {"from": "a", "to": "b"},
                {"from": "b", "to": "a"}
            ]
        }});
        assert!(check_workflow_structure(&data).is_empty());
    }

    #[test]
    fn multiple_sinks_require_end() {
        let data = json!({"graph": {
            "nodes": [agent("a"), agent("b"), agent("c")],
            "edges": [{"from": "a", "to": "b"}, {"from": "a", "to": "c"}]
        }});
        let errors = check_workflow_structure(&data);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("specify 'end' explicitly"));
    }

    #[test]
    fn majority_voting_graph_is_exempt() {
        let data = json!({"graph": {
            "is_majority_voting": true,
            "nodes": [agent("a"), agent("b")],
            "edges": []
        }});
        assert!(check_workflow_structure(&data).is_empty());
    }

    #[test]
    fn end_with_unknown_id_is_reported() {
        let data = json!({"graph": {
            "end": ["ghost"],
            "nodes": [agent("a")],
            "edges": []
        }});
        let errors = check_workflow_structure(&data);
        assert!(errors
            .iter()
            .any(|e| e == "graph.end references unknown node id 'ghost'"));
    }

    #[test]
    fn end_with_wrong_shape_is_reported() {
        let data = json!({"graph": {
            "end": {"node": "a"},
            "nodes": [agent("a")],
            "edges": []
        }});
        let errors = check_workflow_structure(&data);
        assert_eq!(
            errors,
            vec!["graph.end must be a string or list of strings".to_string()]
        );
    }

    #[test]
    fn nested_subgraph_is_recursed_into() {
        let data = json!({"graph": {
            "end": "a",
            "nodes": [{
                "id": "a",
                "type": "subgraph",
                "config": {"type": "config", "config": {
                    "nodes": [agent("x")],
                    "edges": []
                }}
            }],
            "edges": []
        }});
        assert!(check_workflow_structure(&data).is_empty());
    }

    #[test]
    fn broken_inner_subgraph_reports_nested_path() {
        let data = json!({"graph": {
            "end": "a",
            "nodes": [{
                "id": "a",
                "type": "subgraph",
                "config": {"type": "config", "config": {
                    "nodes": [agent("x"), agent("y")],
                    "edges": [
                        {"from": "x", "to": "y"},
                        {"from": "y", "to": "x"}
                    ]
                }}
            }],
            "edges": []
        }});
        let errors = check_workflow_structure(&data);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("graph.nodes[0].config.config:"));
    }

    #[test]
    fn file_subgraph_requires_string_path() {
        let data = json!({"graph": {
            "end": "a",
            "nodes": [{
                "id": "a",
                "type": "subgraph",
                "config": {"type": "file", "config": {"path": 42}}
            }],
            "edges": []
        }});
        let errors = check_workflow_structure(&data);
        assert_eq!(
            errors,
            vec![
                "graph.nodes[0].config.config.path must be string when type=file".to_string()
            ]
        );
    }

    #[test]
    fn unknown_subgraph_kind_is_reported() {
        let data = json!({"graph": {
            "end": "a",
            "nodes": [{
                "id": "a",
                "type": "subgraph",
                "config": {"type": "url", "config": {}}
            }],
            "edges": []
        }});
        let errors = check_workflow_structure(&data);
        assert_eq!(
            errors,
            vec!["graph.nodes[0].config.type must be 'config' or 'file'".to_string()]
        );
    }

    #[test]
    fn missing_graph_is_reported() {
        let errors = check_workflow_structure(&json!({"version": "1"}));
        assert_eq!(errors, vec!["<root>.graph is required".to_string()]);
    }
}
