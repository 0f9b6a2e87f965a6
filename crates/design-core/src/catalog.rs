//! Catalog of edge predicate functions referenced by
//! function-typed edge conditions.
//!
//! Builtins register themselves at link time through [`inventory`];
//! the CLI can widen the catalog from a manifest file listing extra
//! names the deployment environment provides.

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::DesignError;

/// Link-time registration of a builtin edge predicate.
pub struct EdgeFnRegistration {
    pub name: &'static str,
    pub summary: &'static str,
}

inventory::collect!(EdgeFnRegistration);

/// Known edge predicate names, used to validate `condition.function`
/// references before a design is accepted.
#[derive(Debug, Clone, Default)]
pub struct FunctionCatalog {
    names: BTreeSet<String>,
}

impl FunctionCatalog {
    /// Catalog seeded with every builtin registered via inventory.
    pub fn with_builtins() -> Self {
        let mut catalog = Self::default();
        for reg in inventory::iter::<EdgeFnRegistration> {
            catalog.names.insert(reg.name.to_string());
        }
        catalog
    }

    pub fn insert(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Merge names from a manifest file.
    ///
    /// The manifest is one function name per line; blank lines and
    /// `#` comments are ignored.
    pub fn extend_from_manifest(&mut self, path: &Path) -> Result<(), DesignError> {
        let text = fs::read_to_string(path).map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                DesignError::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                DesignError::Yaml(format!("failed to read {}: {err}", path.display()))
            }
        })?;
        for line in text.lines() {
            let name = line.trim();
            if name.is_empty() || name.starts_with('#') {
                continue;
            }
            self.names.insert(name.to_string());
        }
        Ok(())
    }

    /// Collect function-condition references in `graph` that the
    /// catalog does not know, as dotted paths with the missing name.
    ///
    /// Recurses into inline subgraphs.
    pub fn unknown_references(&self, graph: &Value) -> Vec<String> {
        let mut found = Vec::new();
        self.scan_graph(graph, "graph", &mut found);
        found
    }

    fn scan_graph(&self, graph: &Value, base_path: &str, found: &mut Vec<String>) {
        if let Some(edges) = graph.get("edges").and_then(Value::as_array) {
            for (i, edge) in edges.iter().enumerate() {
                let Some(cond) = edge.get("condition") else {
                    continue;
                };
                if cond.get("type").and_then(Value::as_str) != Some("function") {
                    continue;
                }
                let Some(name) = cond.get("name").and_then(Value::as_str) else {
                    continue;
                };
                if !self.contains(name) {
                    found.push(format!(
                        "{base_path}.edges[{i}].condition.name: unknown edge function '{name}'"
                    ));
                }
            }
        }
        if let Some(nodes) = graph.get("nodes").and_then(Value::as_array) {
            for (i, node) in nodes.iter().enumerate() {
                if node.get("type").and_then(Value::as_str) != Some("subgraph") {
                    continue;
                }
                let inline = node
                    .get("config")
                    .filter(|c| c.get("type").and_then(Value::as_str) == Some("config"))
                    .and_then(|c| c.get("config"));
                if let Some(inner) = inline {
                    let inner_path = format!("{base_path}.nodes[{i}].config.config");
                    self.scan_graph(inner, &inner_path, found);
                }
            }
        }
    }
}
