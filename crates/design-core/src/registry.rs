//! Schema registry for design-document extension points.
//!
//! The registry maps a `(category, type name)` pair to a JSON-Schema
//! fragment describing the type's `config` payload, plus an optional
//! constructor that parses a validated payload into its typed form.
//! Adding a new node type to the system requires exactly one
//! registration and no changes to the validator or parser.
//!
//! The registry has a two-phase lifecycle: it is writable while the
//! bootstrap populates it, then frozen. Reads after the freeze are
//! safe from any thread.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::NodeConfig;
use crate::error::{ConfigError, RegistryError};

/// Extension-point categories. Each maps to exactly one runtime
/// extension point, so the set is closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaCategory {
    /// Workflow node types (`agent`, `subgraph`, ...).
    Node,
    /// Graph-level memory stores.
    MemoryStore,
    /// Edge condition types.
    EdgeCondition,
    /// LLM / embedding model providers.
    ModelProvider,
    /// Thinking strategies applied to agent nodes.
    Thinking,
}

impl fmt::Display for SchemaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Node => "node",
            Self::MemoryStore => "memory store",
            Self::EdgeCondition => "edge condition",
            Self::ModelProvider => "model provider",
            Self::Thinking => "thinking",
        };
        f.write_str(name)
    }
}

/// Constructor turning a validated `config` payload into a typed
/// [`NodeConfig`]. Receives the registry so nested graphs can resolve
/// their own node types, and the dotted path used for error reporting.
pub type ConfigConstructor =
    fn(&Value, &SchemaRegistry, &str) -> Result<NodeConfig, ConfigError>;

/// A single registered schema.
#[derive(Clone)]
pub struct SchemaSpec {
    /// Type name used as the discriminant in documents.
    pub name: String,
    /// One-line description surfaced in schema exports.
    pub summary: String,
    /// JSON-Schema fragment describing the `config` payload.
    pub schema: Value,
    /// Typed-parse constructor. `None` for metadata-only categories
    /// (model providers) and host types without a built-in variant.
    pub constructor: Option<ConfigConstructor>,
}

impl fmt::Debug for SchemaSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaSpec")
            .field("name", &self.name)
            .field("summary", &self.summary)
            .field("has_constructor", &self.constructor.is_some())
            .finish()
    }
}

/// Process-wide mapping from `(category, name)` to schema + constructor.
///
/// BTreeMap-backed so per-category iteration order is deterministic.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    categories: BTreeMap<SchemaCategory, BTreeMap<String, SchemaSpec>>,
    frozen: bool,
}

impl SchemaRegistry {
    /// Create a new empty, writable registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under the given category.
    ///
    /// Fails with [`RegistryError::Duplicate`] if `(category, name)`
    /// is already present, and [`RegistryError::Frozen`] after
    /// [`freeze`](Self::freeze).
    pub fn register(
        &mut self,
        category: SchemaCategory,
        spec: SchemaSpec,
    ) -> Result<(), RegistryError> {
        if self.frozen {
            return Err(RegistryError::Frozen);
        }
        let entries = self.categories.entry(category).or_default();
        if entries.contains_key(&spec.name) {
            return Err(RegistryError::Duplicate {
                category,
                name: spec.name.clone(),
            });
        }
        entries.insert(spec.name.clone(), spec);
        Ok(())
    }

    /// Flip the registry read-only. Further `register` calls fail.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Whether the registry has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Look up a registered schema.
    pub fn lookup(
        &self,
        category: SchemaCategory,
        name: &str,
    ) -> Result<&SchemaSpec, RegistryError> {
        self.categories
            .get(&category)
            .and_then(|entries| entries.get(name))
            .ok_or_else(|| RegistryError::UnknownType {
                category,
                name: name.to_string(),
            })
    }

    /// Whether `(category, name)` is registered.
    pub fn contains(&self, category: SchemaCategory, name: &str) -> bool {
        self.categories
            .get(&category)
            .is_some_and(|entries| entries.contains_key(name))
    }

    /// Iterate schemas in one category, in name order.
    pub fn iter_category(
        &self,
        category: SchemaCategory,
    ) -> impl Iterator<Item = (&str, &SchemaSpec)> {
        self.categories
            .get(&category)
            .into_iter()
            .flat_map(|entries| entries.iter().map(|(name, spec)| (name.as_str(), spec)))
    }

    /// Registered type names in one category, in name order.
    pub fn names(&self, category: SchemaCategory) -> Vec<String> {
        self.iter_category(category)
            .map(|(name, _)| name.to_string())
            .collect()
    }

    /// Node-category schemas keyed by type name.
    pub fn iter_node_schemas(&self) -> impl Iterator<Item = (&str, &SchemaSpec)> {
        self.iter_category(SchemaCategory::Node)
    }

    /// Memory-store schemas keyed by store type.
    pub fn iter_memory_store_schemas(&self) -> impl Iterator<Item = (&str, &SchemaSpec)> {
        self.iter_category(SchemaCategory::MemoryStore)
    }

    /// Edge-condition schemas keyed by condition type.
    pub fn iter_edge_condition_schemas(&self) -> impl Iterator<Item = (&str, &SchemaSpec)> {
        self.iter_category(SchemaCategory::EdgeCondition)
    }

    /// Model-provider schemas keyed by provider name.
    pub fn iter_model_provider_schemas(&self) -> impl Iterator<Item = (&str, &SchemaSpec)> {
        self.iter_category(SchemaCategory::ModelProvider)
    }

    /// Thinking-strategy schemas keyed by strategy name.
    pub fn iter_thinking_schemas(&self) -> impl Iterator<Item = (&str, &SchemaSpec)> {
        self.iter_category(SchemaCategory::Thinking)
    }
}
