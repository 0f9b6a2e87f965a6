//! Design Core - Workflow design loading and validation for Graphloom
//!
//! This crate turns YAML workflow designs into validated, typed
//! configuration. It provides:
//!
//! - A frozen schema registry populated from link-time registrations
//! - Variable overlay and `${NAME}` placeholder resolution
//! - Registry-composed JSON-schema validation with dotted-path errors
//! - A typed, immutable [`config::DesignConfig`] tree
//! - Structural analysis (reachable unique end, subgraph recursion)
//! - MVP constraint checks with migration hints
//!
//! # Architecture
//!
//! Node types, memory stores, edge conditions, model providers and
//! thinking strategies are contributed by provider crates through
//! [`inventory`] submissions; linking such a crate is enough to make
//! its types loadable. [`loader::load_config`] is the front door:
//!
//! ```ignore
//! use design_core::loader::{load_config, LoadOptions};
//!
//! let config = load_config("design.yaml", &LoadOptions::default())?;
//! println!("{} nodes", config.graph.nodes.len());
//! ```

pub mod bootstrap;
pub mod catalog;
pub mod config;
pub mod constraints;
pub mod error;
pub mod loader;
pub mod prepare;
pub mod reader;
pub mod registry;
pub mod schema;
pub mod structure;

// Re-export key types
pub use bootstrap::{ensure_schema_registry_populated, schema_registry, SchemaRegistration};
pub use catalog::{EdgeFnRegistration, FunctionCatalog};
pub use config::{DesignConfig, GraphDefinition, Node, NodeConfig};
pub use error::{ConfigError, DesignError, RegistryError};
pub use loader::{check_config, load_config, LoadOptions};
pub use registry::{SchemaCategory, SchemaRegistry, SchemaSpec};
