//! Immutable typed configuration tree for design documents.
//!
//! Mirrors the canonical document shape: a [`DesignConfig`] root
//! holding a [`GraphDefinition`] of [`Node`]s and [`EdgeConfig`]s.
//! Parsing is path-aware: every failure is a
//! [`ConfigError`](crate::error::ConfigError) whose path navigates
//! the raw mapping to the offending subtree.

pub mod base;
pub mod edge;
pub mod export;
pub mod graph;
pub mod node;

pub use edge::{EdgeCondition, EdgeConfig};
pub use graph::{DesignConfig, GraphDefinition, MemoryStoreConfig};
pub use node::{
    agent_constructor, human_constructor, loop_timer_constructor, python_runner_constructor,
    subgraph_constructor, AgentConfig, HumanConfig, LoopTimerConfig, MemoryAttachment, Node,
    NodeConfig, PythonRunnerConfig, SubgraphConfig, ThinkingConfig,
};
