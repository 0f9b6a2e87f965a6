//! Built-in node type registrations.

pub mod agent;
pub mod human;
pub mod loop_timer;
pub mod python_runner;
pub mod subgraph;
