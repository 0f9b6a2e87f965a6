//! Built-in registrations for Graphloom workflow designs
//!
//! Linking this crate contributes the stock node types, memory
//! stores, edge conditions, model providers and thinking strategies
//! to [`design_core`]'s schema registry, plus the built-in edge
//! predicate functions. No call is needed: each module carries an
//! `inventory::submit!` that the bootstrap drains.
//!
//! Registered node types: `agent`, `human`, `subgraph`,
//! `python_runner`, `loop_timer`.

pub mod condition;
pub mod functions;
pub mod memory;
pub mod node;
pub mod provider;
pub mod thinking;
