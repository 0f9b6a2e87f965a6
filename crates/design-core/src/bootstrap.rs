//! One-time population of the process-wide schema registry.
//!
//! Built-in types register themselves at link time through
//! `inventory::submit!(SchemaRegistration { ... })` (the provider
//! crate is `workflow-nodes`). The first successful call to
//! [`ensure_schema_registry_populated`] drains those submissions into
//! a fresh registry, freezes it, and publishes it for the rest of the
//! process. Both the server bootstrap and the CLI loader call this,
//! so it must be idempotent.

use std::sync::Mutex;

use once_cell::sync::OnceCell;
use serde_json::Value;

use crate::error::RegistryError;
use crate::registry::{ConfigConstructor, SchemaCategory, SchemaRegistry, SchemaSpec};

/// A link-time schema registration.
///
/// The schema fragment is produced lazily so submissions stay
/// `const`-constructible.
pub struct SchemaRegistration {
    pub category: SchemaCategory,
    pub name: &'static str,
    pub summary: &'static str,
    pub schema: fn() -> Value,
    pub constructor: Option<ConfigConstructor>,
}

inventory::collect!(SchemaRegistration);

static REGISTRY: OnceCell<SchemaRegistry> = OnceCell::new();
static BOOTSTRAP_LOCK: Mutex<()> = Mutex::new(());

/// Populate the process-wide schema registry exactly once.
///
/// Subsequent calls are no-ops. A failed population publishes
/// nothing, so a later call retries from scratch.
pub fn ensure_schema_registry_populated() -> Result<(), RegistryError> {
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    // Serialize concurrent first calls so only one population runs.
    let _guard = BOOTSTRAP_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    if REGISTRY.get().is_some() {
        return Ok(());
    }

    let registry = populate_from_inventory()?;
    log::debug!(
        "schema registry populated: {} node types, {} memory stores, {} edge conditions",
        registry.names(SchemaCategory::Node).len(),
        registry.names(SchemaCategory::MemoryStore).len(),
        registry.names(SchemaCategory::EdgeCondition).len(),
    );
    let _ = REGISTRY.set(registry);
    Ok(())
}

/// Access the populated registry.
///
/// Fails with [`RegistryError::NotBootstrapped`] before the first
/// successful [`ensure_schema_registry_populated`] call.
pub fn schema_registry() -> Result<&'static SchemaRegistry, RegistryError> {
    REGISTRY.get().ok_or(RegistryError::NotBootstrapped)
}

/// Build a frozen registry from the link-time submissions.
///
/// Exposed so hosts and tests can assemble a registry without
/// touching the process-wide one.
pub fn populate_from_inventory() -> Result<SchemaRegistry, RegistryError> {
    let mut registry = SchemaRegistry::new();
    let mut count = 0usize;
    for registration in inventory::iter::<SchemaRegistration> {
        registry.register(
            registration.category,
            SchemaSpec {
                name: registration.name.to_string(),
                summary: registration.summary.to_string(),
                schema: (registration.schema)(),
                constructor: registration.constructor,
            },
        )?;
        count += 1;
    }
    if count == 0 {
        return Err(RegistryError::EmptyBootstrap);
    }
    registry.freeze();
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    // This crate submits no registrations of its own; the built-ins
    // live in the workflow-nodes crate. With an empty inventory the
    // bootstrap must fail and leave the global registry unset so a
    // later call can retry.
    #[test]
    fn empty_inventory_fails_and_allows_retry() {
        assert_eq!(
            ensure_schema_registry_populated().unwrap_err(),
            RegistryError::EmptyBootstrap
        );
        assert_eq!(
            schema_registry().unwrap_err(),
            RegistryError::NotBootstrapped
        );
        // Retry reaches the same state rather than poisoning anything.
        assert_eq!(
            ensure_schema_registry_populated().unwrap_err(),
            RegistryError::EmptyBootstrap
        );
    }
}
