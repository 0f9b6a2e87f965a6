//! Loading facade: file to validated [`DesignConfig`] in one call.
//!
//! `load_config` is the edit-time entry point (placeholders resolved,
//! defaults filled); `check_config` is the save-time probe that skips
//! preparation and reports the first failing stage as a message block.

use std::collections::BTreeMap;
use std::path::Path;

use log::debug;
use serde_json::Value;

use crate::bootstrap::{ensure_schema_registry_populated, schema_registry};
use crate::catalog::FunctionCatalog;
use crate::config::DesignConfig;
use crate::constraints::ensure_supported;
use crate::error::{render_bullets, DesignError, Result};
use crate::prepare::prepare_design_mapping;
use crate::reader::{parse_yaml, read_yaml};
use crate::registry::SchemaRegistry;
use crate::schema::validate_design;
use crate::structure::check_workflow_structure;

/// Knobs for [`load_config`].
pub struct LoadOptions {
    /// Catalog used to validate function-typed edge conditions; `None`
    /// skips the check.
    pub fn_catalog: Option<FunctionCatalog>,
    /// Fill schema defaults into the document before parsing.
    pub set_defaults: bool,
    /// Variables overlaid onto the document's `vars` before
    /// placeholder resolution.
    pub vars_override: BTreeMap<String, Value>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            fn_catalog: None,
            set_defaults: true,
            vars_override: BTreeMap::new(),
        }
    }
}

/// Load, prepare and fully validate a design file.
pub fn load_config(path: impl AsRef<Path>, options: &LoadOptions) -> Result<DesignConfig> {
    ensure_schema_registry_populated()?;
    load_config_with(path, schema_registry()?, options)
}

/// [`load_config`] against an explicit registry.
pub fn load_config_with(
    path: impl AsRef<Path>,
    registry: &SchemaRegistry,
    options: &LoadOptions,
) -> Result<DesignConfig> {
    let path = path.as_ref();
    let raw = read_yaml(path)?;
    if !raw.is_object() {
        return Err(DesignError::RootNotMapping);
    }
    let mut data = prepare_design_mapping(&raw, &options.vars_override)?;

    let issues = validate_design(
        &mut data,
        registry,
        options.set_defaults,
        options.fn_catalog.as_ref(),
    );
    if !issues.is_empty() {
        return Err(DesignError::Schema {
            source_path: path.display().to_string(),
            rendered: render_bullets(&issues),
        });
    }

    let config = DesignConfig::from_value(&data, registry)?;

    let issues = check_workflow_structure(&data);
    if !issues.is_empty() {
        return Err(DesignError::Structure {
            source_path: path.display().to_string(),
            rendered: render_bullets(&issues),
        });
    }

    if let Some(graph) = data.get("graph") {
        ensure_supported(graph, registry)?;
    }

    debug!(
        "loaded design {} ({} nodes, {} edges)",
        path.display(),
        config.graph.nodes.len(),
        config.graph.edges.len()
    );
    Ok(config)
}

/// Save-time check of raw YAML content.
///
/// Runs schema, structural and constraint checks without placeholder
/// resolution or defaults, and returns the first failing stage as a
/// message block. An empty string means the content is acceptable.
pub fn check_config(content: &str) -> Result<String> {
    ensure_schema_registry_populated()?;
    check_config_with(content, schema_registry()?)
}

/// [`check_config`] against an explicit registry.
pub fn check_config_with(content: &str, registry: &SchemaRegistry) -> Result<String> {
    let raw = match parse_yaml(content) {
        Ok(raw) => raw,
        Err(err) => return Ok(err.to_string()),
    };
    if !raw.is_object() {
        return Ok(DesignError::RootNotMapping.to_string());
    }

    let mut data = raw;
    let issues = validate_design(&mut data, registry, false, None);
    if !issues.is_empty() {
        return Ok(format!("Schema issues:\n{}", render_bullets(&issues)));
    }

    let issues = check_workflow_structure(&data);
    if !issues.is_empty() {
        return Ok(format!("Workflow issues:\n{}", render_bullets(&issues)));
    }

    if let Some(graph) = data.get("graph") {
        if let Err(err) = ensure_supported(graph, registry) {
            return Ok(err.to_string());
        }
    }
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_support::test_registry;
    use std::io::Write;

    fn write_design(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const VALID: &str = r#"
version: "1.0.0"
graph:
  nodes:
    - id: greeter
      type: agent
      config:
        provider: echo
        prompt: "Say hello."
"#;

    #[test]
    fn valid_design_loads() {
        let file = write_design(VALID);
        let registry = test_registry();
        let config = load_config_with(file.path(), &registry, &LoadOptions::default()).unwrap();
        assert_eq!(config.version, "1.0.0");
        assert_eq!(config.graph.nodes.len(), 1);
        assert_eq!(config.graph.nodes[0].id, "greeter");
    }

    #[test]
    fn missing_file_is_not_found() {
        let registry = test_registry();
        let err =
            load_config_with("/no/such/design.yaml", &registry, &LoadOptions::default())
                .unwrap_err();
        assert!(err.to_string().contains("Design file not found"));
    }

    #[test]
    fn scalar_root_is_rejected() {
        let file = write_design("just a string\n");
        let registry = test_registry();
        let err = load_config_with(file.path(), &registry, &LoadOptions::default()).unwrap_err();
        assert_eq!(err.to_string(), "YAML root must be a mapping");
    }

    #[test]
    fn schema_violation_renders_bulleted_block() {
        let file = write_design("graph:\n  nodes:\n    - id: a\n      type: human\n");
        let registry = test_registry();
        let err = load_config_with(file.path(), &registry, &LoadOptions::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Invalid schema in "), "got {msg}");
        assert!(msg.contains("- graph.nodes[0]"));
    }

    #[test]
    fn cycle_without_declared_end_fails_structurally() {
        let file = write_design(
            r#"
graph:
  nodes:
    - id: a
      type: human
      config: {}
    - id: b
      type: human
      config: {}
  edges:
    - from: a
      to: b
    - from: b
      to: a
"#,
        );
        let registry = test_registry();
        let err = load_config_with(file.path(), &registry, &LoadOptions::default()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.starts_with("Workflow issues in "), "got {msg}");
        assert!(msg.contains("lacks a unique natural end"));
    }

    #[test]
    fn deprecated_agent_memory_key_fails_load() {
        let file = write_design(
            r#"
graph:
  nodes:
    - id: coder
      type: agent
      config:
        provider: echo
        memory:
          kind: simple
"#,
        );
        let registry = test_registry();
        let err = load_config_with(file.path(), &registry, &LoadOptions::default()).unwrap_err();
        assert!(err.to_string().contains("'memory' is deprecated"));
    }

    #[test]
    fn vars_override_wins_over_document_vars() {
        let file = write_design(
            r#"
vars:
  MODEL: gpt-4o-mini
graph:
  nodes:
    - id: a
      type: agent
      config:
        provider: echo
        model: "${MODEL}"
"#,
        );
        let registry = test_registry();
        let mut options = LoadOptions::default();
        options
            .vars_override
            .insert("MODEL".to_string(), serde_json::json!("sonnet"));
        let config = load_config_with(file.path(), &registry, &options).unwrap();
        let agent = config.graph.nodes[0].as_agent().unwrap();
        assert_eq!(agent.model.as_deref(), Some("sonnet"));
    }

    #[test]
    fn check_config_reports_first_failing_stage() {
        let registry = test_registry();
        let msg = check_config_with("graph:\n  nodes: 5\n", &registry).unwrap();
        assert!(msg.starts_with("Schema issues:"), "got {msg}");

        let msg = check_config_with(VALID, &registry).unwrap();
        assert_eq!(msg, "");
    }

    #[test]
    fn check_config_skips_placeholder_resolution() {
        // Unresolved placeholders must not fail the save-time check.
        let registry = test_registry();
        let msg = check_config_with(
            r#"
graph:
  nodes:
    - id: a
      type: agent
      config:
        provider: echo
        model: "${UNSET_MODEL_VAR}"
"#,
            &registry,
        )
        .unwrap();
        assert_eq!(msg, "");
    }
}
