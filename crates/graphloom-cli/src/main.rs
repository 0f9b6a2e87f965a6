//! Operator CLI for validating workflow designs.
//!
//! Two entry points: `validate-schema` mirrors the save-time pipeline
//! (schema then structure, exit codes 1 and 2), `validate-design`
//! runs only the typed parse and reports the first path-qualified
//! error.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use design_core::config::DesignConfig;
use design_core::{
    ensure_schema_registry_populated, schema_registry, DesignError, FunctionCatalog,
};

// Registrations are contributed at link time.
use workflow_nodes as _;

#[derive(Parser, Debug)]
#[command(name = "graphloom", version, about = "Graphloom workflow design tools")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Validate a design file: schema first, then workflow structure.
    ValidateSchema {
        /// Design YAML file.
        path: PathBuf,

        /// Skip JSON-schema validation, run only the structural pass.
        #[arg(long)]
        no_schema: bool,

        /// Manifest of extra edge function names, one per line.
        #[arg(long, value_name = "FILE")]
        fn_module: Option<PathBuf>,
    },

    /// Parse a design file into typed configuration and report the
    /// first error.
    ValidateDesign {
        /// Design YAML file.
        path: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().filter_or("LOG_LEVEL", "warn")).init();

    let cli = Cli::parse();
    match cli.command {
        Command::ValidateSchema {
            path,
            no_schema,
            fn_module,
        } => validate_schema(&path, no_schema, fn_module.as_deref()),
        Command::ValidateDesign { path } => validate_design(&path),
    }
}

fn validate_schema(
    path: &std::path::Path,
    no_schema: bool,
    fn_module: Option<&std::path::Path>,
) -> ExitCode {
    let registry = match bootstrap() {
        Ok(registry) => registry,
        Err(code) => return code,
    };

    let mut data = match design_core::reader::read_yaml(path) {
        Ok(data) => data,
        Err(err) => return fail(&err),
    };
    if !data.is_object() {
        return fail(&DesignError::RootNotMapping);
    }

    if !no_schema {
        let mut catalog = FunctionCatalog::with_builtins();
        if let Some(manifest) = fn_module {
            if let Err(err) = catalog.extend_from_manifest(manifest) {
                return fail(&err);
            }
        }
        let issues =
            design_core::schema::validate_design(&mut data, registry, true, Some(&catalog));
        if !issues.is_empty() {
            println!("Invalid schema:");
            for issue in &issues {
                println!("- {issue}");
            }
            return ExitCode::from(1);
        }
    }

    let issues = design_core::structure::check_workflow_structure(&data);
    if !issues.is_empty() {
        println!("Workflow issues:");
        for issue in &issues {
            println!("- {issue}");
        }
        return ExitCode::from(2);
    }

    println!("Workflow OK.");
    ExitCode::SUCCESS
}

fn validate_design(path: &std::path::Path) -> ExitCode {
    let registry = match bootstrap() {
        Ok(registry) => registry,
        Err(code) => return code,
    };

    let data = match design_core::reader::read_yaml(path) {
        Ok(data) => data,
        Err(err) => return fail(&err),
    };
    match DesignConfig::from_value(&data, registry) {
        Ok(_) => {
            println!("Design validation successful.");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(1)
        }
    }
}

fn bootstrap() -> Result<&'static design_core::SchemaRegistry, ExitCode> {
    ensure_schema_registry_populated().map_err(|err| fail(&err))?;
    schema_registry().map_err(|err| fail(&err))
}

fn fail(err: &dyn std::fmt::Display) -> ExitCode {
    eprintln!("{err}");
    ExitCode::from(1)
}
