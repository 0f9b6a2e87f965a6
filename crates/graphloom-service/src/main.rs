//! HTTP boundary for design checking and loading.
//!
//! The registry is populated once at startup; request handlers then
//! call the loading facade directly. Listening address comes from
//! `GRAPHLOOM_HOST` / `GRAPHLOOM_PORT`, logging from `LOG_LEVEL`.

use std::collections::BTreeMap;
use std::net::SocketAddr;

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};

use design_core::loader::{check_config, load_config, LoadOptions};
use design_core::registry::SchemaCategory;
use design_core::{ensure_schema_registry_populated, schema_registry, FunctionCatalog};

// Registrations are contributed at link time.
use workflow_nodes as _;

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(
        env_logger::Env::default()
            .filter_or("LOG_LEVEL", "info")
            .write_style("LOG_STYLE"),
    )
    .init();

    if let Err(err) = ensure_schema_registry_populated() {
        log::error!("schema registry bootstrap failed: {err}");
        std::process::exit(1);
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_handler))
        .route("/api/schemas", get(schemas_handler))
        .route("/api/designs/check", post(check_handler))
        .route("/api/designs/load", post(load_handler))
        .layer(cors);

    let host = std::env::var("GRAPHLOOM_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port = std::env::var("GRAPHLOOM_PORT").unwrap_or_else(|_| "8940".to_string());
    let addr: SocketAddr = match format!("{host}:{port}").parse() {
        Ok(addr) => addr,
        Err(err) => {
            log::error!("invalid listen address {host}:{port}: {err}");
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            log::error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };
    log::info!("graphloom service listening on http://{addr}");

    if let Err(err) = axum::serve(listener, app).await {
        log::error!("server error: {err}");
        std::process::exit(1);
    }
}

async fn health_handler() -> &'static str {
    "ok"
}

/// Registered type names per category, for editor pickers.
async fn schemas_handler() -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let registry = schema_registry().map_err(internal)?;
    let by_category = |category: SchemaCategory| -> Vec<Value> {
        registry
            .iter_category(category)
            .map(|(name, spec)| {
                json!({"name": name, "summary": spec.summary, "schema": spec.schema})
            })
            .collect()
    };
    Ok(Json(json!({
        "nodes": by_category(SchemaCategory::Node),
        "memory_stores": by_category(SchemaCategory::MemoryStore),
        "edge_conditions": by_category(SchemaCategory::EdgeCondition),
        "model_providers": by_category(SchemaCategory::ModelProvider),
        "thinking": by_category(SchemaCategory::Thinking),
    })))
}

#[derive(Deserialize)]
struct CheckRequest {
    content: String,
}

/// Save-time probe: `{ok, message}` with an empty message when the
/// content is acceptable.
async fn check_handler(
    Json(request): Json<CheckRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let message = check_config(&request.content).map_err(internal)?;
    Ok(Json(json!({"ok": message.is_empty(), "message": message})))
}

#[derive(Deserialize)]
struct LoadRequest {
    path: String,
    #[serde(default)]
    vars: BTreeMap<String, Value>,
    #[serde(default)]
    check_functions: bool,
}

/// Full load of a design file on the service host.
async fn load_handler(
    Json(request): Json<LoadRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut options = LoadOptions {
        vars_override: request.vars,
        ..LoadOptions::default()
    };
    if request.check_functions {
        options.fn_catalog = Some(FunctionCatalog::with_builtins());
    }
    match load_config(&request.path, &options) {
        Ok(config) => Ok(Json(json!({"design": config}))),
        Err(err) => Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({"error": err.to_string()})),
        )),
    }
}

fn internal(err: impl std::fmt::Display) -> (StatusCode, Json<Value>) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({"error": err.to_string()})),
    )
}
