//! CLI command implementations

use std::path::Path;
use std::sync::Arc;

use serde_json::{json, Value};

use crate::backend::HttpTransport;
use crate::config::ServiceConfig;
use crate::http_server::HttpServer;
use crate::logging::{self, LogFormat};
use crate::params::{normalize, Normalized, RawParams};
use crate::query::{compile, SearchTarget};
use crate::service::AppContext;

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::write_json;

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command, cli.verbose, cli.log_format)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command, verbose: u8, log_format: LogFormat) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(&config, port, verbose, log_format),
        Command::Explain {
            config,
            target,
            params,
        } => explain(&config, target, params),
    }
}

/// Load configuration, wire the collaborators and serve until stopped.
pub fn serve(config_path: &Path, port: Option<u16>, verbose: u8, log_format: LogFormat) -> CliResult<()> {
    let mut config = ServiceConfig::load(config_path)?;
    if let Some(port) = port {
        config.server.port = port;
    }

    logging::init(log_format, config.log_filter.as_deref(), logging::default_filter(verbose))
        .map_err(|e| CliError::boot_failed(format!("Failed to initialize logging: {}", e)))?;

    // The blocking client must be created, and finally dropped, outside the
    // async runtime.
    let transport = Arc::new(
        HttpTransport::new()
            .map_err(|e| CliError::boot_failed(format!("Failed to build HTTP client: {}", e)))?,
    );
    let ctx = Arc::new(AppContext::from_config(&config, transport.clone()));

    tracing::info!(
        primary = %config.search.primary_url,
        secondary = %config.search.secondary_url,
        archive = %config.relational.path.display(),
        "starting archive search"
    );

    let server = HttpServer::new(config.server.clone(), ctx);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    let result = rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    });

    drop(rt);
    drop(transport);
    result
}

/// Print the query document a search would send, plus any dropped
/// parameters, without touching the network.
pub fn explain(config_path: &Path, target: SearchTarget, params: Vec<(String, String)>) -> CliResult<()> {
    let config = ServiceConfig::load(config_path)?;
    let raw = RawParams::from_pairs(params);

    let mut output = explain_document(&raw, target, chrono::Utc::now().timestamp());
    let endpoints = config.search.endpoints();
    output["endpoints"] = json!([endpoints.primary_url(target), endpoints.secondary_url(target)]);

    write_json(&output)
}

/// The explain output for `raw` against `target`, relative to `now`.
pub fn explain_document(raw: &RawParams, target: SearchTarget, now: i64) -> Value {
    let Normalized { params, issues } = normalize(raw, now);
    let issues: Vec<String> = issues.iter().map(ToString::to_string).collect();

    if params.is_id_lookup() {
        return json!({
            "target": target.as_str(),
            "ids": params.ids,
            "issues": issues,
        });
    }

    json!({
        "target": target.as_str(),
        "query": compile(&params, target).to_json(),
        "issues": issues,
    })
}
