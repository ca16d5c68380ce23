//! # Logging
//!
//! `tracing` subscriber setup for the binary. `RUST_LOG` wins over any
//! configured filter.

use clap::ValueEnum;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Default directive for a `-v` count
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn,archive_search=info,tower_http=info",
        1 => "info,archive_search=debug,tower_http=debug",
        2 => "debug,archive_search=trace",
        _ => "trace",
    }
}

/// Pick the effective filter directive: `RUST_LOG`, then `configured`, then
/// `fallback`.
fn env_filter(configured: Option<&str>, fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| match configured {
            Some(directive) => EnvFilter::try_new(directive),
            None => EnvFilter::try_new(fallback),
        })
        .unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Install the global subscriber, writing to stderr.
pub fn init(format: LogFormat, configured: Option<&str>, fallback: &str) -> Result<(), TryInitError> {
    let filter = env_filter(configured, fallback);

    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    }
}
