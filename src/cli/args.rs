//! CLI argument definitions using clap
//!
//! Commands:
//! - archive-search serve --config <path> [--port <port>]
//! - archive-search explain --config <path> --target <target> --param key=value...

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;
use crate::query::SearchTarget;

/// Read-only search API over archived comments and submissions
#[derive(Parser, Debug)]
#[command(name = "archive-search")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./archive-search.json")]
        config: PathBuf,

        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print the backend query a search would send, without sending it
    Explain {
        /// Path to configuration file
        #[arg(long, default_value = "./archive-search.json")]
        config: PathBuf,

        /// comments or submissions
        #[arg(long, value_parser = parse_target, default_value = "comments")]
        target: SearchTarget,

        /// Search parameter as key=value (repeatable)
        #[arg(long = "param", value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

fn parse_target(value: &str) -> Result<SearchTarget, String> {
    SearchTarget::parse(value).ok_or_else(|| format!("unknown target {value:?}, expected comments or submissions"))
}

fn parse_param(value: &str) -> Result<(String, String), String> {
    value
        .split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {value:?}"))
}
