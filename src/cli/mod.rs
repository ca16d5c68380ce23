//! CLI module for archive-search
//!
//! Provides command-line interface for:
//! - serve: Load configuration and run the HTTP server
//! - explain: Show the compiled backend query for a set of parameters

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, explain_document, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
