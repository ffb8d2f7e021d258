//! CLI module for search-filter
//!
//! Provides command-line interface for:
//! - serve: Run the HTTP API
//! - render: One-shot render of a query read from stdin
//! - check-config: Validate and print the configuration

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{build_service, check_config, open_repository, render, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_query, read_query_from, write_json, write_json_to};
