//! CLI module for Shopfront
//!
//! Provides command-line interface for:
//! - serve: Run the customer API
//! - issue-token: Sign a bearer token for a customer

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{issue_token, load_config, run, run_command, serve};
pub use errors::{CliError, CliErrorCode, CliResult};
