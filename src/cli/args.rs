//! CLI argument definitions using clap
//!
//! Commands:
//! - shopfront serve [--config <path>] [--port <port>]
//! - shopfront issue-token --customer-id <id> --email <email> [--config <path>]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Shopfront - customer account API
#[derive(Parser, Debug)]
#[command(name = "shopfront")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve {
        /// Path to configuration file; defaults plus environment when omitted
        #[arg(long)]
        config: Option<PathBuf>,

        /// Port to listen on, overriding config and PORT
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a bearer token for a customer, for manual testing
    IssueToken {
        #[arg(long)]
        customer_id: i64,

        #[arg(long)]
        email: String,

        /// Path to configuration file
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
