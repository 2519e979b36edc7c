//! CLI command implementations

use std::path::Path;

use crate::auth::{JwtManager, TokenResponse};
use crate::http_server::{HttpServer, ServerConfig};
use crate::logging::{self, LogFormat};

use super::args::Command;
use super::errors::{CliError, CliResult};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config, port } => serve(config.as_deref(), port),
        Command::IssueToken {
            customer_id,
            email,
            config,
        } => {
            let token = issue_token(config.as_deref(), customer_id, &email)?;
            println!("{}", token.access_token);
            Ok(())
        }
    }
}

/// Load the config file, or defaults plus environment when none is given
pub fn load_config(path: Option<&Path>) -> CliResult<ServerConfig> {
    let config = match path {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::from_env()?,
    };
    Ok(config)
}

/// Start the HTTP server and block until it stops
pub fn serve(config_path: Option<&Path>, port: Option<u16>) -> CliResult<()> {
    let mut config = load_config(config_path)?;
    if let Some(port) = port {
        config.port = port;
    }

    let format = LogFormat::parse(&config.log_format)
        .ok_or_else(|| CliError::config_error(format!("Invalid log_format: '{}'", config.log_format)))?;
    logging::init(&config.log_level, format);

    tracing::info!(
        addr = %config.socket_addr(),
        token_ttl_hours = config.auth.token_ttl_hours,
        "starting shopfront"
    );

    let server = HttpServer::with_config(config);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Sign a token the running server would accept
pub fn issue_token(
    config_path: Option<&Path>,
    customer_id: i64,
    email: &str,
) -> CliResult<TokenResponse> {
    if customer_id < 1 {
        return Err(CliError::config_error("customer id should not be less than 1"));
    }

    let config = load_config(config_path)?;
    let manager = JwtManager::new(config.jwt_config());
    let token = manager.generate_access_token(customer_id, email)?;
    Ok(TokenResponse::bearer(token, manager.ttl_seconds()))
}
