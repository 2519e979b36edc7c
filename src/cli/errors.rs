//! CLI-specific error types
//!
//! Every CLI error ends the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::auth::AuthError;
use crate::http_server::ConfigError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// Server failed to start or crashed
    BootFailed,
    /// Token could not be issued
    TokenError,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "SHOPFRONT_CLI_CONFIG_ERROR",
            Self::BootFailed => "SHOPFRONT_CLI_BOOT_FAILED",
            Self::TokenError => "SHOPFRONT_CLI_TOKEN_ERROR",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Config error
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ConfigError, msg)
    }

    /// Boot failed
    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::BootFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::boot_failed(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::config_error(e.to_string())
    }
}

impl From<AuthError> for CliError {
    fn from(e: AuthError) -> Self {
        Self::new(CliErrorCode::TokenError, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = CliError::config_error("auth.jwt_secret must not be empty");
        assert_eq!(
            err.to_string(),
            "SHOPFRONT_CLI_CONFIG_ERROR: auth.jwt_secret must not be empty"
        );
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_conversions() {
        let err: CliError = ConfigError::Invalid("bad".to_string()).into();
        assert_eq!(err.code_str(), "SHOPFRONT_CLI_CONFIG_ERROR");

        let err: CliError = AuthError::TokenGenerationFailed.into();
        assert_eq!(err.code_str(), "SHOPFRONT_CLI_TOKEN_ERROR");
    }
}
