//! HTTP Server Configuration
//!
//! Host, port, CORS, logging and token settings. Loaded from a JSON file
//! where every key is optional; `JWT_KEY` and `PORT` in the environment
//! override the file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::JwtConfig;

/// Longest accepted token lifetime (one year)
pub const MAX_TOKEN_TTL_HOURS: i64 = 24 * 365;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 5000)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Default log filter when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// "text" or "json" (default: "text")
    #[serde(default = "default_log_format")]
    pub log_format: String,

    #[serde(default)]
    pub auth: AuthSettings,
}

/// Token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSettings {
    /// HS256 signing secret
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime in hours (default: 24)
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,

    #[serde(default = "default_issuer")]
    pub issuer: String,

    #[serde(default = "default_issuer")]
    pub audience: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_jwt_secret() -> String {
    JwtConfig::default().secret
}

fn default_token_ttl_hours() -> i64 {
    24
}

fn default_issuer() -> String {
    "shopfront".to_string()
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            token_ttl_hours: default_token_ttl_hours(),
            issuer: default_issuer(),
            audience: default_issuer(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
            log_level: default_log_level(),
            log_format: default_log_format(),
            auth: AuthSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load from a JSON file, apply environment overrides and validate
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let mut config: ServerConfig = serde_json::from_str(&content)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for running without a file
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `JWT_KEY` and `PORT` overrides from `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("JWT_KEY") {
            self.auth.jwt_secret = secret;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Invalid(format!("PORT is not a valid port: '{}'", port)))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(ConfigError::Invalid("auth.jwt_secret must not be empty".to_string()));
        }

        if self.auth.token_ttl_hours <= 0 || self.auth.token_ttl_hours > MAX_TOKEN_TTL_HOURS {
            return Err(ConfigError::Invalid(format!(
                "auth.token_ttl_hours must be between 1 and {}",
                MAX_TOKEN_TTL_HOURS
            )));
        }

        if !matches!(self.log_format.as_str(), "text" | "json") {
            return Err(ConfigError::Invalid(format!(
                "Invalid log_format: '{}'. Expected 'text' or 'json'.",
                self.log_format
            )));
        }

        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Token settings; the lifetime is clamped to `1..=MAX_TOKEN_TTL_HOURS`
    pub fn jwt_config(&self) -> JwtConfig {
        JwtConfig {
            secret: self.auth.jwt_secret.clone(),
            access_token_ttl: chrono::Duration::hours(
                self.auth.token_ttl_hours.clamp(1, MAX_TOKEN_TTL_HOURS),
            ),
            issuer: self.auth.issuer.clone(),
            audience: self.auth.audience.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert!(config.cors_origins.is_empty());
        assert_eq!(config.auth.token_ttl_hours, 24);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 7000, "auth": {{"jwt_secret": "file-secret"}}}}"#).unwrap();

        let mut config: ServerConfig =
            serde_json::from_str(&std::fs::read_to_string(file.path()).unwrap()).unwrap();
        config.apply_env(|_| None).unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.auth.jwt_secret, "file-secret");
        assert_eq!(config.auth.issuer, "shopfront");
    }

    #[test]
    fn test_load_missing_file() {
        let result = ServerConfig::load(Path::new("/nonexistent/shopfront.json"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        let result = ServerConfig::load(file.path());
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ServerConfig::default();
        config
            .apply_env(|key| match key {
                "JWT_KEY" => Some("env-secret".to_string()),
                "PORT" => Some("9090".to_string()),
                _ => None,
            })
            .unwrap();

        assert_eq!(config.auth.jwt_secret, "env-secret");
        assert_eq!(config.port, 9090);
    }

    #[test]
    fn test_bad_port_override() {
        let mut config = ServerConfig::default();
        let result = config.apply_env(|key| (key == "PORT").then(|| "http".to_string()));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = ServerConfig::default();
        config.auth.jwt_secret = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.auth.token_ttl_hours = 0;
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.log_format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_caps_token_ttl() {
        let mut config = ServerConfig::default();
        config.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS;
        assert!(config.validate().is_ok());

        config.auth.token_ttl_hours = MAX_TOKEN_TTL_HOURS + 1;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        config.auth.token_ttl_hours = i64::MAX / 10;
        assert!(config.validate().is_err());
        // Unvalidated values are clamped
        assert_eq!(
            config.jwt_config().access_token_ttl,
            chrono::Duration::hours(MAX_TOKEN_TTL_HOURS)
        );
    }

    #[test]
    fn test_jwt_config_ttl() {
        let config = ServerConfig::default();
        assert_eq!(config.jwt_config().access_token_ttl, chrono::Duration::hours(24));
    }
}
