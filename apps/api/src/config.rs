//! Storefront API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to
//! defaults. A `.env` file is honored when the binary starts.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use tracing::warn;

/// Secret used when `SECRET_KEY` is unset. Fine for development only.
pub const DEFAULT_SECRET_KEY: &str = "change_this_secret";

/// Storefront API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// HMAC secret for signing bearer tokens
    #[serde(skip_serializing)]
    pub secret_key: String,

    /// sqlx SQLite URL
    pub database_url: String,

    /// Bearer token lifetime in seconds
    pub jwt_exp_seconds: i64,

    /// HTTP listen port
    pub http_port: u16,

    /// HTTP listen address
    pub bind_addr: String,

    /// Maximum pooled database connections
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let secret_key = match env::var("SECRET_KEY") {
            Ok(s) if !s.is_empty() => s,
            _ => {
                warn!("SECRET_KEY not set, using the development default");
                DEFAULT_SECRET_KEY.to_string()
            }
        };

        let config = AppConfig {
            secret_key,

            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://storefront.db".to_string()),

            jwt_exp_seconds: parse_var("JWT_EXP_SECONDS", 86_400)?,

            http_port: parse_var("HTTP_PORT", 5000)?,

            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0".to_string()),

            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
        };

        if config.jwt_exp_seconds <= 0 {
            return Err(ConfigError::InvalidValue("JWT_EXP_SECONDS".to_string()));
        }
        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Deterministic configuration for tests: in-memory database, fixed
    /// secret, one-hour tokens.
    pub fn for_tests() -> Self {
        AppConfig {
            secret_key: "test-secret-key".to_string(),
            database_url: "sqlite::memory:".to_string(),
            jwt_exp_seconds: 3600,
            http_port: 0,
            bind_addr: "127.0.0.1".to_string(),
            db_max_connections: 1,
        }
    }

    /// `bind_addr:http_port`
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.http_port)
    }
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(name.to_string())),
        Err(_) => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_var_default_and_invalid() {
        // Names unlikely to be set in any environment.
        assert_eq!(parse_var("STOREFRONT_TEST_UNSET_PORT", 5000u16).unwrap(), 5000);

        env::set_var("STOREFRONT_TEST_BAD_PORT", "not-a-port");
        let err = parse_var::<u16>("STOREFRONT_TEST_BAD_PORT", 5000).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for STOREFRONT_TEST_BAD_PORT");

        env::set_var("STOREFRONT_TEST_GOOD_PORT", " 8080 ");
        assert_eq!(parse_var::<u16>("STOREFRONT_TEST_GOOD_PORT", 5000).unwrap(), 8080);
    }

    #[test]
    fn test_for_tests_is_in_memory() {
        let config = AppConfig::for_tests();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.listen_addr(), "127.0.0.1:0");
    }

    #[test]
    fn test_secret_not_serialized() {
        let json = serde_json::to_string(&AppConfig::for_tests()).unwrap();
        assert!(!json.contains("test-secret-key"));
    }
}
