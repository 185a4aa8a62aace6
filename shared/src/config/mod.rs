//! Configuration module with business-specific sub-modules
//!
//! - `auth` - Token secrets, lifetimes, cookie transport and password hashing
//! - `database` - Database connection and pool configuration
//! - `environment` - Environment detection and logging configuration
//! - `server` - HTTP server configuration
//!
//! Everything is read from environment variables. Loaders take a lookup
//! closure so tests can supply values without touching the process env.

pub mod auth;
pub mod database;
pub mod environment;
pub mod server;

use thiserror::Error;

// Re-export commonly used types
pub use auth::{parse_duration, AuthConfig, CookieConfig, TokenConfig};
pub use database::DatabaseConfig;
pub use environment::{Environment, LogFormat, LoggingConfig};
pub use server::ServerConfig;

/// Startup configuration failures. All of them are fatal.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required configuration key {0}")]
    Missing(String),

    #[error("invalid value for {key}: {message}")]
    Invalid { key: String, message: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Authentication configuration
    pub auth: AuthConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_lookup(&lookup)?;

        Ok(Self {
            environment,
            server: ServerConfig::from_lookup(&lookup)?,
            database: DatabaseConfig::from_lookup(&lookup)?,
            auth: AuthConfig::from_lookup(&lookup, environment)?,
            logging: LoggingConfig::from_lookup(&lookup, environment)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_app_config_from_lookup() {
        let vars = env_map(&[
            ("APP_ENV", "production"),
            ("TOKEN_SECRET", "a"),
            ("TOKEN_DURATION", "15m"),
            ("REFRESH_TOKEN_SECRET", "b"),
            ("REFRESH_TOKEN_DURATION", "7d"),
            ("SERVER_PORT", "8088"),
        ]);
        let config = AppConfig::from_lookup(|k| vars.get(k).cloned()).unwrap();

        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.server.port, 8088);
        assert!(config.auth.cookies.secure);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.auth.tokens.refresh_ttl, chrono::Duration::days(7));
    }

    #[test]
    fn test_app_config_requires_token_settings() {
        let vars = env_map(&[("APP_ENV", "development")]);
        let err = AppConfig::from_lookup(|k| vars.get(k).cloned()).unwrap_err();
        assert_eq!(err, ConfigError::Missing("TOKEN_SECRET".to_string()));
    }
}
