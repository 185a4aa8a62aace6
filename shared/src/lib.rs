//! Shared utilities and common types for the Parley server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types and the environment loader
//! - The JSON error body returned by the API
//! - Validation helpers

pub mod config;
pub mod errors;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{
    AppConfig, AuthConfig, ConfigError, CookieConfig, DatabaseConfig, Environment, LogFormat,
    LoggingConfig, ServerConfig, TokenConfig,
};
pub use errors::{error_codes, ErrorResponse};
pub use utils::validation;
