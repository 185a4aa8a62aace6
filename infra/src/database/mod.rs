//! Database module - MySQL implementations using SQLx
//!
//! - Connection pool management
//! - Repository implementations
//! - Embedded migrations

pub mod connection;
pub mod mysql;

// Re-export commonly used types
pub use connection::DatabasePool;
pub use mysql::{MySqlTokenRepository, MySqlUserRepository};
