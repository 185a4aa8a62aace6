//! Authentication service module
//!
//! - Registration with a bcrypt password hash
//! - Login by email and password
//! - Logout of the current session
//!
//! Every successful login or registration starts a new session and hands
//! out its first token pair.

mod config;
mod password;
mod service;

#[cfg(test)]
mod tests;

pub use config::AuthServiceConfig;
pub use password::{hash_password, verify_password};
pub use service::AuthService;
