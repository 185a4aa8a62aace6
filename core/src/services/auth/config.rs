//! Configuration for the authentication service

use parley_shared::config::AuthConfig;

/// Configuration for the authentication service
#[derive(Debug, Clone)]
pub struct AuthServiceConfig {
    /// bcrypt work factor
    pub password_hash_cost: u32,
    /// Minimum password length in characters, applied at registration
    pub min_password_length: usize,
}

impl Default for AuthServiceConfig {
    fn default() -> Self {
        Self {
            password_hash_cost: bcrypt::DEFAULT_COST,
            min_password_length: 8,
        }
    }
}

impl From<&AuthConfig> for AuthServiceConfig {
    fn from(config: &AuthConfig) -> Self {
        Self {
            password_hash_cost: config.password_hash_cost,
            ..Default::default()
        }
    }
}
