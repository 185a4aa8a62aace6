//! Configuration for the token service

use chrono::Duration;
use parley_shared::config::TokenConfig;

/// Secrets and lifetimes for both token classes
#[derive(Clone)]
pub struct TokenServiceConfig {
    /// HMAC secret for access tokens
    pub access_secret: String,
    /// Access token lifetime
    pub access_ttl: Duration,
    /// HMAC secret for refresh tokens
    pub refresh_secret: String,
    /// Refresh token lifetime
    pub refresh_ttl: Duration,
}

impl TokenServiceConfig {
    pub fn new(
        access_secret: impl Into<String>,
        access_ttl: Duration,
        refresh_secret: impl Into<String>,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            access_secret: access_secret.into(),
            access_ttl,
            refresh_secret: refresh_secret.into(),
            refresh_ttl,
        }
    }
}

impl From<&TokenConfig> for TokenServiceConfig {
    fn from(config: &TokenConfig) -> Self {
        Self::new(
            config.access_secret.clone(),
            config.access_ttl,
            config.refresh_secret.clone(),
            config.refresh_ttl,
        )
    }
}

impl std::fmt::Debug for TokenServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenServiceConfig")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}
