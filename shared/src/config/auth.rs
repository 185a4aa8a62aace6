//! Authentication configuration: token secrets, lifetimes and cookie transport

use chrono::Duration;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::{ConfigError, Environment};

/// Name of the cookie carrying the access token
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Name of the cookie carrying the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

static DURATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(\d+)d)?(?:(\d+)h)?(?:(\d+)m)?(?:(\d+)s)?$").expect("duration pattern is valid")
});

/// Signing secrets and lifetimes for access and refresh tokens.
///
/// Fixed at startup. The two token classes never share a lifetime setting
/// and are expected to use different secrets.
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC secret for access tokens
    pub access_secret: String,

    /// Lifetime of an access token
    pub access_ttl: Duration,

    /// HMAC secret for refresh tokens
    pub refresh_secret: String,

    /// Lifetime of a refresh token
    pub refresh_ttl: Duration,
}

impl TokenConfig {
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

    /// Load from `TOKEN_SECRET`, `TOKEN_DURATION`, `REFRESH_TOKEN_SECRET`
    /// and `REFRESH_TOKEN_DURATION`. Every key is required.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let access_secret = required(lookup, "TOKEN_SECRET")?;
        let access_ttl = required_duration(lookup, "TOKEN_DURATION")?;
        let refresh_secret = required(lookup, "REFRESH_TOKEN_SECRET")?;
        let refresh_ttl = required_duration(lookup, "REFRESH_TOKEN_DURATION")?;

        Ok(Self {
            access_secret,
            access_ttl,
            refresh_secret,
            refresh_ttl,
        })
    }

    /// True when both token classes are signed with the same secret
    pub fn shares_secret(&self) -> bool {
        self.access_secret == self.refresh_secret
    }
}

impl fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_secret", &"<redacted>")
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Cookie attributes used to transport tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieConfig {
    /// Send cookies over HTTPS only
    pub secure: bool,

    /// Cookie path
    pub path: String,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            secure: false,
            path: String::from("/"),
        }
    }
}

impl CookieConfig {
    /// Secure cookies default on in production and can be overridden with `COOKIE_SECURE`
    pub fn from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secure = match lookup("COOKIE_SECURE") {
            Some(value) => parse_bool("COOKIE_SECURE", &value)?,
            None => environment.is_production(),
        };

        Ok(Self {
            secure,
            ..Default::default()
        })
    }
}

/// Complete authentication configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Token secrets and lifetimes
    pub tokens: TokenConfig,

    /// Cookie transport settings
    pub cookies: CookieConfig,

    /// bcrypt work factor for password hashes
    pub password_hash_cost: u32,
}

impl AuthConfig {
    /// Default bcrypt work factor
    pub const DEFAULT_HASH_COST: u32 = 12;

    pub fn from_lookup<F>(lookup: &F, environment: Environment) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let password_hash_cost = match lookup("PASSWORD_HASH_COST") {
            Some(raw) => {
                let cost: u32 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                    key: "PASSWORD_HASH_COST".to_string(),
                    message: format!("expected an integer, got '{}'", raw),
                })?;
                if !(4..=31).contains(&cost) {
                    return Err(ConfigError::Invalid {
                        key: "PASSWORD_HASH_COST".to_string(),
                        message: format!("cost must be between 4 and 31, got {}", cost),
                    });
                }
                cost
            }
            None => Self::DEFAULT_HASH_COST,
        };

        Ok(Self {
            tokens: TokenConfig::from_lookup(lookup)?,
            cookies: CookieConfig::from_lookup(lookup, environment)?,
            password_hash_cost,
        })
    }
}

/// Parse a compact duration such as `15m`, `1h30m`, `168h` or `7d`.
///
/// Units are `d`, `h`, `m` and `s`, in that order, each at most once.
/// The result must be strictly positive.
pub fn parse_duration(raw: &str) -> Option<Duration> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    let captures = DURATION_PATTERN.captures(raw)?;
    let multipliers = [86_400_i64, 3_600, 60, 1];

    let mut total: i64 = 0;
    for (index, multiplier) in multipliers.iter().enumerate() {
        if let Some(group) = captures.get(index + 1) {
            let value: i64 = group.as_str().parse().ok()?;
            total = total.checked_add(value.checked_mul(*multiplier)?)?;
        }
    }

    if total <= 0 {
        return None;
    }
    Duration::try_seconds(total)
}

fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(key.to_string())),
    }
}

fn required_duration<F>(lookup: &F, key: &str) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = required(lookup, key)?;
    parse_duration(&raw).ok_or_else(|| ConfigError::Invalid {
        key: key.to_string(),
        message: format!("'{}' is not a positive duration (e.g. 15m, 168h, 7d)", raw),
    })
}

fn parse_bool(key: &str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            key: key.to_string(),
            message: format!("expected a boolean, got '{}'", raw),
        }),
    }
}
