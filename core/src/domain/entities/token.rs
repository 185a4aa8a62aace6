//! Token entities for the session and token lifecycle.

use chrono::{DateTime, Duration, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Issuer of access tokens
pub const ACCESS_TOKEN_ISSUER: &str = "parley";

/// Issuer of refresh tokens
pub const REFRESH_TOKEN_ISSUER: &str = "parley-refresh";

/// The two token classes. Each has its own secret, lifetime and issuer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    /// Issuer string carried in the `iss` claim
    pub fn issuer(&self) -> &'static str {
        match self {
            TokenKind::Access => ACCESS_TOKEN_ISSUER,
            TokenKind::Refresh => REFRESH_TOKEN_ISSUER,
        }
    }
}

/// Claims carried inside a signed token. Never persisted as such.
///
/// Every field is required at decode time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Token identifier, unique per issuance
    pub jti: Uuid,

    /// Subject user
    pub user_id: Uuid,

    /// Session shared by every token issued during one login session
    pub session_id: Uuid,

    /// Issuer, distinguishes access from refresh tokens
    pub iss: String,

    /// Issued at (unix seconds)
    pub iat: i64,

    /// Not before (unix seconds)
    pub nbf: i64,

    /// Expires at (unix seconds)
    pub exp: i64,
}

impl TokenClaims {
    /// Fresh claims issued at `now` and valid for `lifetime`
    pub fn issue(
        kind: TokenKind,
        user_id: Uuid,
        session_id: Uuid,
        now: DateTime<Utc>,
        lifetime: Duration,
    ) -> Self {
        let issued_at = now.timestamp();
        Self {
            jti: Uuid::new_v4(),
            user_id,
            session_id,
            iss: kind.issuer().to_string(),
            iat: issued_at,
            nbf: issued_at,
            exp: issued_at + lifetime.num_seconds(),
        }
    }

    /// Past `exp`. A token is still valid during its final second.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.exp
    }

    /// Presented before `nbf`
    pub fn is_premature_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() < self.nbf
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.exp, 0).single().unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    pub fn payload(&self) -> TokenPayload {
        TokenPayload {
            token_id: self.jti,
            user_id: self.user_id,
            session_id: self.session_id,
        }
    }
}

/// Identity carried by a verified token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenPayload {
    pub token_id: Uuid,
    pub user_id: Uuid,
    pub session_id: Uuid,
}

/// Persisted refresh token record
///
/// Created once per refresh token issuance. The only mutation is setting
/// `revoked_at`, which is never cleared again. Records are never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Matches the `jti` claim of the token
    pub id: Uuid,

    /// Owning user
    pub user_id: Uuid,

    /// Session this record belongs to
    pub session_id: Uuid,

    /// The signed token string
    pub token: String,

    pub created_at: DateTime<Utc>,

    pub expires_at: DateTime<Utc>,

    pub revoked_at: Option<DateTime<Utc>>,
}

impl RefreshTokenRecord {
    /// Build the record for freshly signed refresh claims
    pub fn from_claims(claims: &TokenClaims, token: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id: claims.jti,
            user_id: claims.user_id,
            session_id: claims.session_id,
            token,
            created_at,
            expires_at: claims.expires_at(),
            revoked_at: None,
        }
    }

    pub fn is_revoked(&self) -> bool {
        self.revoked_at.is_some()
    }

    /// Same whole-second rule as [`TokenClaims::is_expired_at`]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() > self.expires_at.timestamp()
    }

    /// Not revoked and not expired
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        !self.is_revoked() && !self.is_expired_at(now)
    }

    /// Set the revocation time. Returns false if the record was already revoked.
    pub fn revoke(&mut self, at: DateTime<Utc>) -> bool {
        if self.is_revoked() {
            return false;
        }
        self.revoked_at = Some(at);
        true
    }
}

/// Access and refresh token issued together at login or registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub session_id: Uuid,
}
