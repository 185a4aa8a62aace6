//! HS256 signing and verification of token claims

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

use crate::domain::entities::token::{TokenClaims, TokenKind};
use crate::errors::{DomainError, TokenError};

use super::config::TokenServiceConfig;

/// Keys, lifetime and validation rules for one token class
struct ClassKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    lifetime: Duration,
    validation: Validation,
}

impl ClassKeys {
    fn new(kind: TokenKind, secret: &str, lifetime: Duration) -> Self {
        // Time windows are checked against the injected clock, not by the library
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.set_issuer(&[kind.issuer()]);
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            lifetime,
            validation,
        }
    }
}

/// Produces and authenticates signed tokens
///
/// Access and refresh tokens have independent secrets and lifetimes, and
/// carry different issuers so one can never be accepted as the other.
pub struct TokenSigner {
    access: ClassKeys,
    refresh: ClassKeys,
}

impl TokenSigner {
    pub fn new(config: &TokenServiceConfig) -> Self {
        Self {
            access: ClassKeys::new(TokenKind::Access, &config.access_secret, config.access_ttl),
            refresh: ClassKeys::new(TokenKind::Refresh, &config.refresh_secret, config.refresh_ttl),
        }
    }

    fn keys(&self, kind: TokenKind) -> &ClassKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// Configured lifetime of a token class
    pub fn lifetime(&self, kind: TokenKind) -> Duration {
        self.keys(kind).lifetime
    }

    /// Issue fresh claims at `now` and sign them
    pub fn sign(
        &self,
        kind: TokenKind,
        user_id: Uuid,
        session_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<(String, TokenClaims), DomainError> {
        let keys = self.keys(kind);
        let claims = TokenClaims::issue(kind, user_id, session_id, now, keys.lifetime);

        let token = encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding_key)
            .map_err(|e| DomainError::internal(format!("failed to sign {:?} token: {}", kind, e)))?;

        Ok((token, claims))
    }

    /// Authenticate a token and check its time window
    ///
    /// Expiry is `now > exp`, premature use is `now < nbf`. Any signature,
    /// structure, issuer or premature-use problem is reported as invalid.
    pub fn verify(
        &self,
        kind: TokenKind,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        let claims = self.decode_authenticated(kind, token, now)?;

        if claims.is_expired_at(now) {
            return Err(expired(kind));
        }

        Ok(claims)
    }

    /// Like [`verify`](Self::verify) but an expired token is still accepted
    pub fn verify_allow_expired(
        &self,
        kind: TokenKind,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        self.decode_authenticated(kind, token, now)
    }

    /// Read the token identifier without checking the signature
    ///
    /// Only for naming a record whose token has already been authenticated.
    /// Never use the result to grant access.
    pub fn extract_unverified_id(&self, kind: TokenKind, token: &str) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.insecure_disable_signature_validation();
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.set_required_spec_claims::<&str>(&[]);

        decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims.jti)
            .map_err(|_| invalid(kind))
    }

    fn decode_authenticated(
        &self,
        kind: TokenKind,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenClaims, TokenError> {
        let keys = self.keys(kind);

        let claims = decode::<TokenClaims>(token, &keys.decoding_key, &keys.validation)
            .map(|data| data.claims)
            .map_err(|_| invalid(kind))?;

        if claims.is_premature_at(now) {
            return Err(invalid(kind));
        }

        Ok(claims)
    }
}

fn expired(kind: TokenKind) -> TokenError {
    match kind {
        TokenKind::Access => TokenError::ExpiredAccessToken,
        TokenKind::Refresh => TokenError::ExpiredRefreshToken,
    }
}

fn invalid(kind: TokenKind) -> TokenError {
    match kind {
        TokenKind::Access => TokenError::InvalidAccessToken,
        TokenKind::Refresh => TokenError::InvalidRefreshToken,
    }
}
