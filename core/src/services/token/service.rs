//! Main token service implementation

use std::sync::Arc;

use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{RefreshTokenRecord, TokenKind, TokenPair, TokenPayload};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{RotationOutcome, TokenRepository};

use super::clock::{Clock, SystemClock};
use super::config::TokenServiceConfig;
use super::signer::TokenSigner;

/// Issues, verifies, rotates and revokes access and refresh tokens
///
/// Holds no state of its own besides immutable keys; every refresh token
/// record lives in the repository.
pub struct TokenService<R: TokenRepository> {
    pub(crate) repository: R,
    signer: TokenSigner,
    clock: Arc<dyn Clock>,
}

impl<R: TokenRepository> TokenService<R> {
    /// Creates a new token service reading the wall clock
    pub fn new(repository: R, config: TokenServiceConfig) -> Self {
        Self::with_clock(repository, config, Arc::new(SystemClock))
    }

    /// Creates a new token service with an explicit time source
    pub fn with_clock(repository: R, config: TokenServiceConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            signer: TokenSigner::new(&config),
            clock,
        }
    }

    pub fn signer(&self) -> &TokenSigner {
        &self.signer
    }

    /// Issue a short-lived access token. Touches no storage.
    pub fn create_token(&self, user_id: Uuid, session_id: Uuid) -> Result<String, DomainError> {
        let (token, claims) =
            self.signer
                .sign(TokenKind::Access, user_id, session_id, self.clock.now())?;

        debug!(token_id = %claims.jti, %session_id, "issued access token");
        Ok(token)
    }

    /// Issue a refresh token and persist its record
    ///
    /// The token is only returned once the record has been stored.
    pub async fn create_refresh_token(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<String, DomainError> {
        let now = self.clock.now();
        let (token, claims) = self
            .signer
            .sign(TokenKind::Refresh, user_id, session_id, now)?;
        let record = RefreshTokenRecord::from_claims(&claims, token.clone(), now);

        self.repository.store(record).await.map_err(|e| {
            error!(token_id = %claims.jti, %session_id, error = %e, "failed to store refresh token");
            as_internal(e)
        })?;

        debug!(token_id = %claims.jti, %session_id, "issued refresh token");
        Ok(token)
    }

    /// Issue the first access and refresh token of a session
    pub async fn issue_token_pair(
        &self,
        user_id: Uuid,
        session_id: Uuid,
    ) -> Result<TokenPair, DomainError> {
        let access_token = self.create_token(user_id, session_id)?;
        let refresh_token = self.create_refresh_token(user_id, session_id).await?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            session_id,
        })
    }

    /// Verify an access token
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPayload)` - Token identifier, user and session
    /// * `Err(TokenError::ExpiredAccessToken)` - Authentic but past its expiry
    /// * `Err(TokenError::InvalidAccessToken)` - Anything else
    pub fn verify_token(&self, token: &str) -> Result<TokenPayload, DomainError> {
        let claims = self
            .signer
            .verify(TokenKind::Access, token, self.clock.now())?;
        Ok(claims.payload())
    }

    /// Claims of an authentic access token, expired or not
    pub fn extract_claims(&self, token: &str) -> Result<TokenPayload, DomainError> {
        let claims = self
            .signer
            .verify_allow_expired(TokenKind::Access, token, self.clock.now())?;
        Ok(claims.payload())
    }

    /// Token identifier of a refresh token, read without signature checks
    ///
    /// Only for naming a record after the token was authenticated elsewhere.
    pub fn extract_token_id(&self, token: &str) -> Result<Uuid, DomainError> {
        Ok(self.signer.extract_unverified_id(TokenKind::Refresh, token)?)
    }

    /// Verify a refresh token against its signature and its stored record
    ///
    /// The record must exist, be unrevoked and belong to the same session
    /// and user as the token. The stricter of the two expiries wins.
    pub async fn verify_refresh_token(&self, token: &str) -> Result<TokenPayload, DomainError> {
        let now = self.clock.now();
        let claims = self.signer.verify(TokenKind::Refresh, token, now)?;

        let record = self
            .repository
            .find_by_id(claims.jti)
            .await
            .map_err(as_internal)?
            .ok_or_else(|| {
                debug!(token_id = %claims.jti, "refresh token has no record");
                TokenError::InvalidRefreshToken
            })?;

        if record.is_revoked() {
            warn!(token_id = %record.id, session_id = %record.session_id, "revoked refresh token presented");
            return Err(TokenError::InvalidRefreshToken.into());
        }
        if record.session_id != claims.session_id || record.user_id != claims.user_id {
            warn!(token_id = %record.id, "refresh token does not match its record");
            return Err(TokenError::InvalidRefreshToken.into());
        }
        if record.is_expired_at(now) {
            return Err(TokenError::ExpiredRefreshToken.into());
        }

        Ok(claims.payload())
    }

    /// Signed refresh token of the session's live record
    pub async fn get_token_by_session(&self, session_id: Uuid) -> Result<String, DomainError> {
        self.repository
            .find_by_session(session_id)
            .await
            .map_err(as_internal)?
            .map(|record| record.token)
            .ok_or_else(|| TokenError::InvalidRefreshToken.into())
    }

    /// Revoke a refresh token record. Missing or already revoked is not an error.
    pub async fn revoke_token(&self, token_id: Uuid) -> Result<(), DomainError> {
        let revoked = self
            .repository
            .revoke(token_id, self.clock.now())
            .await
            .map_err(as_internal)?;

        if revoked {
            info!(%token_id, "refresh token revoked");
        } else {
            debug!(%token_id, "refresh token already revoked or unknown");
        }
        Ok(())
    }

    /// Rotate a session's tokens and return the new access token
    ///
    /// The successor refresh token stays server-side and can be read back
    /// with [`get_token_by_session`](Self::get_token_by_session).
    pub async fn refresh_tokens(
        &self,
        old_access_token: &str,
        old_refresh_token: &str,
    ) -> Result<String, DomainError> {
        self.rotate_tokens(old_access_token, old_refresh_token)
            .await
            .map(|pair| pair.access_token)
    }

    /// Rotate a session's tokens and return both new tokens
    ///
    /// 1. The old access token must be authentic; expiry is tolerated.
    /// 2. The old refresh token must verify fully.
    /// 3. Both must name the same session, checked before any write.
    /// 4. A new access token is signed for the same user and session.
    /// 5. The old record is revoked and the successor stored atomically.
    ///    Losing a race on the same old record yields `InvalidRefreshToken`.
    pub async fn rotate_tokens(
        &self,
        old_access_token: &str,
        old_refresh_token: &str,
    ) -> Result<TokenPair, DomainError> {
        let access = self.extract_claims(old_access_token)?;
        let refresh = self.verify_refresh_token(old_refresh_token).await?;

        if access.session_id != refresh.session_id || access.user_id != refresh.user_id {
            warn!(
                access_session = %access.session_id,
                refresh_session = %refresh.session_id,
                "rotation rejected: session mismatch"
            );
            return Err(TokenError::InvalidSession.into());
        }

        let user_id = refresh.user_id;
        let session_id = refresh.session_id;
        let now = self.clock.now();

        let access_token = self.create_token(user_id, session_id)?;

        let (refresh_token, claims) = self
            .signer
            .sign(TokenKind::Refresh, user_id, session_id, now)?;
        let successor = RefreshTokenRecord::from_claims(&claims, refresh_token.clone(), now);

        let outcome = self
            .repository
            .rotate(refresh.token_id, now, successor)
            .await
            .map_err(|e| {
                error!(%session_id, error = %e, "refresh token rotation failed");
                as_internal(e)
            })?;

        match outcome {
            RotationOutcome::Rotated => {
                info!(
                    %session_id,
                    old_token_id = %refresh.token_id,
                    new_token_id = %claims.jti,
                    "session tokens rotated"
                );
                Ok(TokenPair {
                    access_token,
                    refresh_token,
                    session_id,
                })
            }
            RotationOutcome::AlreadyRevoked => {
                warn!(%session_id, token_id = %refresh.token_id, "rotation lost to a concurrent rotation");
                Err(TokenError::InvalidRefreshToken.into())
            }
        }
    }
}

/// Store failures surface as internal errors, whatever the repository reported
fn as_internal(error: DomainError) -> DomainError {
    match error {
        DomainError::Internal { .. } => error,
        other => DomainError::internal(other.to_string()),
    }
}
