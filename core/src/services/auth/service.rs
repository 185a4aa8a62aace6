//! Main authentication service implementation

use std::sync::Arc;

use parley_shared::validation::validators;
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::TokenPair;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError, DomainResult, TokenError};
use crate::repositories::{TokenRepository, UserRepository};
use crate::services::token::TokenService;

use super::config::AuthServiceConfig;
use super::password::{hash_password, verify_password};

const UNKNOWN_USER_PASSWORD: &str = "parley-unknown-user";

/// Binds identity checks to the token service
pub struct AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// User repository for database operations
    user_repository: Arc<U>,
    /// Token service for the session's tokens
    token_service: Arc<TokenService<T>>,
    /// Service configuration
    config: AuthServiceConfig,
    /// Hash checked on unknown emails so both login failures cost one bcrypt verify
    pub(super) unknown_user_hash: OnceCell<String>,
}

impl<U, T> AuthService<U, T>
where
    U: UserRepository,
    T: TokenRepository,
{
    /// Create a new authentication service
    pub fn new(
        user_repository: Arc<U>,
        token_service: Arc<TokenService<T>>,
        config: AuthServiceConfig,
    ) -> Self {
        Self {
            user_repository,
            token_service,
            config,
            unknown_user_hash: OnceCell::new(),
        }
    }

    pub fn token_service(&self) -> &Arc<TokenService<T>> {
        &self.token_service
    }

    /// Log in with email and password and start a new session
    ///
    /// An unknown email and a wrong password both fail with
    /// `AuthError::InvalidCredentials`.
    pub async fn login(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let email = normalize_email(email);

        let user = match self.user_repository.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("login for unknown email");
                let hash = self
                    .unknown_user_hash
                    .get_or_try_init(|| {
                        hash_password(UNKNOWN_USER_PASSWORD, self.config.password_hash_cost)
                    })
                    .await?;
                verify_password(password, hash).await?;
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        if !verify_password(password, &user.password_hash).await? {
            debug!(user_id = %user.id, "login with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let pair = self.start_session(user.id).await?;
        info!(user_id = %user.id, session_id = %pair.session_id, "user logged in");
        Ok(pair)
    }

    /// Register a new account and start its first session
    pub async fn register(&self, email: &str, password: &str) -> DomainResult<TokenPair> {
        let email = normalize_email(email);
        self.validate_registration(&email, password)?;

        if self.user_repository.find_by_email(&email).await?.is_some() {
            return Err(AuthError::UserAlreadyExists.into());
        }

        let password_hash = hash_password(password, self.config.password_hash_cost).await?;
        let user = self.user_repository.create(User::new(email, password_hash)).await?;

        let pair = self.start_session(user.id).await?;
        info!(user_id = %user.id, session_id = %pair.session_id, "user registered");
        Ok(pair)
    }

    /// End the session named by the given tokens
    ///
    /// Best effort: the live refresh record is revoked when one can be named,
    /// and nothing here fails from the caller's point of view.
    pub async fn logout(&self, access_token: Option<&str>, refresh_token: Option<&str>) {
        let token_id = match self.logout_target(access_token, refresh_token).await {
            Some(token_id) => token_id,
            None => {
                debug!("logout without a revocable refresh token");
                return;
            }
        };

        match self.token_service.revoke_token(token_id).await {
            Ok(()) => info!(%token_id, "user logged out"),
            Err(e) => warn!(%token_id, error = %e, "logout could not revoke refresh token"),
        }
    }

    /// The user behind an authenticated request
    pub async fn current_user(&self, user_id: Uuid) -> DomainResult<User> {
        self.user_repository
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| TokenError::InvalidAccessToken.into())
    }

    async fn start_session(&self, user_id: Uuid) -> DomainResult<TokenPair> {
        let session_id = Uuid::new_v4();
        self.token_service.issue_token_pair(user_id, session_id).await
    }

    /// Refresh record to revoke on logout
    ///
    /// Prefers the refresh token itself. An expired refresh token has still
    /// passed signature checks, so its identifier may be read directly.
    /// Otherwise falls back to the live record of the access token's session.
    async fn logout_target(
        &self,
        access_token: Option<&str>,
        refresh_token: Option<&str>,
    ) -> Option<Uuid> {
        if let Some(refresh_token) = refresh_token {
            match self.token_service.verify_refresh_token(refresh_token).await {
                Ok(payload) => return Some(payload.token_id),
                Err(DomainError::Token(TokenError::ExpiredRefreshToken)) => {
                    if let Ok(token_id) = self.token_service.extract_token_id(refresh_token) {
                        return Some(token_id);
                    }
                }
                Err(e) => debug!(error = %e, "logout refresh token rejected"),
            }
        }

        let session_id = self
            .token_service
            .extract_claims(access_token?)
            .ok()?
            .session_id;
        let token = self.token_service.get_token_by_session(session_id).await.ok()?;
        self.token_service.extract_token_id(&token).ok()
    }

    fn validate_registration(&self, email: &str, password: &str) -> DomainResult<()> {
        if !validators::is_valid_email(email) {
            return Err(DomainError::Validation {
                message: "email must be a valid email address".to_string(),
            });
        }
        if !validators::length_between(password, self.config.min_password_length, 72) {
            return Err(DomainError::Validation {
                message: format!(
                    "password must be between {} and 72 characters",
                    self.config.min_password_length
                ),
            });
        }
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
