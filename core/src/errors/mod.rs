//! Domain-specific error types and error handling.

mod types;


pub use types::{AuthError, TokenError};

use thiserror::Error;

/// Core domain errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Store or signing failure. The message is for logs, not for clients.
    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// The single signal that allows a silent rotation
    pub fn is_access_expired(&self) -> bool {
        matches!(self, DomainError::Token(TokenError::ExpiredAccessToken))
    }

    /// Failures after which the client must log in again and drop both cookies
    pub fn requires_reauthentication(&self) -> bool {
        matches!(
            self,
            DomainError::Token(
                TokenError::InvalidAccessToken
                    | TokenError::ExpiredRefreshToken
                    | TokenError::InvalidRefreshToken
                    | TokenError::InvalidSession
            )
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
