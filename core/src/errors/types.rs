//! Error kinds for token lifecycle and authentication failures
//!
//! Both enums are closed sets so callers can match exhaustively. The
//! presentation layer decides how each kind is rendered to clients.

use thiserror::Error;

/// Token lifecycle failures
///
/// `ExpiredAccessToken` is the only kind that may trigger a silent rotation.
/// Every other kind is terminal for the request that produced it.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    #[error("Access token expired")]
    ExpiredAccessToken,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Refresh token expired")]
    ExpiredRefreshToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Access and refresh tokens belong to different sessions")]
    InvalidSession,
}

/// Authentication failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email and wrong password are deliberately indistinguishable
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("User already exists")]
    UserAlreadyExists,
}
