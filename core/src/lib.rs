//! # Parley Core
//!
//! Session and token lifecycle for the Parley backend: issuance,
//! verification, rotation and revocation of access and refresh tokens,
//! plus the thin login/register orchestration that hands out the first
//! token pair of a session.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::entities::{
    RefreshTokenRecord, TokenClaims, TokenKind, TokenPair, TokenPayload, User,
};
pub use errors::{AuthError, DomainError, DomainResult, TokenError};
pub use repositories::{RotationOutcome, TokenRepository, UserRepository};
pub use services::{
    AuthService, AuthServiceConfig, Clock, SystemClock, TokenService, TokenServiceConfig,
};

#[cfg(any(test, feature = "mock"))]
pub use repositories::{MockTokenRepository, MockUserRepository};
#[cfg(any(test, feature = "mock"))]
pub use services::ManualClock;
