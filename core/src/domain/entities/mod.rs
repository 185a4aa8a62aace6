//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{
    RefreshTokenRecord, TokenClaims, TokenKind, TokenPair, TokenPayload, ACCESS_TOKEN_ISSUER,
    REFRESH_TOKEN_ISSUER,
};
pub use user::{display_name_from_email, User};
