//! Repository traits at the persistence boundary, with in-memory
//! implementations for tests.

pub mod token;
pub mod user;

pub use token::{RotationOutcome, TokenRepository};
pub use user::UserRepository;

#[cfg(any(test, feature = "mock"))]
pub use token::MockTokenRepository;
#[cfg(any(test, feature = "mock"))]
pub use user::MockUserRepository;
