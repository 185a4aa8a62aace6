//! Token service module
//!
//! - Signing and verification of access and refresh tokens
//! - Refresh token records and the rotation protocol
//! - Revocation
//! - An injectable clock so expiry is testable

mod clock;
mod config;
mod service;
mod signer;

#[cfg(test)]
mod tests;

#[cfg(any(test, feature = "mock"))]
pub use clock::ManualClock;
pub use clock::{Clock, SystemClock};
pub use config::TokenServiceConfig;
pub use service::TokenService;
pub use signer::TokenSigner;
