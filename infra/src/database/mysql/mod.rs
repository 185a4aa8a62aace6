//! MySQL repository implementations

mod token_repository_impl;
mod user_repository_impl;

pub use token_repository_impl::MySqlTokenRepository;
pub use user_repository_impl::MySqlUserRepository;

use parley_core::errors::DomainError;

/// Store failures become internal errors at the repository boundary
pub(crate) fn internal(context: &str, error: impl std::fmt::Display) -> DomainError {
    tracing::error!(error = %error, "{}", context);
    DomainError::Internal {
        message: format!("{}: {}", context, error),
    }
}
