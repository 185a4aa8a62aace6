//! Credential store contract for refresh token records.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

/// Result of an atomic rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// The old record was revoked and the successor committed
    Rotated,
    /// The old record was missing or already revoked. Nothing was written.
    AlreadyRevoked,
}

/// Repository trait for refresh token record persistence
///
/// Records are soft-revoked only. Implementations must be safe to call
/// concurrently from unrelated requests, and `rotate` must be atomic.
///
/// Store failures are reported as `DomainError::Internal`.
///
/// # Example
/// ```no_run
/// # use parley_core::repositories::TokenRepository;
/// # use parley_core::errors::DomainError;
/// # use uuid::Uuid;
/// # async fn example(repo: &impl TokenRepository, session_id: Uuid) -> Result<(), DomainError> {
/// if let Some(record) = repo.find_by_session(session_id).await? {
///     println!("live refresh token {} expires {}", record.id, record.expires_at);
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Persist a new record
    async fn store(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError>;

    /// Look up a record by its identifier, revoked or not
    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// The most recently created non-revoked record of a session
    async fn find_by_session(&self, session_id: Uuid)
        -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Set `revoked_at` if unset
    ///
    /// # Returns
    /// * `Ok(true)` - The record was live and is now revoked
    /// * `Ok(false)` - The record is missing or was already revoked
    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError>;

    /// Revoke `old_id` and store `successor` as one atomic operation
    ///
    /// The revoke is conditional on the old record still being live. When it
    /// is not, the successor must not be written and `AlreadyRevoked` is
    /// returned. A failure part-way must leave the old record untouched.
    async fn rotate(
        &self,
        old_id: Uuid,
        revoked_at: DateTime<Utc>,
        successor: RefreshTokenRecord,
    ) -> Result<RotationOutcome, DomainError>;
}
