//! In-memory implementation of TokenRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::token::RefreshTokenRecord;
use crate::errors::DomainError;

use super::r#trait::{RotationOutcome, TokenRepository};

/// In-memory token repository
///
/// Clones share the same storage. `rotate` holds the write lock for the
/// whole check-revoke-insert sequence, which gives it the same atomicity as
/// a database transaction.
#[derive(Clone, Default)]
pub struct MockTokenRepository {
    records: Arc<RwLock<HashMap<Uuid, RefreshTokenRecord>>>,
    failing: Arc<AtomicBool>,
}

impl MockTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with an internal error
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Every record of a session, oldest first
    pub async fn records_for_session(&self, session_id: Uuid) -> Vec<RefreshTokenRecord> {
        let records = self.records.read().await;
        let mut found: Vec<_> = records
            .values()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        found.sort_by_key(|r| r.created_at);
        found
    }

    /// Number of non-revoked records of a session
    pub async fn live_count(&self, session_id: Uuid) -> usize {
        let records = self.records.read().await;
        records
            .values()
            .filter(|r| r.session_id == session_id && !r.is_revoked())
            .count()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    fn check_available(&self) -> Result<(), DomainError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::internal("token store unavailable"));
        }
        Ok(())
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn store(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;

        if records.contains_key(&record.id) {
            return Err(DomainError::internal(format!(
                "duplicate refresh token id {}",
                record.id
            )));
        }

        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn find_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        self.check_available()?;
        let records = self.records.read().await;
        Ok(records
            .values()
            .filter(|r| r.session_id == session_id && !r.is_revoked())
            .max_by_key(|r| r.created_at)
            .cloned())
    }

    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;

        Ok(records
            .get_mut(&id)
            .map(|record| record.revoke(revoked_at))
            .unwrap_or(false))
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        revoked_at: DateTime<Utc>,
        successor: RefreshTokenRecord,
    ) -> Result<RotationOutcome, DomainError> {
        self.check_available()?;
        let mut records = self.records.write().await;

        if records.contains_key(&successor.id) {
            return Err(DomainError::internal(format!(
                "duplicate refresh token id {}",
                successor.id
            )));
        }

        let revoked = match records.get_mut(&old_id) {
            Some(old) => old.revoke(revoked_at),
            None => false,
        };
        if !revoked {
            return Ok(RotationOutcome::AlreadyRevoked);
        }

        records.insert(successor.id, successor);
        Ok(RotationOutcome::Rotated)
    }
}
