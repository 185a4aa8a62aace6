//! Tests for the in-memory token repository

use chrono::{Duration, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::entities::token::{RefreshTokenRecord, TokenClaims, TokenKind};
use crate::errors::DomainError;
use crate::repositories::token::{MockTokenRepository, RotationOutcome, TokenRepository};

fn record(session_id: Uuid, created_secs: i64) -> RefreshTokenRecord {
    let created = Utc.timestamp_opt(created_secs, 0).unwrap();
    let claims = TokenClaims::issue(
        TokenKind::Refresh,
        Uuid::new_v4(),
        session_id,
        created,
        Duration::days(7),
    );
    RefreshTokenRecord::from_claims(&claims, format!("token-{}", claims.jti), created)
}

#[tokio::test]
async fn test_store_and_find_by_id() {
    let repo = MockTokenRepository::new();
    let rec = record(Uuid::new_v4(), 100);

    repo.store(rec.clone()).await.unwrap();

    assert_eq!(repo.find_by_id(rec.id).await.unwrap(), Some(rec));
    assert_eq!(repo.find_by_id(Uuid::new_v4()).await.unwrap(), None);
}

#[tokio::test]
async fn test_store_rejects_duplicate_id() {
    let repo = MockTokenRepository::new();
    let rec = record(Uuid::new_v4(), 100);

    repo.store(rec.clone()).await.unwrap();
    let result = repo.store(rec).await;

    assert!(matches!(result, Err(DomainError::Internal { .. })));
}

#[tokio::test]
async fn test_find_by_session_returns_latest_live_record() {
    let repo = MockTokenRepository::new();
    let session_id = Uuid::new_v4();
    let older = record(session_id, 100);
    let newer = record(session_id, 200);
    repo.store(older.clone()).await.unwrap();
    repo.store(newer.clone()).await.unwrap();
    repo.store(record(Uuid::new_v4(), 300)).await.unwrap();

    let found = repo.find_by_session(session_id).await.unwrap().unwrap();
    assert_eq!(found.id, newer.id);

    repo.revoke(newer.id, Utc::now()).await.unwrap();
    let found = repo.find_by_session(session_id).await.unwrap().unwrap();
    assert_eq!(found.id, older.id);

    repo.revoke(older.id, Utc::now()).await.unwrap();
    assert!(repo.find_by_session(session_id).await.unwrap().is_none());
}

#[tokio::test]
async fn test_revoke_is_idempotent() {
    let repo = MockTokenRepository::new();
    let rec = record(Uuid::new_v4(), 100);
    repo.store(rec.clone()).await.unwrap();
    let first = Utc.timestamp_opt(500, 0).unwrap();

    assert!(repo.revoke(rec.id, first).await.unwrap());
    assert!(!repo.revoke(rec.id, Utc::now()).await.unwrap());
    assert!(!repo.revoke(Uuid::new_v4(), Utc::now()).await.unwrap());

    let stored = repo.find_by_id(rec.id).await.unwrap().unwrap();
    assert_eq!(stored.revoked_at, Some(first));
}

#[tokio::test]
async fn test_rotate_revokes_old_and_stores_successor() {
    let repo = MockTokenRepository::new();
    let session_id = Uuid::new_v4();
    let old = record(session_id, 100);
    let successor = record(session_id, 200);
    repo.store(old.clone()).await.unwrap();

    let outcome = repo.rotate(old.id, Utc::now(), successor.clone()).await.unwrap();

    assert_eq!(outcome, RotationOutcome::Rotated);
    assert!(repo.find_by_id(old.id).await.unwrap().unwrap().is_revoked());
    assert_eq!(repo.find_by_session(session_id).await.unwrap().unwrap().id, successor.id);
    assert_eq!(repo.live_count(session_id).await, 1);
}

#[tokio::test]
async fn test_rotate_on_revoked_record_writes_nothing() {
    let repo = MockTokenRepository::new();
    let session_id = Uuid::new_v4();
    let old = record(session_id, 100);
    repo.store(old.clone()).await.unwrap();
    repo.revoke(old.id, Utc::now()).await.unwrap();

    let successor = record(session_id, 200);
    let outcome = repo.rotate(old.id, Utc::now(), successor.clone()).await.unwrap();

    assert_eq!(outcome, RotationOutcome::AlreadyRevoked);
    assert!(repo.find_by_id(successor.id).await.unwrap().is_none());

    let missing = repo.rotate(Uuid::new_v4(), Utc::now(), successor).await.unwrap();
    assert_eq!(missing, RotationOutcome::AlreadyRevoked);
    assert_eq!(repo.len().await, 1);
}

#[tokio::test]
async fn test_failing_store_reports_internal() {
    let repo = MockTokenRepository::new();
    repo.set_failing(true);

    let result = repo.find_by_id(Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::Internal { .. })));

    repo.set_failing(false);
    assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
}
