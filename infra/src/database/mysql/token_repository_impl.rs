//! MySQL implementation of the TokenRepository trait.
//!
//! Records are soft-revoked only. Rotation runs in a single transaction so
//! the old record is never left revoked without its successor.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use parley_core::domain::entities::token::RefreshTokenRecord;
use parley_core::errors::DomainError;
use parley_core::repositories::{RotationOutcome, TokenRepository};

use super::internal;

const SELECT_COLUMNS: &str =
    "SELECT id, user_id, session_id, token, created_at, expires_at, revoked_at FROM refresh_tokens";

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to RefreshTokenRecord entity
    fn row_to_record(row: &sqlx::mysql::MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
        let id: String = row
            .try_get("id")
            .map_err(|e| internal("Failed to get id", e))?;
        let user_id: String = row
            .try_get("user_id")
            .map_err(|e| internal("Failed to get user_id", e))?;
        let session_id: String = row
            .try_get("session_id")
            .map_err(|e| internal("Failed to get session_id", e))?;

        Ok(RefreshTokenRecord {
            id: parse_uuid(&id)?,
            user_id: parse_uuid(&user_id)?,
            session_id: parse_uuid(&session_id)?,
            token: row
                .try_get("token")
                .map_err(|e| internal("Failed to get token", e))?,
            created_at: row
                .try_get::<DateTime<Utc>, _>("created_at")
                .map_err(|e| internal("Failed to get created_at", e))?,
            expires_at: row
                .try_get::<DateTime<Utc>, _>("expires_at")
                .map_err(|e| internal("Failed to get expires_at", e))?,
            revoked_at: row
                .try_get::<Option<DateTime<Utc>>, _>("revoked_at")
                .map_err(|e| internal("Failed to get revoked_at", e))?,
        })
    }
}

fn parse_uuid(value: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(value).map_err(|e| internal("Invalid UUID in refresh_tokens", e))
}

const INSERT_RECORD: &str = r#"
    INSERT INTO refresh_tokens (
        id, user_id, session_id, token, created_at, expires_at, revoked_at
    ) VALUES (?, ?, ?, ?, ?, ?, ?)
"#;

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn store(&self, record: RefreshTokenRecord) -> Result<RefreshTokenRecord, DomainError> {
        sqlx::query(INSERT_RECORD)
            .bind(record.id.to_string())
            .bind(record.user_id.to_string())
            .bind(record.session_id.to_string())
            .bind(&record.token)
            .bind(record.created_at)
            .bind(record.expires_at)
            .bind(record.revoked_at)
            .execute(&self.pool)
            .await
            .map_err(|e| internal("Failed to save refresh token", e))?;

        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!("{} WHERE id = ? LIMIT 1", SELECT_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find refresh token by id", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn find_by_session(
        &self,
        session_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!(
            "{} WHERE session_id = ? AND revoked_at IS NULL ORDER BY created_at DESC LIMIT 1",
            SELECT_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(session_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| internal("Failed to find refresh token by session", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn revoke(&self, id: Uuid, revoked_at: DateTime<Utc>) -> Result<bool, DomainError> {
        let result = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL",
        )
        .bind(revoked_at)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(|e| internal("Failed to revoke refresh token", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn rotate(
        &self,
        old_id: Uuid,
        revoked_at: DateTime<Utc>,
        successor: RefreshTokenRecord,
    ) -> Result<RotationOutcome, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| internal("Failed to begin rotation", e))?;

        // The row lock taken by this UPDATE serialises racing rotations
        let revoked = sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = ? WHERE id = ? AND revoked_at IS NULL",
        )
        .bind(revoked_at)
        .bind(old_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| internal("Failed to revoke refresh token during rotation", e))?;

        if revoked.rows_affected() == 0 {
            tx.rollback()
                .await
                .map_err(|e| internal("Failed to roll back rotation", e))?;
            return Ok(RotationOutcome::AlreadyRevoked);
        }

        sqlx::query(INSERT_RECORD)
            .bind(successor.id.to_string())
            .bind(successor.user_id.to_string())
            .bind(successor.session_id.to_string())
            .bind(&successor.token)
            .bind(successor.created_at)
            .bind(successor.expires_at)
            .bind(successor.revoked_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| internal("Failed to store successor refresh token", e))?;

        tx.commit()
            .await
            .map_err(|e| internal("Failed to commit rotation", e))?;

        Ok(RotationOutcome::Rotated)
    }
}
