//! SQLite implementation of the Outbox repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classquest_domain::OutboxEntryId;
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::{column, from_json, parse, parse_time};
use crate::infrastructure::ports::{OutboxEntry, OutboxRepo, OutboxStatus, RepoError};

pub struct SqliteOutboxRepo {
    pool: SqlitePool,
}

impl SqliteOutboxRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_entry(row: &SqliteRow) -> Result<OutboxEntry, RepoError> {
        let id: String = column(row, "id")?;
        let payload: String = column(row, "payload_json")?;
        let status: String = column(row, "status")?;
        let attempts: i64 = column(row, "attempts")?;
        let created_at: String = column(row, "created_at")?;
        let updated_at: String = column(row, "updated_at")?;

        Ok(OutboxEntry {
            id: parse(&id)?,
            payload: from_json(&payload)?,
            status: parse(&status)?,
            attempts: u32::try_from(attempts).unwrap_or(0),
            last_error: column(row, "last_error")?,
            created_at: parse_time(&created_at)?,
            updated_at: parse_time(&updated_at)?,
        })
    }
}

#[async_trait]
impl OutboxRepo for SqliteOutboxRepo {
    async fn fetch_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT id, payload_json, status, attempts, last_error, created_at, updated_at
            FROM outbox
            WHERE status = ?
            ORDER BY created_at, rowid
            LIMIT ?
            "#,
        )
        .bind(OutboxStatus::Pending.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("outbox_fetch_pending", e))?;

        rows.iter().map(Self::row_to_entry).collect()
    }

    async fn mark_applied(&self, id: OutboxEntryId, at: DateTime<Utc>) -> Result<(), RepoError> {
        let updated = sqlx::query("UPDATE outbox SET status = ?, updated_at = ? WHERE id = ?")
            .bind(OutboxStatus::Applied.as_str())
            .bind(at.to_rfc3339())
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("outbox_mark_applied", e))?
            .rows_affected();

        if updated == 0 {
            return Err(RepoError::not_found("OutboxEntry", id));
        }
        Ok(())
    }

    async fn mark_failed(
        &self,
        id: OutboxEntryId,
        error: &str,
        at: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<OutboxStatus, RepoError> {
        // SET expressions see the pre-update row, so `attempts + 1` is the new count.
        let status: Option<String> = sqlx::query_scalar(
            r#"
            UPDATE outbox SET
                attempts = attempts + 1,
                last_error = ?,
                updated_at = ?,
                status = CASE WHEN attempts + 1 >= ? THEN ? ELSE ? END
            WHERE id = ?
            RETURNING status
            "#,
        )
        .bind(error)
        .bind(at.to_rfc3339())
        .bind(i64::from(max_attempts))
        .bind(OutboxStatus::Dead.as_str())
        .bind(OutboxStatus::Pending.as_str())
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("outbox_mark_failed", e))?;

        match status {
            Some(status) => parse(&status),
            None => Err(RepoError::not_found("OutboxEntry", id)),
        }
    }

    async fn count_by_status(&self, status: OutboxStatus) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM outbox WHERE status = ?")
            .bind(status.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| RepoError::database("outbox_count", e))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
