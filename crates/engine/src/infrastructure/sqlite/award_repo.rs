//! SQLite implementation of the Award repository.
//!
//! An award commit touches the student row, the award ledger, the outbox and
//! the dedup table inside one transaction. The progress document is only
//! written when the row still carries the version the commit was built from.
//!
//! Same-day earner lookups are bounded by the ledger sequence of the award
//! that triggered them, so later awards never leak into an older effect.

use async_trait::async_trait;
use chrono::NaiveDate;
use classquest_domain::{AwardId, ClassroomId, GuildId, Reason, StudentId};
use sqlx::SqlitePool;

use super::helpers::{column, parse, to_json, to_sql_int};
use crate::infrastructure::ports::{AwardCommit, AwardRepo, CommitReceipt, OutboxStatus, RepoError};

pub struct SqliteAwardRepo {
    pool: SqlitePool,
}

impl SqliteAwardRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn ids_from_rows(rows: &[sqlx::sqlite::SqliteRow]) -> Result<Vec<StudentId>, RepoError> {
        rows.iter()
            .map(|row| {
                let id: String = column(row, "student_id")?;
                parse::<StudentId>(&id)
            })
            .collect()
    }
}

#[async_trait]
impl AwardRepo for SqliteAwardRepo {
    async fn commit(&self, commit: &AwardCommit) -> Result<CommitReceipt, RepoError> {
        let progress_json = to_json(&commit.progress)?;
        let month = commit.month().to_string();
        let now = commit.committed_at.to_rfc3339();
        let star_increment = to_sql_int(commit.star_increment);

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("award_commit", e))?;

        // Counters are increments so concurrent peer grants are never lost.
        let updated = sqlx::query(
            r#"
            UPDATE students SET
                total_stars = total_stars + ?,
                monthly_stars = CASE
                    WHEN monthly_stars_month = ? THEN monthly_stars + ?
                    ELSE ?
                END,
                monthly_stars_month = ?,
                gold = gold + ?,
                progress_json = ?,
                version = version + 1,
                updated_at = ?
            WHERE id = ? AND version = ?
            "#,
        )
        .bind(star_increment)
        .bind(&month)
        .bind(star_increment)
        .bind(star_increment)
        .bind(&month)
        .bind(commit.gold_increment)
        .bind(progress_json)
        .bind(&now)
        .bind(commit.student_id.to_string())
        .bind(to_sql_int(commit.progress.version()))
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("award_commit", e))?
        .rows_affected();

        if updated == 0 {
            let exists: Option<i64> = sqlx::query_scalar("SELECT 1 FROM students WHERE id = ?")
                .bind(commit.student_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RepoError::database("award_commit", e))?;
            return Err(match exists {
                Some(_) => RepoError::conflict("Student", commit.student_id),
                None => RepoError::not_found("Student", commit.student_id),
            });
        }

        sqlx::query(
            r#"
            INSERT INTO awards (
                id, student_id, classroom_id, guild_id, reason, stars, awarded_on, created_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(commit.award_id.to_string())
        .bind(commit.student_id.to_string())
        .bind(commit.classroom_id.to_string())
        .bind(commit.guild_id.map(|g| g.key()))
        .bind(commit.reason.map(|r| r.key()))
        .bind(to_sql_int(commit.stars))
        .bind(commit.awarded_on.to_string())
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("award_commit", e))?;

        let mut receipt = CommitReceipt::default();
        for entry in &commit.outbox {
            if let Some(key) = &entry.dedup_key {
                let claimed = sqlx::query(
                    "INSERT INTO outbox_dedup (dedup_key, entry_id, created_at) VALUES (?, ?, ?) \
                     ON CONFLICT(dedup_key) DO NOTHING",
                )
                .bind(key)
                .bind(entry.id.to_string())
                .bind(&now)
                .execute(&mut *tx)
                .await
                .map_err(|e| RepoError::database("award_commit", e))?
                .rows_affected();

                if claimed == 0 {
                    receipt.deduplicated += 1;
                    continue;
                }
            }

            sqlx::query(
                r#"
                INSERT INTO outbox (
                    id, kind, payload_json, status, attempts, last_error, created_at, updated_at
                )
                VALUES (?, ?, ?, ?, 0, NULL, ?, ?)
                "#,
            )
            .bind(entry.id.to_string())
            .bind(entry.payload.kind())
            .bind(to_json(&entry.payload)?)
            .bind(OutboxStatus::Pending.as_str())
            .bind(&now)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("award_commit", e))?;
            receipt.enqueued += 1;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("award_commit", e))?;

        Ok(receipt)
    }

    async fn earners_in_classroom(
        &self,
        classroom_id: ClassroomId,
        reason: Reason,
        on: NaiveDate,
        up_to: AwardId,
    ) -> Result<Vec<StudentId>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT student_id FROM awards
            WHERE classroom_id = ? AND reason = ? AND awarded_on = ? AND stars > 0
              AND seq <= (SELECT seq FROM awards WHERE id = ?)
            ORDER BY student_id
            "#,
        )
        .bind(classroom_id.to_string())
        .bind(reason.key())
        .bind(on.to_string())
        .bind(up_to.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("earners_in_classroom", e))?;

        Self::ids_from_rows(&rows)
    }

    async fn earners_in_guild(
        &self,
        guild_id: GuildId,
        reason: Reason,
        on: NaiveDate,
        up_to: AwardId,
    ) -> Result<Vec<StudentId>, RepoError> {
        let rows = sqlx::query(
            r#"
            SELECT DISTINCT a.student_id AS student_id
            FROM awards a
            JOIN guild_members m ON m.student_id = a.student_id
            WHERE m.guild_id = ? AND a.reason = ? AND a.awarded_on = ? AND a.stars > 0
              AND a.seq <= (SELECT seq FROM awards WHERE id = ?)
            ORDER BY a.student_id
            "#,
        )
        .bind(guild_id.key())
        .bind(reason.key())
        .bind(on.to_string())
        .bind(up_to.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("earners_in_guild", e))?;

        Self::ids_from_rows(&rows)
    }
}
