//! SQLite implementation of the Guild repository.
//!
//! - `guild_scores`: one row per guild, created on first credit or member
//! - `guild_members`: keyed by student, so a student can join only one guild

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classquest_domain::{GuildAggregate, GuildId, StudentId};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::{column, from_sql_int, parse, parse_time_opt, to_sql_int};
use crate::infrastructure::ports::{ClockPort, GuildRepo, RepoError};

pub struct SqliteGuildRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

struct ScoreRow {
    guild_id: GuildId,
    total_stars: u64,
    last_updated: Option<DateTime<Utc>>,
}

impl SqliteGuildRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }

    fn row_to_score(row: &SqliteRow) -> Result<ScoreRow, RepoError> {
        let guild_id: String = column(row, "guild_id")?;
        Ok(ScoreRow {
            guild_id: parse(&guild_id)?,
            total_stars: from_sql_int(column(row, "total_stars")?),
            last_updated: parse_time_opt(column(row, "last_updated")?)?,
        })
    }

    async fn members_by_guild(&self) -> Result<BTreeMap<GuildId, BTreeSet<StudentId>>, RepoError> {
        let rows = sqlx::query("SELECT student_id, guild_id FROM guild_members")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("guild_members", e))?;

        let mut members: BTreeMap<GuildId, BTreeSet<StudentId>> = BTreeMap::new();
        for row in &rows {
            let student: String = column(row, "student_id")?;
            let guild: String = column(row, "guild_id")?;
            members
                .entry(parse(&guild)?)
                .or_default()
                .insert(parse(&student)?);
        }
        Ok(members)
    }
}

#[async_trait]
impl GuildRepo for SqliteGuildRepo {
    async fn get(&self, guild_id: GuildId) -> Result<Option<GuildAggregate>, RepoError> {
        let Some(row) = sqlx::query(
            "SELECT guild_id, total_stars, last_updated FROM guild_scores WHERE guild_id = ?",
        )
        .bind(guild_id.key())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("guild_get", e))?
        else {
            return Ok(None);
        };
        let score = Self::row_to_score(&row)?;

        let member_rows = sqlx::query("SELECT student_id FROM guild_members WHERE guild_id = ?")
            .bind(guild_id.key())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("guild_get", e))?;
        let members = member_rows
            .iter()
            .map(|row| {
                let id: String = column(row, "student_id")?;
                parse::<StudentId>(&id)
            })
            .collect::<Result<BTreeSet<_>, _>>()?;

        Ok(Some(GuildAggregate::from_parts(
            score.guild_id,
            score.total_stars,
            members,
            score.last_updated,
        )))
    }

    async fn list(&self) -> Result<Vec<GuildAggregate>, RepoError> {
        let rows = sqlx::query("SELECT guild_id, total_stars, last_updated FROM guild_scores")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("guild_list", e))?;
        let mut members = self.members_by_guild().await?;

        rows.iter()
            .map(|row| {
                let score = Self::row_to_score(row)?;
                Ok(GuildAggregate::from_parts(
                    score.guild_id,
                    score.total_stars,
                    members.remove(&score.guild_id).unwrap_or_default(),
                    score.last_updated,
                ))
            })
            .collect()
    }

    async fn credit_stars(
        &self,
        credit_key: &str,
        guild_id: GuildId,
        stars: u64,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError> {
        if stars == 0 {
            return Ok(false);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("credit_stars", e))?;

        let claimed = sqlx::query(
            "INSERT INTO applied_grants (grant_key, applied_at) VALUES (?, ?) \
             ON CONFLICT(grant_key) DO NOTHING",
        )
        .bind(credit_key)
        .bind(self.clock.now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("credit_stars", e))?
        .rows_affected();

        if claimed == 0 {
            return Ok(false);
        }

        sqlx::query(
            r#"
            INSERT INTO guild_scores (guild_id, total_stars, member_count, last_updated)
            VALUES (?, ?, 0, ?)
            ON CONFLICT(guild_id) DO UPDATE SET
                total_stars = guild_scores.total_stars + excluded.total_stars,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(guild_id.key())
        .bind(to_sql_int(stars))
        .bind(at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("credit_stars", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("credit_stars", e))?;
        Ok(true)
    }

    async fn assign_member(
        &self,
        student_id: StudentId,
        guild_id: GuildId,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("assign_member", e))?;

        let existing: Option<String> =
            sqlx::query_scalar("SELECT guild_id FROM guild_members WHERE student_id = ?")
                .bind(student_id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| RepoError::database("assign_member", e))?;

        if let Some(existing) = existing {
            if existing == guild_id.key() {
                return Ok(());
            }
            return Err(RepoError::constraint(format!(
                "student {} already belongs to guild {}",
                student_id, existing
            )));
        }

        let updated = sqlx::query(
            "UPDATE students SET guild_id = ?, guild_assigned_at = ? \
             WHERE id = ? AND guild_id IS NULL",
        )
        .bind(guild_id.key())
        .bind(at.to_rfc3339())
        .bind(student_id.to_string())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("assign_member", e))?
        .rows_affected();

        if updated == 0 {
            return Err(RepoError::not_found("Student", student_id));
        }

        sqlx::query("INSERT INTO guild_members (student_id, guild_id, joined_at) VALUES (?, ?, ?)")
            .bind(student_id.to_string())
            .bind(guild_id.key())
            .bind(at.to_rfc3339())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("assign_member", e))?;

        sqlx::query(
            r#"
            INSERT INTO guild_scores (guild_id, total_stars, member_count, last_updated)
            VALUES (?, 0, 1, ?)
            ON CONFLICT(guild_id) DO UPDATE SET
                member_count = guild_scores.member_count + 1,
                last_updated = excluded.last_updated
            "#,
        )
        .bind(guild_id.key())
        .bind(at.to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("assign_member", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("assign_member", e))?;

        tracing::info!(student_id = %student_id, guild = %guild_id, "Guild member added");
        Ok(())
    }
}
