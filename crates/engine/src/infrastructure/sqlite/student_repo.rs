//! SQLite implementation of the Student repository.
//!
//! The progress document is stored as JSON. Running totals and guild
//! membership live in their own columns so that awards and peer grants can
//! update them with atomic increments; on read those columns win over any
//! copy inside the document.
//!
//! Writes of the document itself are guarded by the `version` column: a
//! copy read at an older version is rejected with `RepoError::Conflict`.

use std::sync::Arc;

use async_trait::async_trait;
use classquest_domain::{ClassroomId, GuildId, MonthKey, StudentCounters, StudentId, StudentProgress};
use sqlx::sqlite::SqliteRow;
use sqlx::SqlitePool;

use super::helpers::{column, from_json, from_sql_int, parse_opt, parse_time_opt, to_json, to_sql_int};
use crate::infrastructure::ports::{ClockPort, RepoError, StudentRepo};

const SELECT_STUDENT: &str = r#"
    SELECT id, guild_id, guild_assigned_at, total_stars, monthly_stars,
           monthly_stars_month, gold, progress_json, version
    FROM students
"#;

pub struct SqliteStudentRepo {
    pool: SqlitePool,
    clock: Arc<dyn ClockPort>,
}

impl SqliteStudentRepo {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self { pool, clock }
    }

    fn row_to_student(row: &SqliteRow) -> Result<StudentProgress, RepoError> {
        let json: String = column(row, "progress_json")?;
        let progress: StudentProgress = from_json(&json)?;

        let counters = StudentCounters {
            total_stars: from_sql_int(column(row, "total_stars")?),
            monthly_stars: from_sql_int(column(row, "monthly_stars")?),
            monthly_stars_month: parse_opt::<MonthKey>(column(row, "monthly_stars_month")?)?,
            gold: column(row, "gold")?,
        };
        let guild_id = parse_opt::<GuildId>(column(row, "guild_id")?)?;
        let assigned_at = parse_time_opt(column(row, "guild_assigned_at")?)?;

        Ok(progress
            .with_counters(counters)
            .with_guild(guild_id, assigned_at)
            .with_version(from_sql_int(column(row, "version")?)))
    }
}

#[async_trait]
impl StudentRepo for SqliteStudentRepo {
    async fn get(&self, id: StudentId) -> Result<Option<StudentProgress>, RepoError> {
        let row = sqlx::query(&format!("{SELECT_STUDENT} WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("student_get", e))?;

        row.as_ref().map(Self::row_to_student).transpose()
    }

    async fn save(&self, student: &StudentProgress) -> Result<(), RepoError> {
        let json = to_json(student)?;
        let counters = student.counters();
        let now = self.clock.now().to_rfc3339();

        let written = sqlx::query(
            r#"
            INSERT INTO students (
                id, classroom_id, display_name, guild_id, guild_assigned_at,
                total_stars, monthly_stars, monthly_stars_month, gold,
                progress_json, version, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                classroom_id = excluded.classroom_id,
                display_name = excluded.display_name,
                progress_json = excluded.progress_json,
                version = students.version + 1,
                updated_at = excluded.updated_at
            WHERE students.version = excluded.version
            "#,
        )
        .bind(student.id().to_string())
        .bind(student.classroom_id().to_string())
        .bind(student.display_name())
        .bind(student.guild_id().map(|g| g.key()))
        .bind(student.guild_assigned_at().map(|at| at.to_rfc3339()))
        .bind(to_sql_int(counters.total_stars))
        .bind(to_sql_int(counters.monthly_stars))
        .bind(counters.monthly_stars_month.map(|m| m.to_string()))
        .bind(counters.gold)
        .bind(json)
        .bind(to_sql_int(student.version()))
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("student_save", e))?
        .rows_affected();

        if written == 0 {
            tracing::debug!(
                student_id = %student.id(),
                version = student.version(),
                "Stale progress document rejected"
            );
            return Err(RepoError::conflict("Student", student.id()));
        }

        Ok(())
    }

    async fn list_in_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> Result<Vec<StudentProgress>, RepoError> {
        let rows = sqlx::query(&format!(
            "{SELECT_STUDENT} WHERE classroom_id = ? ORDER BY display_name, id"
        ))
        .bind(classroom_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("student_list_in_classroom", e))?;

        rows.iter().map(Self::row_to_student).collect()
    }

    async fn list_all(&self) -> Result<Vec<StudentProgress>, RepoError> {
        let rows = sqlx::query(&format!("{SELECT_STUDENT} ORDER BY display_name, id"))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("student_list_all", e))?;

        rows.iter().map(Self::row_to_student).collect()
    }

    async fn grant_gold(
        &self,
        grant_key: &str,
        student_id: StudentId,
        amount: i64,
    ) -> Result<bool, RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("grant_gold", e))?;

        let claimed = sqlx::query(
            "INSERT INTO applied_grants (grant_key, applied_at) VALUES (?, ?) \
             ON CONFLICT(grant_key) DO NOTHING",
        )
        .bind(grant_key)
        .bind(self.clock.now().to_rfc3339())
        .execute(&mut *tx)
        .await
        .map_err(|e| RepoError::database("grant_gold", e))?
        .rows_affected();

        if claimed == 0 {
            return Ok(false);
        }

        let updated = sqlx::query("UPDATE students SET gold = gold + ? WHERE id = ?")
            .bind(amount)
            .bind(student_id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("grant_gold", e))?
            .rows_affected();

        if updated == 0 {
            // Dropping the transaction rolls back the claimed key.
            return Err(RepoError::not_found("Student", student_id));
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("grant_gold", e))?;

        tracing::debug!(
            student_id = %student_id,
            grant_key = %grant_key,
            amount,
            "Gold granted"
        );
        Ok(true)
    }
}
