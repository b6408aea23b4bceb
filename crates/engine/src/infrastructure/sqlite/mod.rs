//! SQLite database implementations.
//!
//! One database file holds every table. Repositories share a pool and each
//! multi-row write runs in its own transaction.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode};
use sqlx::SqlitePool;

use crate::infrastructure::ports::{ClockPort, RepoError};

mod helpers;

mod award_repo;
mod guild_repo;
mod outbox_repo;
mod student_repo;


pub use award_repo::SqliteAwardRepo;
pub use guild_repo::SqliteGuildRepo;
pub use outbox_repo::SqliteOutboxRepo;
pub use student_repo::SqliteStudentRepo;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id TEXT PRIMARY KEY,
        classroom_id TEXT NOT NULL,
        display_name TEXT NOT NULL,
        guild_id TEXT,
        guild_assigned_at TEXT,
        total_stars INTEGER NOT NULL DEFAULT 0,
        monthly_stars INTEGER NOT NULL DEFAULT 0,
        monthly_stars_month TEXT,
        gold INTEGER NOT NULL DEFAULT 0,
        progress_json TEXT NOT NULL,
        version INTEGER NOT NULL DEFAULT 0,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_students_classroom ON students (classroom_id)",
    r#"
    CREATE TABLE IF NOT EXISTS guild_scores (
        guild_id TEXT PRIMARY KEY,
        total_stars INTEGER NOT NULL DEFAULT 0,
        member_count INTEGER NOT NULL DEFAULT 0,
        last_updated TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS guild_members (
        student_id TEXT PRIMARY KEY,
        guild_id TEXT NOT NULL,
        joined_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS awards (
        seq INTEGER PRIMARY KEY AUTOINCREMENT,
        id TEXT NOT NULL UNIQUE,
        student_id TEXT NOT NULL,
        classroom_id TEXT NOT NULL,
        guild_id TEXT,
        reason TEXT,
        stars INTEGER NOT NULL,
        awarded_on TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_awards_classroom_day ON awards (classroom_id, reason, awarded_on)",
    "CREATE INDEX IF NOT EXISTS idx_awards_student_day ON awards (student_id, reason, awarded_on)",
    r#"
    CREATE TABLE IF NOT EXISTS outbox (
        id TEXT PRIMARY KEY,
        kind TEXT NOT NULL,
        payload_json TEXT NOT NULL,
        status TEXT NOT NULL,
        attempts INTEGER NOT NULL DEFAULT 0,
        last_error TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_outbox_status ON outbox (status, created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS outbox_dedup (
        dedup_key TEXT PRIMARY KEY,
        entry_id TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS applied_grants (
        grant_key TEXT PRIMARY KEY,
        applied_at TEXT NOT NULL
    )
    "#,
];

/// Open (creating if missing) the database file and ensure the schema.
pub async fn connect(db_path: &str) -> Result<SqlitePool, RepoError> {
    let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path))
        .map_err(|e| RepoError::database("connect", e))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    let pool = SqlitePool::connect_with(options)
        .await
        .map_err(|e| RepoError::database("connect", e))?;

    ensure_schema(&pool).await?;
    Ok(pool)
}

pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("ensure_schema", e))?;
    }
    Ok(())
}

/// Create all SQLite repositories from one pool.
pub struct SqliteRepositories {
    pub students: Arc<SqliteStudentRepo>,
    pub guilds: Arc<SqliteGuildRepo>,
    pub awards: Arc<SqliteAwardRepo>,
    pub outbox: Arc<SqliteOutboxRepo>,
}

impl SqliteRepositories {
    pub fn new(pool: SqlitePool, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            students: Arc::new(SqliteStudentRepo::new(pool.clone(), clock.clone())),
            guilds: Arc::new(SqliteGuildRepo::new(pool.clone(), clock.clone())),
            awards: Arc::new(SqliteAwardRepo::new(pool.clone())),
            outbox: Arc::new(SqliteOutboxRepo::new(pool)),
        }
    }

    pub async fn open(db_path: &str, clock: Arc<dyn ClockPort>) -> Result<Self, RepoError> {
        let pool = connect(db_path).await?;
        Ok(Self::new(pool, clock))
    }
}
