//! Repository port traits for database access.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use classquest_domain::{
    AwardId, ClassroomId, GuildAggregate, GuildId, OutboxEntryId, Reason, StudentId,
    StudentProgress,
};

use super::error::RepoError;
use super::types::{AwardCommit, CommitReceipt, OutboxEntry, OutboxStatus};

// =============================================================================
// Students
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepo: Send + Sync {
    async fn get(&self, id: StudentId) -> Result<Option<StudentProgress>, RepoError>;

    /// Insert a new record or replace the progress document of an existing
    /// one. Counters and guild columns of an existing record are left alone.
    ///
    /// Fails with `Conflict` if the stored record moved past `student.version()`.
    async fn save(&self, student: &StudentProgress) -> Result<(), RepoError>;

    async fn list_in_classroom(
        &self,
        classroom_id: ClassroomId,
    ) -> Result<Vec<StudentProgress>, RepoError>;
    async fn list_all(&self) -> Result<Vec<StudentProgress>, RepoError>;

    /// Add gold once per `grant_key`. Returns `false` if the key was already used.
    async fn grant_gold(
        &self,
        grant_key: &str,
        student_id: StudentId,
        amount: i64,
    ) -> Result<bool, RepoError>;
}

// =============================================================================
// Guilds
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GuildRepo: Send + Sync {
    async fn get(&self, guild_id: GuildId) -> Result<Option<GuildAggregate>, RepoError>;

    /// Every guild that has a record. Guilds never touched are absent.
    async fn list(&self) -> Result<Vec<GuildAggregate>, RepoError>;

    /// Atomically add stars once per `credit_key`, creating the record on
    /// demand. Returns `false` if the key was already used.
    async fn credit_stars(
        &self,
        credit_key: &str,
        guild_id: GuildId,
        stars: u64,
        at: DateTime<Utc>,
    ) -> Result<bool, RepoError>;

    /// Record membership and the student's guild in one transaction.
    ///
    /// Fails with `ConstraintViolation` if the student already belongs to a
    /// different guild. The same guild again is a no-op.
    async fn assign_member(
        &self,
        student_id: StudentId,
        guild_id: GuildId,
        at: DateTime<Utc>,
    ) -> Result<(), RepoError>;
}

// =============================================================================
// Awards
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AwardRepo: Send + Sync {
    /// Fails with `Conflict` when the student row moved past
    /// `commit.progress.version()`, and with `NotFound` when it is gone.
    async fn commit(&self, commit: &AwardCommit) -> Result<CommitReceipt, RepoError>;

    /// Students in the classroom credited stars for `reason` on `on`, counting
    /// only awards recorded no later than `up_to`.
    async fn earners_in_classroom(
        &self,
        classroom_id: ClassroomId,
        reason: Reason,
        on: NaiveDate,
        up_to: AwardId,
    ) -> Result<Vec<StudentId>, RepoError>;

    /// Students of the guild credited stars for `reason` on `on`, counting
    /// only awards recorded no later than `up_to`.
    async fn earners_in_guild(
        &self,
        guild_id: GuildId,
        reason: Reason,
        on: NaiveDate,
        up_to: AwardId,
    ) -> Result<Vec<StudentId>, RepoError>;
}

// =============================================================================
// Outbox
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OutboxRepo: Send + Sync {
    /// Oldest pending entries first.
    async fn fetch_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, RepoError>;
    async fn mark_applied(&self, id: OutboxEntryId, at: DateTime<Utc>) -> Result<(), RepoError>;

    /// Record a failed attempt. Returns the resulting status, `Dead` once
    /// `max_attempts` is reached.
    async fn mark_failed(
        &self,
        id: OutboxEntryId,
        error: &str,
        at: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<OutboxStatus, RepoError>;

    async fn count_by_status(&self, status: OutboxStatus) -> Result<u64, RepoError>;
}
