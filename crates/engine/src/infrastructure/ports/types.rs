//! Records exchanged across repository ports.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use classquest_domain::{
    AwardId, ClassroomId, GuildId, MonthKey, OutboxEntryId, OutwardEffect, Reason,
    StudentProgress, StudentId,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Outbox
// =============================================================================

/// Work deferred from an award transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutboxPayload {
    /// A peer-targeting skill effect triggered by `source`'s award.
    Outward {
        /// The triggering award; peer lookups see the ledger as of this award.
        award: AwardId,
        source: StudentId,
        classroom: ClassroomId,
        /// The source student's guild when the award was made.
        guild: Option<GuildId>,
        reason: Reason,
        awarded_on: NaiveDate,
        effect: OutwardEffect,
    },
    /// Stars owed to the student's guild total.
    GuildCredit { student: StudentId, stars: u64 },
}

impl OutboxPayload {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Outward { effect, .. } => effect.kind(),
            Self::GuildCredit { .. } => "guild_credit",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Waiting to be applied, including entries that failed and will retry.
    Pending,
    Applied,
    /// Gave up after the maximum number of attempts.
    Dead,
}

impl OutboxStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Applied => "applied",
            Self::Dead => "dead",
        }
    }
}

impl fmt::Display for OutboxStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OutboxStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "applied" => Ok(Self::Applied),
            "dead" => Ok(Self::Dead),
            other => Err(format!("Unknown outbox status: {}", other)),
        }
    }
}

/// A stored outbox row.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxEntry {
    pub id: OutboxEntryId,
    pub payload: OutboxPayload,
    pub status: OutboxStatus,
    pub attempts: u32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An outbox row to insert as part of an award commit.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOutboxEntry {
    pub id: OutboxEntryId,
    pub payload: OutboxPayload,
    /// When set, the row is inserted only if this key was never seen before.
    pub dedup_key: Option<String>,
}

impl NewOutboxEntry {
    pub fn new(payload: OutboxPayload) -> Self {
        Self {
            id: OutboxEntryId::new(),
            payload,
            dedup_key: None,
        }
    }

    pub fn with_dedup_key(mut self, key: impl Into<String>) -> Self {
        self.dedup_key = Some(key.into());
        self
    }
}

/// Dedup key for the monthly guild bonus of one skill.
pub fn monthly_bonus_key(student: StudentId, month: MonthKey, branch_id: &str) -> String {
    format!("guild_bonus:{}:{}:{}", student, month, branch_id)
}

// =============================================================================
// Awards
// =============================================================================

/// Everything one award writes, committed in a single transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct AwardCommit {
    pub award_id: AwardId,
    pub student_id: StudentId,
    pub classroom_id: ClassroomId,
    pub guild_id: Option<GuildId>,
    pub reason: Option<Reason>,
    pub awarded_on: NaiveDate,
    /// Stars as awarded, recorded in the ledger.
    pub stars: u64,
    /// Stars added to total and monthly counters, bonus stars included.
    pub star_increment: u64,
    pub gold_increment: i64,
    /// Progress document after the award was applied.
    pub progress: StudentProgress,
    pub outbox: Vec<NewOutboxEntry>,
    pub committed_at: DateTime<Utc>,
}

impl AwardCommit {
    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.awarded_on)
    }
}

/// What the award transaction actually enqueued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CommitReceipt {
    pub enqueued: usize,
    /// Entries dropped because their dedup key was already taken.
    pub deduplicated: usize,
}
