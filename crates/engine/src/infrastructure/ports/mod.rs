//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Database access (students, guilds, awards, outbox)
//! - Clock/Random (for testing)

mod error;
mod repos;
mod testing;
pub mod types;

// =============================================================================
// Repository Ports
// =============================================================================
pub use repos::{AwardRepo, GuildRepo, OutboxRepo, StudentRepo};

pub use types::{
    monthly_bonus_key, AwardCommit, CommitReceipt, NewOutboxEntry, OutboxEntry, OutboxPayload,
    OutboxStatus,
};

// =============================================================================
// Test-Only Mock Repositories (only available during test builds)
// =============================================================================
#[cfg(test)]
pub use repos::{MockAwardRepo, MockGuildRepo, MockOutboxRepo, MockStudentRepo};

#[cfg(test)]
pub use testing::MockClockPort;

// =============================================================================
// Testing Ports
// =============================================================================
pub use testing::{ClockPort, RandomPort};

// =============================================================================
// Error Types
// =============================================================================
pub use error::RepoError;
