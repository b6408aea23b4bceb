//! Aggregate roots - domain objects that own their related data
//!
//! Each aggregate:
//! - Has a unique identity
//! - Owns all its constituent parts
//! - Exposes behavior through methods, not public fields
//! - Returns outcome enums from mutations

pub mod guild;
pub mod student;

pub use guild::{project_leaderboard, Contributor, GuildAggregate, LeaderboardEntry};
pub use student::{GuildAssignment, LevelChange, SkillChoice, StudentCounters, StudentProgress};
