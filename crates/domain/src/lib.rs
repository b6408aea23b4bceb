//! ClassQuest domain: hero classes, skill trees, award rules and guilds.
//!
//! Everything here is synchronous and free of I/O. The engine crate owns
//! persistence, clocks and randomness.

pub mod aggregates;
pub mod award;
pub mod catalog;
pub mod error;
pub mod ids;
pub mod progression;
pub mod quiz;
pub mod roster;
pub mod rules;
pub mod value_objects;

pub use aggregates::{
    project_leaderboard, Contributor, GuildAggregate, GuildAssignment, LeaderboardEntry,
    LevelChange, SkillChoice, StudentCounters, StudentProgress,
};
pub use award::AwardEvent;
pub use catalog::{
    ClassDefinition, Effect, HeroClass, OutwardEffect, SkillBranch, SkillLevel, SkillTree,
    CLASS_DEFINITIONS,
};
pub use error::{DomainError, GuildAssignmentError, HeroClassError, QuizError, SkillChoiceError};
pub use ids::{AwardId, ClassroomId, OutboxEntryId, StudentId};
pub use progression::{compute_level, stars_to_next_level};
pub use quiz::{assign_guild, QuizAnswer, QuizOption, QuizQuestion, QuizSession};
pub use roster::{RosterMember, RosterSnapshot};
pub use rules::{enumerate_outward_effects, resolve_direct_bonus, DirectBonus};
pub use value_objects::{GuildId, MonthKey, Reason, GUILD_DECLARATION_ORDER};
