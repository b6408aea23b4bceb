//! Use cases - classroom story orchestration.
//!
//! Each module contains use cases for one area. Use cases load aggregates
//! through port traits, apply domain rules, and persist the result.

pub mod awards;
pub mod guilds;
pub mod outbox;
pub mod skills;

pub use awards::AwardStars;
pub use guilds::GuildUseCases;
pub use outbox::DrainOutbox;
pub use skills::SkillUseCases;
