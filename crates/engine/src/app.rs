//! Application state and composition.

use std::sync::Arc;

use crate::infrastructure::{
    config::EngineConfig,
    ports::{AwardRepo, ClockPort, GuildRepo, OutboxRepo, RandomPort, StudentRepo},
    sqlite::SqliteRepositories,
};
use crate::use_cases;

/// Main application state.
///
/// Holds the repository ports and every use case wired against them.
pub struct App {
    pub repositories: Repositories,
    pub use_cases: UseCases,
}

/// Container for all repository ports.
pub struct Repositories {
    pub students: Arc<dyn StudentRepo>,
    pub guilds: Arc<dyn GuildRepo>,
    pub awards: Arc<dyn AwardRepo>,
    pub outbox: Arc<dyn OutboxRepo>,
}

impl From<SqliteRepositories> for Repositories {
    fn from(repos: SqliteRepositories) -> Self {
        Self {
            students: repos.students,
            guilds: repos.guilds,
            awards: repos.awards,
            outbox: repos.outbox,
        }
    }
}

/// Container for all use cases.
pub struct UseCases {
    pub award: Arc<use_cases::AwardStars>,
    pub skills: use_cases::SkillUseCases,
    pub guilds: use_cases::GuildUseCases,
    pub drain_outbox: Arc<use_cases::DrainOutbox>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        repos: impl Into<Repositories>,
        clock: Arc<dyn ClockPort>,
        random: Arc<dyn RandomPort>,
        config: &EngineConfig,
    ) -> Self {
        let repositories: Repositories = repos.into();
        let students = repositories.students.clone();
        let guilds = repositories.guilds.clone();
        let awards = repositories.awards.clone();
        let outbox = repositories.outbox.clone();

        let award = Arc::new(use_cases::awards::AwardStars::new(
            students.clone(),
            awards.clone(),
            clock.clone(),
        ));

        let skills = use_cases::SkillUseCases::new(
            Arc::new(use_cases::skills::EnrollStudent::new(
                students.clone(),
                random.clone(),
            )),
            Arc::new(use_cases::skills::SelectHeroClass::new(students.clone())),
            Arc::new(use_cases::skills::ChooseSkill::new(students.clone())),
        );

        // Shared by the guild use cases and the outbox drain
        let credit_guild = Arc::new(use_cases::guilds::CreditGuild::new(
            students.clone(),
            guilds.clone(),
            clock.clone(),
        ));
        let guilds_uc = use_cases::GuildUseCases::new(
            Arc::new(use_cases::guilds::AssignGuild::new(
                students.clone(),
                guilds.clone(),
                clock.clone(),
            )),
            credit_guild.clone(),
            Arc::new(use_cases::guilds::GuildLeaderboard::new(
                students.clone(),
                guilds.clone(),
            )),
        );

        let drain_outbox = Arc::new(use_cases::outbox::DrainOutbox::new(
            outbox,
            students,
            guilds,
            awards,
            credit_guild,
            random,
            clock,
            config.max_attempts,
        ));

        Self {
            repositories,
            use_cases: UseCases {
                award,
                skills,
                guilds: guilds_uc,
                drain_outbox,
            },
        }
    }
}
