//! Guild use cases: sorting quiz, star credits, and the season leaderboard.

use std::sync::Arc;

use classquest_domain::{GuildAssignmentError, QuizError, StudentId};

use crate::infrastructure::ports::RepoError;

mod assign_guild;
mod credit_guild;
mod leaderboard;

pub use assign_guild::AssignGuild;
pub use credit_guild::CreditGuild;
pub use leaderboard::GuildLeaderboard;

/// Container for guild use cases.
pub struct GuildUseCases {
    pub assign: Arc<AssignGuild>,
    pub credit: Arc<CreditGuild>,
    pub leaderboard: Arc<GuildLeaderboard>,
}

impl GuildUseCases {
    pub fn new(
        assign: Arc<AssignGuild>,
        credit: Arc<CreditGuild>,
        leaderboard: Arc<GuildLeaderboard>,
    ) -> Self {
        Self {
            assign,
            credit,
            leaderboard,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GuildError {
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),
    #[error("Quiz error: {0}")]
    Quiz(#[from] QuizError),
    #[error("Guild already assigned: {0}")]
    AlreadyAssigned(#[from] GuildAssignmentError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
