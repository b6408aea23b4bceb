//! Guild leaderboard use case.

use std::sync::Arc;

use classquest_domain::{project_leaderboard, LeaderboardEntry, RosterSnapshot};

use super::GuildError;
use crate::infrastructure::ports::{GuildRepo, StudentRepo};

pub struct GuildLeaderboard {
    students: Arc<dyn StudentRepo>,
    guilds: Arc<dyn GuildRepo>,
}

impl GuildLeaderboard {
    pub fn new(students: Arc<dyn StudentRepo>, guilds: Arc<dyn GuildRepo>) -> Self {
        Self { students, guilds }
    }

    /// All four guilds, highest season total first.
    pub async fn execute(&self) -> Result<Vec<LeaderboardEntry>, GuildError> {
        let aggregates = self.guilds.list().await?;
        let students = self.students.list_all().await?;
        let roster = RosterSnapshot::from_students(&students);
        Ok(project_leaderboard(&aggregates, &roster))
    }
}
