//! Credit guild use case.

use std::sync::Arc;

use classquest_domain::StudentId;

use super::GuildError;
use crate::infrastructure::ports::{ClockPort, GuildRepo, StudentRepo};

/// Adds a student's awarded stars to their guild's season total.
pub struct CreditGuild {
    students: Arc<dyn StudentRepo>,
    guilds: Arc<dyn GuildRepo>,
    clock: Arc<dyn ClockPort>,
}

impl CreditGuild {
    pub fn new(
        students: Arc<dyn StudentRepo>,
        guilds: Arc<dyn GuildRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            students,
            guilds,
            clock,
        }
    }

    /// Returns `true` when the guild total changed.
    ///
    /// A non-positive delta, an unknown student, a student without a guild, or
    /// an already-used `credit_key` all leave the totals untouched.
    pub async fn execute(
        &self,
        credit_key: &str,
        student_id: StudentId,
        star_delta: i64,
    ) -> Result<bool, GuildError> {
        let Ok(stars) = u64::try_from(star_delta) else {
            return Ok(false);
        };
        if stars == 0 {
            return Ok(false);
        }

        let Some(student) = self.students.get(student_id).await? else {
            tracing::debug!(student_id = %student_id, "Guild credit skipped: unknown student");
            return Ok(false);
        };
        let Some(guild_id) = student.guild_id() else {
            return Ok(false);
        };

        let credited = self
            .guilds
            .credit_stars(credit_key, guild_id, stars, self.clock.now())
            .await?;

        if credited {
            tracing::debug!(
                student_id = %student_id,
                guild = %guild_id,
                stars,
                "Guild credited"
            );
        }
        Ok(credited)
    }
}
