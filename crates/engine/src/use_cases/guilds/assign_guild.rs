//! Assign guild use case.

use std::sync::Arc;

use classquest_domain::{GuildAssignment, GuildId, QuizSession, StudentId};

use super::GuildError;
use crate::infrastructure::ports::{ClockPort, GuildRepo, StudentRepo};

/// Sorts a student into a guild once, permanently.
pub struct AssignGuild {
    students: Arc<dyn StudentRepo>,
    guilds: Arc<dyn GuildRepo>,
    clock: Arc<dyn ClockPort>,
}

impl AssignGuild {
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

    /// Finish a completed quiz and persist its guild.
    pub async fn execute(
        &self,
        student_id: StudentId,
        session: &QuizSession,
    ) -> Result<GuildAssignment, GuildError> {
        let guild_id = session.finish()?;
        self.assign(student_id, guild_id).await
    }

    /// Persist a guild directly. The same guild again is a no-op; a different
    /// one is rejected.
    pub async fn assign(
        &self,
        student_id: StudentId,
        guild_id: GuildId,
    ) -> Result<GuildAssignment, GuildError> {
        let mut student = self
            .students
            .get(student_id)
            .await?
            .ok_or(GuildError::StudentNotFound(student_id))?;

        let now = self.clock.now();
        let assignment = student.assign_guild(guild_id, now)?;

        if let GuildAssignment::Assigned(guild_id) = assignment {
            self.guilds.assign_member(student_id, guild_id, now).await?;
            tracing::info!(
                student_id = %student_id,
                guild = %guild_id,
                "Student sorted into guild"
            );
        }

        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockGuildRepo, MockStudentRepo};
    use classquest_domain::{ClassroomId, QuizError, QuizOption, QuizQuestion, StudentProgress};

    fn student(guild: Option<GuildId>) -> StudentProgress {
        StudentProgress::new(StudentId::new(), ClassroomId::new(), "Kit")
            .unwrap()
            .with_guild(guild, None)
    }

    fn one_question_session(weights: &[(&str, i32)]) -> QuizSession {
        QuizSession::start(vec![QuizQuestion {
            prompt: "Choose".into(),
            options: vec![QuizOption {
                text: "Only".into(),
                weights: weights.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            }],
        }])
        .unwrap()
    }

    fn use_case(students: MockStudentRepo, guilds: MockGuildRepo) -> AssignGuild {
        AssignGuild::new(
            Arc::new(students),
            Arc::new(guilds),
            Arc::new(FixedClock::on(2026, 9, 1)),
        )
    }

    #[tokio::test]
    async fn completed_quiz_assigns_and_records_membership() {
        let s = student(None);
        let id = s.id();
        let mut students = MockStudentRepo::new();
        students
            .expect_get()
            .withf(move |sid| *sid == id)
            .returning(move |_| Ok(Some(s.clone())));

        let mut guilds = MockGuildRepo::new();
        guilds
            .expect_assign_member()
            .withf(move |sid, g, _| *sid == id && *g == GuildId::Storm)
            .times(1)
            .returning(|_, _, _| Ok(()));

        let mut session = one_question_session(&[("storm", 4), ("tide", 1)]);
        session.answer(0, 0).unwrap();

        let result = use_case(students, guilds).execute(id, &session).await.unwrap();
        assert_eq!(result, GuildAssignment::Assigned(GuildId::Storm));
    }

    #[tokio::test]
    async fn incomplete_quiz_is_rejected_before_loading() {
        let session = one_question_session(&[("storm", 4)]);
        let result = use_case(MockStudentRepo::new(), MockGuildRepo::new())
            .execute(StudentId::new(), &session)
            .await;
        assert!(matches!(
            result,
            Err(GuildError::Quiz(QuizError::Incomplete { .. }))
        ));
    }

    #[tokio::test]
    async fn same_guild_again_is_idempotent() {
        let s = student(Some(GuildId::Tide));
        let id = s.id();
        let mut students = MockStudentRepo::new();
        students
            .expect_get()
            .returning(move |_| Ok(Some(s.clone())));
        let mut guilds = MockGuildRepo::new();
        guilds.expect_assign_member().never();

        let result = use_case(students, guilds)
            .assign(id, GuildId::Tide)
            .await
            .unwrap();
        assert_eq!(result, GuildAssignment::Unchanged(GuildId::Tide));
    }

    #[tokio::test]
    async fn different_guild_is_rejected() {
        let s = student(Some(GuildId::Tide));
        let id = s.id();
        let mut students = MockStudentRepo::new();
        students
            .expect_get()
            .returning(move |_| Ok(Some(s.clone())));
        let mut guilds = MockGuildRepo::new();
        guilds.expect_assign_member().never();

        let result = use_case(students, guilds).assign(id, GuildId::Ember).await;
        assert!(matches!(result, Err(GuildError::AlreadyAssigned(_))));
    }

    #[tokio::test]
    async fn unknown_student_is_an_error() {
        let mut students = MockStudentRepo::new();
        students.expect_get().returning(|_| Ok(None));

        let result = use_case(students, MockGuildRepo::new())
            .assign(StudentId::new(), GuildId::Grove)
            .await;
        assert!(matches!(result, Err(GuildError::StudentNotFound(_))));
    }
}
