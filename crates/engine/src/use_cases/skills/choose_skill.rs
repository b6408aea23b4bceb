//! Choose skill use case.

use std::sync::Arc;

use classquest_domain::{SkillChoice, StudentId};

use super::SkillError;
use crate::infrastructure::ports::StudentRepo;

pub struct ChooseSkill {
    students: Arc<dyn StudentRepo>,
}

impl ChooseSkill {
    pub fn new(students: Arc<dyn StudentRepo>) -> Self {
        Self { students }
    }

    pub async fn execute(
        &self,
        student_id: StudentId,
        level: usize,
        branch_id: &str,
    ) -> Result<SkillChoice, SkillError> {
        let mut student = self
            .students
            .get(student_id)
            .await?
            .ok_or(SkillError::StudentNotFound(student_id))?;

        let choice = student.choose_skill(level, branch_id)?;

        if let SkillChoice::Chosen { level, branch_id } = &choice {
            self.students.save(&student).await?;
            tracing::info!(
                student_id = %student_id,
                level = *level,
                branch = %branch_id,
                still_pending = student.pending_skill_choice(),
                "Skill chosen"
            );
        }
        Ok(choice)
    }
}
