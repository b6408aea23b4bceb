//! Select hero class use case.

use std::sync::Arc;

use classquest_domain::{HeroClass, LevelChange, StudentId};

use super::SkillError;
use crate::infrastructure::ports::StudentRepo;

pub struct SelectHeroClass {
    students: Arc<dyn StudentRepo>,
}

impl SelectHeroClass {
    pub fn new(students: Arc<dyn StudentRepo>) -> Self {
        Self { students }
    }

    /// Pick (or re-pick) a hero class; `lock` freezes it immediately.
    ///
    /// Switching classes resets the level ladder. Once locked, only the same
    /// class is accepted.
    pub async fn execute(
        &self,
        student_id: StudentId,
        class: HeroClass,
        lock: bool,
    ) -> Result<LevelChange, SkillError> {
        let mut student = self
            .students
            .get(student_id)
            .await?
            .ok_or(SkillError::StudentNotFound(student_id))?;

        let previous = student.hero_class();
        let change = student.select_hero_class(class)?;
        if lock {
            student.lock_hero_class()?;
        }
        self.students.save(&student).await?;

        tracing::info!(
            student_id = %student_id,
            previous = ?previous,
            class = %class,
            level = change.current,
            locked = student.is_hero_class_locked(),
            "Hero class selected"
        );
        Ok(change)
    }
}
