//! Enroll student use case.

use std::sync::Arc;

use classquest_domain::{ClassroomId, StudentId, StudentProgress};

use super::SkillError;
use crate::infrastructure::ports::{RandomPort, StudentRepo};

pub struct EnrollStudent {
    students: Arc<dyn StudentRepo>,
    random: Arc<dyn RandomPort>,
}

impl EnrollStudent {
    pub fn new(students: Arc<dyn StudentRepo>, random: Arc<dyn RandomPort>) -> Self {
        Self { students, random }
    }

    /// Create a student with no hero class, no guild and zeroed counters.
    pub async fn execute(
        &self,
        classroom_id: ClassroomId,
        display_name: &str,
    ) -> Result<StudentProgress, SkillError> {
        let id = StudentId::from_uuid(self.random.gen_uuid());
        let student = StudentProgress::new(id, classroom_id, display_name)?;
        self.students.save(&student).await?;

        tracing::info!(
            student_id = %id,
            classroom_id = %classroom_id,
            "Student enrolled"
        );
        Ok(student)
    }
}
