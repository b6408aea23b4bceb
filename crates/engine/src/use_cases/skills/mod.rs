//! Student progression use cases: enrollment, hero class and skill choices.

use std::sync::Arc;

use classquest_domain::{DomainError, HeroClassError, SkillChoiceError, StudentId};

use crate::infrastructure::ports::RepoError;

mod choose_skill;
mod enroll_student;
mod select_hero_class;

pub use choose_skill::ChooseSkill;
pub use enroll_student::EnrollStudent;
pub use select_hero_class::SelectHeroClass;

/// Container for progression use cases.
pub struct SkillUseCases {
    pub enroll: Arc<EnrollStudent>,
    pub select_class: Arc<SelectHeroClass>,
    pub choose: Arc<ChooseSkill>,
}

impl SkillUseCases {
    pub fn new(
        enroll: Arc<EnrollStudent>,
        select_class: Arc<SelectHeroClass>,
        choose: Arc<ChooseSkill>,
    ) -> Self {
        Self {
            enroll,
            select_class,
            choose,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SkillError {
    #[error("Student not found: {0}")]
    StudentNotFound(StudentId),
    #[error("Skill choice rejected: {0}")]
    Choice(#[from] SkillChoiceError),
    #[error("Hero class change rejected: {0}")]
    HeroClass(#[from] HeroClassError),
    #[error("Invalid student: {0}")]
    Domain(#[from] DomainError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
