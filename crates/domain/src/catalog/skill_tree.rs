//! Skill tree definitions: ordered levels, each offering two permanent branches.

use std::collections::HashSet;

use super::effect::Effect;
use super::HeroClass;
use crate::error::DomainError;
use crate::progression;

/// One of the two mutually exclusive options at a level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillBranch {
    pub id: &'static str,
    pub name: &'static str,
    pub effect: Effect,
    /// Only top-tier branches carry a second effect.
    pub secondary: Option<Effect>,
}

impl SkillBranch {
    /// Primary effect followed by the secondary one, if any.
    pub fn effects(&self) -> impl Iterator<Item = &Effect> {
        std::iter::once(&self.effect).chain(self.secondary.iter())
    }
}

/// A rung of the ladder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillLevel {
    /// Stars in the class reason needed to unlock this level.
    pub threshold: u32,
    pub branches: [SkillBranch; 2],
}

impl SkillLevel {
    pub fn branch(&self, branch_id: &str) -> Option<&SkillBranch> {
        self.branches.iter().find(|b| b.id == branch_id)
    }
}

/// The ordered ladder of a hero class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillTree {
    pub class: HeroClass,
    pub levels: &'static [SkillLevel],
}

impl SkillTree {
    pub fn thresholds(&self) -> Vec<u32> {
        self.levels.iter().map(|l| l.threshold).collect()
    }

    /// Highest reachable level.
    pub fn max_level(&self) -> usize {
        self.levels.len()
    }

    pub fn level(&self, index: usize) -> Option<&SkillLevel> {
        self.levels.get(index)
    }

    /// Level reached with `stars_in_reason` stars.
    pub fn level_for(&self, stars_in_reason: u32) -> usize {
        progression::compute_level(&self.thresholds(), stars_in_reason)
    }

    pub fn stars_to_next_level(&self, level: usize, stars_in_reason: u32) -> Option<u32> {
        progression::stars_to_next_level(&self.thresholds(), level, stars_in_reason)
    }

    /// Locate a branch anywhere in the tree.
    pub fn find_branch(&self, branch_id: &str) -> Option<(usize, &SkillBranch)> {
        self.levels
            .iter()
            .enumerate()
            .find_map(|(idx, level)| level.branch(branch_id).map(|b| (idx, b)))
    }

    /// Check the static shape of the tree.
    ///
    /// Thresholds must be strictly increasing, branch ids unique, and only the
    /// last level may carry secondary effects.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.levels.is_empty() {
            return Err(DomainError::validation(format!(
                "skill tree for {} has no levels",
                self.class
            )));
        }

        for pair in self.levels.windows(2) {
            if pair[1].threshold <= pair[0].threshold {
                return Err(DomainError::validation(format!(
                    "skill tree for {} has non-increasing thresholds {} -> {}",
                    self.class, pair[0].threshold, pair[1].threshold
                )));
            }
        }

        let mut seen = HashSet::new();
        let top = self.levels.len() - 1;
        for (idx, level) in self.levels.iter().enumerate() {
            for branch in &level.branches {
                if !seen.insert(branch.id) {
                    return Err(DomainError::validation(format!(
                        "duplicate branch id {} in {} tree",
                        branch.id, self.class
                    )));
                }
                if branch.secondary.is_some() && idx != top {
                    return Err(DomainError::validation(format!(
                        "branch {} below the top tier carries a secondary effect",
                        branch.id
                    )));
                }
            }
        }

        Ok(())
    }
}
