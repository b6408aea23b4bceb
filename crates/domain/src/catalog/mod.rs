//! Effect catalog - hero classes, their flat bonuses, and their skill ladders.
//!
//! Everything here is static and declared once. Student state refers back into
//! the catalog by [`HeroClass`] and by branch id.

mod effect;
mod skill_tree;
mod trees;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::Reason;

pub use effect::{Effect, OutwardEffect};
pub use skill_tree::{SkillBranch, SkillLevel, SkillTree};

/// Static description of a hero class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDefinition {
    pub class: HeroClass,
    /// The reason whose stars level this class and trigger its bonuses.
    pub reason: Reason,
    /// Flat gold added once per qualifying award, regardless of star count.
    pub bonus_gold: u32,
    pub name: &'static str,
    pub description: &'static str,
}

/// A student's chosen role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeroClass {
    Guardian,
    Sage,
    Artisan,
    Ranger,
    Healer,
    Champion,
}

pub static CLASS_DEFINITIONS: [ClassDefinition; 6] = [
    ClassDefinition {
        class: HeroClass::Guardian,
        reason: Reason::Respect,
        bonus_gold: 10,
        name: "Guardian",
        description: "Protects the class by leading with respect.",
    },
    ClassDefinition {
        class: HeroClass::Sage,
        reason: Reason::Focus,
        bonus_gold: 8,
        name: "Sage",
        description: "Grows wiser with every focused lesson.",
    },
    ClassDefinition {
        class: HeroClass::Artisan,
        reason: Reason::Creativity,
        bonus_gold: 8,
        name: "Artisan",
        description: "Turns creative sparks into treasures.",
    },
    ClassDefinition {
        class: HeroClass::Ranger,
        reason: Reason::Teamwork,
        bonus_gold: 10,
        name: "Ranger",
        description: "Never travels alone; thrives on teamwork.",
    },
    ClassDefinition {
        class: HeroClass::Healer,
        reason: Reason::Kindness,
        bonus_gold: 10,
        name: "Healer",
        description: "Lifts others up through kindness.",
    },
    ClassDefinition {
        class: HeroClass::Champion,
        reason: Reason::Perseverance,
        bonus_gold: 12,
        name: "Champion",
        description: "Keeps going when the quest gets hard.",
    },
];

impl HeroClass {
    pub const ALL: [HeroClass; 6] = [
        HeroClass::Guardian,
        HeroClass::Sage,
        HeroClass::Artisan,
        HeroClass::Ranger,
        HeroClass::Healer,
        HeroClass::Champion,
    ];

    pub fn definition(&self) -> &'static ClassDefinition {
        &CLASS_DEFINITIONS[self.index()]
    }

    pub fn skill_tree(&self) -> &'static SkillTree {
        match self {
            Self::Guardian => &trees::GUARDIAN_TREE,
            Self::Sage => &trees::SAGE_TREE,
            Self::Artisan => &trees::ARTISAN_TREE,
            Self::Ranger => &trees::RANGER_TREE,
            Self::Healer => &trees::HEALER_TREE,
            Self::Champion => &trees::CHAMPION_TREE,
        }
    }

    pub fn reason(&self) -> Reason {
        self.definition().reason
    }

    pub fn key(&self) -> &'static str {
        match self {
            Self::Guardian => "guardian",
            Self::Sage => "sage",
            Self::Artisan => "artisan",
            Self::Ranger => "ranger",
            Self::Healer => "healer",
            Self::Champion => "champion",
        }
    }

    fn index(&self) -> usize {
        match self {
            Self::Guardian => 0,
            Self::Sage => 1,
            Self::Artisan => 2,
            Self::Ranger => 3,
            Self::Healer => 4,
            Self::Champion => 5,
        }
    }
}

impl fmt::Display for HeroClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for HeroClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "guardian" => Ok(Self::Guardian),
            "sage" => Ok(Self::Sage),
            "artisan" => Ok(Self::Artisan),
            "ranger" => Ok(Self::Ranger),
            "healer" => Ok(Self::Healer),
            "champion" => Ok(Self::Champion),
            other => Err(DomainError::parse(format!("Unknown hero class: {}", other))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_tree_is_well_formed() {
        for class in HeroClass::ALL {
            let tree = class.skill_tree();
            assert_eq!(tree.class, class);
            tree.validate()
                .unwrap_or_else(|e| panic!("{} tree invalid: {}", class, e));
            assert!(
                tree.max_level() == 3 || tree.max_level() == 5,
                "{} has {} levels",
                class,
                tree.max_level()
            );
        }
    }

    #[test]
    fn definitions_are_indexed_by_class() {
        for class in HeroClass::ALL {
            assert_eq!(class.definition().class, class);
        }
    }

    #[test]
    fn each_reason_triggers_exactly_one_class() {
        let reasons: HashSet<Reason> = HeroClass::ALL.iter().map(|c| c.reason()).collect();
        assert_eq!(reasons.len(), HeroClass::ALL.len());
    }

    #[test]
    fn branch_ids_are_unique_across_the_catalog() {
        let mut seen = HashSet::new();
        for class in HeroClass::ALL {
            for level in class.skill_tree().levels {
                for branch in &level.branches {
                    assert!(seen.insert(branch.id), "duplicate branch {}", branch.id);
                }
            }
        }
    }

    #[test]
    fn guardian_matches_published_numbers() {
        let def = HeroClass::Guardian.definition();
        assert_eq!(def.reason, Reason::Respect);
        assert_eq!(def.bonus_gold, 10);
    }

    #[test]
    fn find_branch_reports_level_index() {
        let tree = HeroClass::Guardian.skill_tree();
        let (idx, branch) = tree.find_branch("guardian_muster").expect("branch exists");
        assert_eq!(idx, 3);
        assert_eq!(branch.effect, Effect::FirstOfMonthGuildBonus { amount: 5 });
        assert!(tree.find_branch("sage_study").is_none());
    }

    #[test]
    fn validate_rejects_non_increasing_thresholds() {
        static BAD: [SkillLevel; 2] = [
            SkillLevel {
                threshold: 10,
                branches: [
                    SkillBranch {
                        id: "a",
                        name: "A",
                        effect: Effect::SelfGoldOnReason { amount: 1 },
                        secondary: None,
                    },
                    SkillBranch {
                        id: "b",
                        name: "B",
                        effect: Effect::SelfGoldOnReason { amount: 1 },
                        secondary: None,
                    },
                ],
            },
            SkillLevel {
                threshold: 10,
                branches: [
                    SkillBranch {
                        id: "c",
                        name: "C",
                        effect: Effect::SelfGoldOnReason { amount: 1 },
                        secondary: None,
                    },
                    SkillBranch {
                        id: "d",
                        name: "D",
                        effect: Effect::SelfGoldOnReason { amount: 1 },
                        secondary: None,
                    },
                ],
            },
        ];
        let tree = SkillTree {
            class: HeroClass::Sage,
            levels: &BAD,
        };
        assert!(matches!(tree.validate(), Err(DomainError::Validation(_))));
    }
}
