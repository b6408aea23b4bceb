//! Skill effects.
//!
//! Every effect kind is a variant carrying only what it needs, so the bonus
//! resolver and the outward dispatcher match exhaustively. Adding a kind here
//! fails compilation until both sides handle it.

use serde::{Deserialize, Serialize};

/// An effect granted by a chosen skill branch.
///
/// Amounts on `*_on_reason` self effects scale with the stars in the award;
/// outward amounts are flat per qualifying award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Extra gold for the earner, `amount` per star in the award.
    SelfGoldOnReason { amount: u32 },
    /// Extra stars for the earner, `amount` per star in the award.
    StarBonusOnReason { amount: u32 },
    /// Flat gold to classmates who earned the same reason the same day.
    ClassmateGoldOnReason { amount: u32 },
    /// Flat gold to guildmates who earned the same reason the same day.
    GuildmateGoldOnReason { amount: u32 },
    /// Flat gold to one classmate picked at random.
    RandomClassmateGold { amount: u32 },
    /// Flat gold to every guildmate, at most once per calendar month.
    FirstOfMonthGuildBonus { amount: u32 },
}

impl Effect {
    pub fn amount(&self) -> u32 {
        match *self {
            Self::SelfGoldOnReason { amount }
            | Self::StarBonusOnReason { amount }
            | Self::ClassmateGoldOnReason { amount }
            | Self::GuildmateGoldOnReason { amount }
            | Self::RandomClassmateGold { amount }
            | Self::FirstOfMonthGuildBonus { amount } => amount,
        }
    }

    /// Convert into an outward effect record attributed to `source_branch`.
    ///
    /// Self-targeting effects return `None`.
    pub fn to_outward(&self, source_branch: &str) -> Option<OutwardEffect> {
        let source_branch = source_branch.to_string();
        match *self {
            Self::SelfGoldOnReason { .. } | Self::StarBonusOnReason { .. } => None,
            Self::ClassmateGoldOnReason { amount } => Some(OutwardEffect::ClassmateGold {
                amount,
                source_branch,
            }),
            Self::GuildmateGoldOnReason { amount } => Some(OutwardEffect::GuildmateGold {
                amount,
                source_branch,
            }),
            Self::RandomClassmateGold { amount } => Some(OutwardEffect::RandomClassmateGold {
                amount,
                source_branch,
            }),
            Self::FirstOfMonthGuildBonus { amount } => {
                Some(OutwardEffect::FirstOfMonthGuildBonus {
                    amount,
                    source_branch,
                })
            }
        }
    }
}

/// A bonus one student's award grants to other students.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutwardEffect {
    ClassmateGold { amount: u32, source_branch: String },
    GuildmateGold { amount: u32, source_branch: String },
    RandomClassmateGold { amount: u32, source_branch: String },
    FirstOfMonthGuildBonus { amount: u32, source_branch: String },
}

impl OutwardEffect {
    pub fn amount(&self) -> u32 {
        match self {
            Self::ClassmateGold { amount, .. }
            | Self::GuildmateGold { amount, .. }
            | Self::RandomClassmateGold { amount, .. }
            | Self::FirstOfMonthGuildBonus { amount, .. } => *amount,
        }
    }

    pub fn source_branch(&self) -> &str {
        match self {
            Self::ClassmateGold { source_branch, .. }
            | Self::GuildmateGold { source_branch, .. }
            | Self::RandomClassmateGold { source_branch, .. }
            | Self::FirstOfMonthGuildBonus { source_branch, .. } => source_branch,
        }
    }

    /// Short label used in logs and storage.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ClassmateGold { .. } => "classmate_gold",
            Self::GuildmateGold { .. } => "guildmate_gold",
            Self::RandomClassmateGold { .. } => "random_classmate_gold",
            Self::FirstOfMonthGuildBonus { .. } => "first_of_month_guild_bonus",
        }
    }
}
