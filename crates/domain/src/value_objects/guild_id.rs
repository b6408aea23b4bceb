//! The four fixed guilds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// One of the four archetypal guilds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuildId {
    Ember,
    Tide,
    Grove,
    Storm,
}

/// Declaration order of the guilds.
///
/// Quiz ties resolve to the earliest guild in this list, and leaderboard ties
/// keep this order. Changing it changes assignment outcomes.
pub const GUILD_DECLARATION_ORDER: [GuildId; 4] =
    [GuildId::Ember, GuildId::Tide, GuildId::Grove, GuildId::Storm];

impl GuildId {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Ember => "ember",
            Self::Tide => "tide",
            Self::Grove => "grove",
            Self::Storm => "storm",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Ember => "Ember Lions",
            Self::Tide => "Tide Keepers",
            Self::Grove => "Grove Wardens",
            Self::Storm => "Storm Riders",
        }
    }

    /// Position in [`GUILD_DECLARATION_ORDER`].
    pub fn declaration_index(&self) -> usize {
        match self {
            Self::Ember => 0,
            Self::Tide => 1,
            Self::Grove => 2,
            Self::Storm => 3,
        }
    }
}

impl fmt::Display for GuildId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GuildId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ember" => Ok(Self::Ember),
            "tide" => Ok(Self::Tide),
            "grove" => Ok(Self::Grove),
            "storm" => Ok(Self::Storm),
            other => Err(DomainError::parse(format!("Unknown guild: {}", other))),
        }
    }
}
