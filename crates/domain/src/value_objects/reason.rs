//! Behavioral reasons a star can be awarded for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// The behavioral category a star is tagged with.
///
/// Every hero class is triggered by exactly one reason. Unrecognized keys coming
/// from the outside are parsed to `None` by callers and never trigger bonuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Reason {
    Respect,
    Teamwork,
    Creativity,
    Focus,
    Kindness,
    Perseverance,
}

impl Reason {
    pub const ALL: [Reason; 6] = [
        Reason::Respect,
        Reason::Teamwork,
        Reason::Creativity,
        Reason::Focus,
        Reason::Kindness,
        Reason::Perseverance,
    ];

    /// Stable storage key.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Respect => "respect",
            Self::Teamwork => "teamwork",
            Self::Creativity => "creativity",
            Self::Focus => "focus",
            Self::Kindness => "kindness",
            Self::Perseverance => "perseverance",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Respect => "Respect",
            Self::Teamwork => "Teamwork",
            Self::Creativity => "Creativity",
            Self::Focus => "Focus",
            Self::Kindness => "Kindness",
            Self::Perseverance => "Perseverance",
        }
    }

    /// Lenient parse for reason keys arriving with award events.
    pub fn parse_key(key: &str) -> Option<Self> {
        key.parse().ok()
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Reason {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "respect" => Ok(Self::Respect),
            "teamwork" => Ok(Self::Teamwork),
            "creativity" => Ok(Self::Creativity),
            "focus" => Ok(Self::Focus),
            "kindness" => Ok(Self::Kindness),
            "perseverance" => Ok(Self::Perseverance),
            other => Err(DomainError::parse(format!("Unknown reason: {}", other))),
        }
    }
}
