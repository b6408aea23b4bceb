//! GuildAggregate - a guild's season-long star total and membership.
//!
//! # Invariants
//!
//! - `total_stars` never decreases
//! - a student appears in at most one guild's membership (enforced by storage
//!   across aggregates)

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::StudentId;
use crate::roster::RosterSnapshot;
use crate::value_objects::{GuildId, GUILD_DECLARATION_ORDER};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuildAggregate {
    guild_id: GuildId,
    total_stars: u64,
    member_ids: BTreeSet<StudentId>,
    last_updated: Option<DateTime<Utc>>,
}

impl GuildAggregate {
    /// An empty guild, as if no record existed yet.
    pub fn empty(guild_id: GuildId) -> Self {
        Self {
            guild_id,
            total_stars: 0,
            member_ids: BTreeSet::new(),
            last_updated: None,
        }
    }

    /// Rebuild from stored parts.
    pub fn from_parts(
        guild_id: GuildId,
        total_stars: u64,
        member_ids: BTreeSet<StudentId>,
        last_updated: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            guild_id,
            total_stars,
            member_ids,
            last_updated,
        }
    }

    #[inline]
    pub fn guild_id(&self) -> GuildId {
        self.guild_id
    }

    #[inline]
    pub fn total_stars(&self) -> u64 {
        self.total_stars
    }

    #[inline]
    pub fn member_ids(&self) -> &BTreeSet<StudentId> {
        &self.member_ids
    }

    pub fn member_count(&self) -> usize {
        self.member_ids.len()
    }

    #[inline]
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Add stars to the season total. Zero is a no-op.
    pub fn credit(&mut self, stars: u64, at: DateTime<Utc>) {
        if stars == 0 {
            return;
        }
        self.total_stars = self.total_stars.saturating_add(stars);
        self.last_updated = Some(at);
    }

    /// Returns `false` when the student was already a member.
    pub fn add_member(&mut self, student_id: StudentId, at: DateTime<Utc>) -> bool {
        let added = self.member_ids.insert(student_id);
        if added {
            self.last_updated = Some(at);
        }
        added
    }
}

/// A guild's top member on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contributor {
    pub student_id: StudentId,
    pub display_name: String,
    pub total_stars: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub guild_id: GuildId,
    pub guild_name: String,
    pub total_stars: u64,
    pub member_count: usize,
    pub top_contributors: Vec<Contributor>,
}

pub const TOP_CONTRIBUTORS: usize = 3;

/// Leaderboard over all four guilds, highest total first.
///
/// Guilds without a record count as zero stars and zero members. Ties keep
/// declaration order. Contributors come from the roster snapshot, ranked by
/// each member's own total.
pub fn project_leaderboard(
    aggregates: &[GuildAggregate],
    roster: &RosterSnapshot,
) -> Vec<LeaderboardEntry> {
    let mut entries: Vec<LeaderboardEntry> = GUILD_DECLARATION_ORDER
        .iter()
        .map(|&guild_id| {
            let aggregate = aggregates
                .iter()
                .find(|a| a.guild_id == guild_id)
                .cloned()
                .unwrap_or_else(|| GuildAggregate::empty(guild_id));

            let mut members: Vec<_> = roster.guild_members(guild_id).collect();
            members.sort_by(|a, b| {
                b.total_stars
                    .cmp(&a.total_stars)
                    .then_with(|| a.display_name.cmp(&b.display_name))
                    .then_with(|| a.student_id.cmp(&b.student_id))
            });

            LeaderboardEntry {
                guild_id,
                guild_name: guild_id.display_name().to_string(),
                total_stars: aggregate.total_stars(),
                member_count: aggregate.member_count(),
                top_contributors: members
                    .into_iter()
                    .take(TOP_CONTRIBUTORS)
                    .map(|m| Contributor {
                        student_id: m.student_id,
                        display_name: m.display_name.clone(),
                        total_stars: m.total_stars,
                    })
                    .collect(),
            }
        })
        .collect();

    // Stable sort keeps declaration order among equal totals.
    entries.sort_by(|a, b| b.total_stars.cmp(&a.total_stars));
    entries
}
