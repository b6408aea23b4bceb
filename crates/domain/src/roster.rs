//! Read-only roster snapshot.
//!
//! The projection of students and their totals that leaderboards and peer
//! effects read from. It is refreshed outside this crate and never mutated here.

use serde::{Deserialize, Serialize};

use crate::aggregates::StudentProgress;
use crate::ids::{ClassroomId, StudentId};
use crate::value_objects::GuildId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterMember {
    pub student_id: StudentId,
    pub classroom_id: ClassroomId,
    pub display_name: String,
    pub guild_id: Option<GuildId>,
    pub total_stars: u64,
}

impl From<&StudentProgress> for RosterMember {
    fn from(student: &StudentProgress) -> Self {
        Self {
            student_id: student.id(),
            classroom_id: student.classroom_id(),
            display_name: student.display_name().to_string(),
            guild_id: student.guild_id(),
            total_stars: student.total_stars(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterSnapshot {
    members: Vec<RosterMember>,
}

impl RosterSnapshot {
    pub fn new(members: Vec<RosterMember>) -> Self {
        Self { members }
    }

    pub fn from_students<'a>(students: impl IntoIterator<Item = &'a StudentProgress>) -> Self {
        Self::new(students.into_iter().map(RosterMember::from).collect())
    }

    pub fn members(&self) -> &[RosterMember] {
        &self.members
    }

    pub fn get(&self, student_id: StudentId) -> Option<&RosterMember> {
        self.members.iter().find(|m| m.student_id == student_id)
    }

    /// Other students in the same classroom as `student_id`.
    pub fn classmates_of(&self, student_id: StudentId) -> Vec<&RosterMember> {
        let Some(me) = self.get(student_id) else {
            return Vec::new();
        };
        self.members
            .iter()
            .filter(|m| m.classroom_id == me.classroom_id && m.student_id != student_id)
            .collect()
    }

    pub fn guild_members(&self, guild_id: GuildId) -> impl Iterator<Item = &RosterMember> {
        self.members
            .iter()
            .filter(move |m| m.guild_id == Some(guild_id))
    }
}
