//! Award events: stars granted to a student in class.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::ids::StudentId;
use crate::value_objects::{MonthKey, Reason};

/// Stars granted to one student for one reason on one day.
///
/// `reason` is `None` when the issuing side sent a key that names no reason.
/// Such awards still count toward totals but never trigger class or skill
/// bonuses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AwardEvent {
    pub student_id: StudentId,
    pub reason: Option<Reason>,
    pub star_delta: i64,
    pub occurred_on: NaiveDate,
}

impl AwardEvent {
    pub fn new(
        student_id: StudentId,
        reason: Option<Reason>,
        star_delta: i64,
        occurred_on: NaiveDate,
    ) -> Self {
        Self {
            student_id,
            reason,
            star_delta,
            occurred_on,
        }
    }

    /// Build from a raw reason key; unknown keys become an absent reason.
    pub fn from_reason_key(
        student_id: StudentId,
        reason_key: &str,
        star_delta: i64,
        occurred_on: NaiveDate,
    ) -> Self {
        Self::new(
            student_id,
            Reason::parse_key(reason_key),
            star_delta,
            occurred_on,
        )
    }

    /// Stars to credit, or `None` when the award has no effect.
    pub fn credited_stars(&self) -> Option<u32> {
        if self.star_delta <= 0 {
            return None;
        }
        Some(u32::try_from(self.star_delta).unwrap_or(u32::MAX))
    }

    pub fn month(&self) -> MonthKey {
        MonthKey::of(self.occurred_on)
    }
}
