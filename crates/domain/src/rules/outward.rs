//! Outward effect enumeration.
//!
//! Produces the peer-targeting effects one award triggers. Applying them is the
//! engine's job; this module only decides which fire.

use crate::aggregates::StudentProgress;
use crate::catalog::OutwardEffect;
use crate::value_objects::Reason;

/// Effects an award grants to other students.
///
/// Empty unless the delta is positive, the student has a hero class, and the
/// award's reason is the class reason. Primary and secondary effects of every
/// chosen branch are considered; amounts are flat per award.
pub fn enumerate_outward_effects(
    student: &StudentProgress,
    reason: Option<Reason>,
    star_delta: i64,
) -> Vec<OutwardEffect> {
    if star_delta <= 0 {
        return Vec::new();
    }
    let (Some(reason), Some(class)) = (reason, student.hero_class()) else {
        return Vec::new();
    };
    if class.reason() != reason {
        return Vec::new();
    }

    student
        .chosen_branches()
        .into_iter()
        .flat_map(|branch| branch.effects().filter_map(|e| e.to_outward(branch.id)))
        .collect()
}
