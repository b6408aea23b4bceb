//! Direct bonus resolution for the student who earned the award.

use crate::aggregates::StudentProgress;
use crate::catalog::Effect;
use crate::value_objects::Reason;

/// Gold and extra stars owed to the earner of an award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DirectBonus {
    pub gold_change: i64,
    pub bonus_stars: u32,
}

impl DirectBonus {
    /// Base conversion with no bonuses: one gold per star.
    pub fn plain(star_delta: i64) -> Self {
        Self {
            gold_change: star_delta,
            bonus_stars: 0,
        }
    }
}

/// Compose the base gold, the flat class bonus, and active self-targeting
/// skill effects for one award.
///
/// Non-positive deltas and awards without a reason never earn bonuses. The
/// class bonus is flat per award; skill effects scale with `star_delta`.
pub fn resolve_direct_bonus(
    student: &StudentProgress,
    reason: Option<Reason>,
    star_delta: i64,
) -> DirectBonus {
    let Some(reason) = reason else {
        return DirectBonus::plain(star_delta);
    };
    if star_delta <= 0 {
        return DirectBonus::plain(star_delta);
    }

    let mut bonus = DirectBonus::plain(star_delta);

    let Some(class) = student.class_definition() else {
        return bonus;
    };
    // The tree shares the class reason, so one check gates both the class
    // bonus and every skill effect.
    if class.reason != reason {
        return bonus;
    }

    bonus.gold_change += i64::from(class.bonus_gold);

    for branch in student.chosen_branches() {
        for effect in branch.effects() {
            match *effect {
                Effect::SelfGoldOnReason { amount } => {
                    bonus.gold_change += i64::from(amount) * star_delta;
                }
                Effect::StarBonusOnReason { amount } => {
                    let extra = u32::try_from(i64::from(amount) * star_delta).unwrap_or(u32::MAX);
                    bonus.bonus_stars = bonus.bonus_stars.saturating_add(extra);
                }
                Effect::ClassmateGoldOnReason { .. }
                | Effect::GuildmateGoldOnReason { .. }
                | Effect::RandomClassmateGold { .. }
                | Effect::FirstOfMonthGuildBonus { .. } => {}
            }
        }
    }

    bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::HeroClass;
    use crate::ids::{ClassroomId, StudentId};
    use chrono::NaiveDate;

    fn guardian(respect_stars: u32) -> StudentProgress {
        let mut s = StudentProgress::new(StudentId::new(), ClassroomId::new(), "Grace").unwrap();
        s.select_hero_class(HeroClass::Guardian).unwrap();
        s.apply_award(
            Some(Reason::Respect),
            respect_stars,
            &DirectBonus::plain(i64::from(respect_stars)),
            NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        );
        s
    }

    #[test]
    fn non_positive_delta_is_returned_unchanged() {
        let mut s = guardian(80);
        s.choose_skill(0, "guardian_steadfast").unwrap();
        for delta in [0, -1, -7] {
            assert_eq!(
                resolve_direct_bonus(&s, Some(Reason::Respect), delta),
                DirectBonus {
                    gold_change: delta,
                    bonus_stars: 0
                }
            );
        }
    }

    #[test]
    fn missing_reason_earns_base_gold_only() {
        let s = guardian(0);
        assert_eq!(resolve_direct_bonus(&s, None, 3), DirectBonus::plain(3));
    }

    #[test]
    fn student_without_class_earns_base_gold_only() {
        let s = StudentProgress::new(StudentId::new(), ClassroomId::new(), "Lin").unwrap();
        assert_eq!(
            resolve_direct_bonus(&s, Some(Reason::Respect), 4),
            DirectBonus::plain(4)
        );
    }

    #[test]
    fn guardian_without_skills_gets_flat_class_bonus() {
        let s = guardian(0);
        let bonus = resolve_direct_bonus(&s, Some(Reason::Respect), 2);
        assert_eq!(bonus.gold_change, 12);
        assert_eq!(bonus.bonus_stars, 0);
    }

    #[test]
    fn class_bonus_is_flat_regardless_of_star_count() {
        let s = guardian(0);
        assert_eq!(
            resolve_direct_bonus(&s, Some(Reason::Respect), 1).gold_change,
            11
        );
        assert_eq!(
            resolve_direct_bonus(&s, Some(Reason::Respect), 5).gold_change,
            15
        );
    }

    #[test]
    fn self_gold_skill_scales_with_stars() {
        // guardian_tithe: self gold 2 per star; with level-0 steadfast (1 per star)
        let mut s = guardian(30);
        s.choose_skill(2, "guardian_tithe").unwrap();
        let bonus = resolve_direct_bonus(&s, Some(Reason::Respect), 2);
        assert_eq!(bonus.gold_change, 2 + 10 + 2 * 2);

        s.choose_skill(0, "guardian_steadfast").unwrap();
        let bonus = resolve_direct_bonus(&s, Some(Reason::Respect), 2);
        assert_eq!(bonus.gold_change, 2 + 10 + 2 * 2 + 2);
    }

    #[test]
    fn self_gold_three_per_star_example() {
        // Bulwark: self gold 3 per star (its guildmate secondary is outward).
        let mut s = guardian(80);
        s.choose_skill(4, "guardian_bulwark").unwrap();
        let bonus = resolve_direct_bonus(&s, Some(Reason::Respect), 2);
        assert_eq!(bonus.gold_change, 18);
        assert_eq!(bonus.bonus_stars, 0);
    }

    #[test]
    fn star_bonus_skill_adds_bonus_stars() {
        let mut s = guardian(50);
        s.choose_skill(0, "guardian_vigilant").unwrap();
        s.choose_skill(3, "guardian_honor").unwrap();
        let bonus = resolve_direct_bonus(&s, Some(Reason::Respect), 3);
        assert_eq!(bonus.bonus_stars, 6);
        assert_eq!(bonus.gold_change, 13);
    }

    #[test]
    fn mismatched_reason_ignores_class_and_skills() {
        let mut s = guardian(30);
        s.choose_skill(2, "guardian_tithe").unwrap();
        assert_eq!(
            resolve_direct_bonus(&s, Some(Reason::Focus), 4),
            DirectBonus::plain(4)
        );
    }

    #[test]
    fn outward_only_skills_do_not_change_direct_bonus() {
        let mut s = guardian(15);
        s.choose_skill(1, "guardian_rally").unwrap();
        assert_eq!(
            resolve_direct_bonus(&s, Some(Reason::Respect), 2).gold_change,
            12
        );
    }
}
