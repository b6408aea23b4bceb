//! Award stars use case.
//!
//! Credits the earner synchronously and defers every effect on other students
//! and on guild totals to the outbox, all in one storage transaction.

use std::sync::Arc;

use classquest_domain::{
    enumerate_outward_effects, resolve_direct_bonus, AwardEvent, AwardId, LevelChange,
    OutwardEffect,
};

use super::AwardError;
use crate::infrastructure::ports::{
    monthly_bonus_key, AwardCommit, AwardRepo, ClockPort, NewOutboxEntry, OutboxPayload,
    RepoError, StudentRepo,
};

/// Reload-and-retry budget when the student changes under an award.
const MAX_COMMIT_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NonPositiveDelta,
    StudentNotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardSummary {
    pub award_id: AwardId,
    pub gold_change: i64,
    pub bonus_stars: u32,
    pub level: LevelChange,
    /// Outbox entries written by the award transaction.
    pub enqueued: usize,
    pub deduplicated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AwardOutcome {
    Applied(AwardSummary),
    Skipped(SkipReason),
}

pub struct AwardStars {
    students: Arc<dyn StudentRepo>,
    awards: Arc<dyn AwardRepo>,
    clock: Arc<dyn ClockPort>,
}

impl AwardStars {
    pub fn new(
        students: Arc<dyn StudentRepo>,
        awards: Arc<dyn AwardRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            students,
            awards,
            clock,
        }
    }

    pub async fn execute(&self, event: AwardEvent) -> Result<AwardOutcome, AwardError> {
        let Some(stars) = event.credited_stars() else {
            tracing::debug!(
                student_id = %event.student_id,
                star_delta = event.star_delta,
                "Award skipped: non-positive delta"
            );
            return Ok(AwardOutcome::Skipped(SkipReason::NonPositiveDelta));
        };

        let mut attempt = 1;
        loop {
            match self.attempt(&event, stars).await {
                Err(e) if e.is_conflict() && attempt < MAX_COMMIT_ATTEMPTS => {
                    tracing::debug!(
                        student_id = %event.student_id,
                        attempt,
                        "Student changed during award, reloading"
                    );
                    attempt += 1;
                }
                result => return Ok(result?),
            }
        }
    }

    /// Load, apply and commit once against the freshly read student.
    async fn attempt(&self, event: &AwardEvent, stars: u32) -> Result<AwardOutcome, RepoError> {
        let Some(mut student) = self.students.get(event.student_id).await? else {
            tracing::debug!(student_id = %event.student_id, "Award skipped: unknown student");
            return Ok(AwardOutcome::Skipped(SkipReason::StudentNotFound));
        };

        let award_id = AwardId::new();
        let bonus = resolve_direct_bonus(&student, event.reason, event.star_delta);
        let level = student.apply_award(event.reason, stars, &bonus, event.occurred_on);
        let outward = enumerate_outward_effects(&student, event.reason, event.star_delta);

        let month = event.month();
        let mut outbox = Vec::new();

        if let Some(reason) = event.reason {
            let bonus_due = student.guild_bonus_due(reason, month);
            let mut bonus_fired = false;

            for effect in outward {
                let dedup_key = match &effect {
                    OutwardEffect::FirstOfMonthGuildBonus { source_branch, .. } => {
                        if !bonus_due {
                            continue;
                        }
                        bonus_fired = true;
                        Some(monthly_bonus_key(student.id(), month, source_branch))
                    }
                    OutwardEffect::ClassmateGold { .. }
                    | OutwardEffect::GuildmateGold { .. }
                    | OutwardEffect::RandomClassmateGold { .. } => None,
                };

                let mut entry = NewOutboxEntry::new(OutboxPayload::Outward {
                    award: award_id,
                    source: student.id(),
                    classroom: student.classroom_id(),
                    guild: student.guild_id(),
                    reason,
                    awarded_on: event.occurred_on,
                    effect,
                });
                if let Some(key) = dedup_key {
                    entry = entry.with_dedup_key(key);
                }
                outbox.push(entry);
            }

            if bonus_fired {
                student.claim_guild_bonus(reason, month);
            }
        }

        // The guild is credited with the awarded stars; bonus stars stay personal.
        if student.guild_id().is_some() {
            outbox.push(NewOutboxEntry::new(OutboxPayload::GuildCredit {
                student: student.id(),
                stars: u64::from(stars),
            }));
        }

        let commit = AwardCommit {
            award_id,
            student_id: student.id(),
            classroom_id: student.classroom_id(),
            guild_id: student.guild_id(),
            reason: event.reason,
            awarded_on: event.occurred_on,
            stars: u64::from(stars),
            star_increment: u64::from(stars) + u64::from(bonus.bonus_stars),
            gold_increment: bonus.gold_change,
            progress: student,
            outbox,
            committed_at: self.clock.now(),
        };
        let receipt = self.awards.commit(&commit).await?;

        tracing::info!(
            student_id = %commit.student_id,
            award_id = %commit.award_id,
            reason = ?event.reason,
            stars,
            gold_change = bonus.gold_change,
            bonus_stars = bonus.bonus_stars,
            hero_level = level.current,
            enqueued = receipt.enqueued,
            deduplicated = receipt.deduplicated,
            "Stars awarded"
        );
        if level.leveled_up() {
            tracing::info!(
                student_id = %commit.student_id,
                from = level.previous,
                to = level.current,
                skill_choice_pending = level.skill_choice_raised,
                "Hero leveled up"
            );
        }

        Ok(AwardOutcome::Applied(AwardSummary {
            award_id: commit.award_id,
            gold_change: bonus.gold_change,
            bonus_stars: bonus.bonus_stars,
            level,
            enqueued: receipt.enqueued,
            deduplicated: receipt.deduplicated,
        }))
    }
}
