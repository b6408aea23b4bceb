//! Drain outbox use case.
//!
//! Applies peer effects and guild credits recorded by award transactions.
//! Every grant carries a key derived from the entry id, so an entry that is
//! retried after a partial failure never pays anyone twice.

use std::sync::Arc;

use classquest_domain::{ClassroomId, GuildId, OutwardEffect, StudentId};

use super::OutboxError;
use crate::infrastructure::ports::{
    AwardRepo, ClockPort, GuildRepo, OutboxEntry, OutboxPayload, OutboxRepo, OutboxStatus,
    RandomPort, StudentRepo,
};
use crate::use_cases::guilds::CreditGuild;

/// Counts from one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    pub fetched: usize,
    pub applied: usize,
    /// Failed this pass and will be retried.
    pub failed: usize,
    /// Failed for the last allowed time.
    pub dead: usize,
    /// Individual gold grants or guild credits that changed a balance.
    pub grants: usize,
}

pub struct DrainOutbox {
    outbox: Arc<dyn OutboxRepo>,
    students: Arc<dyn StudentRepo>,
    guilds: Arc<dyn GuildRepo>,
    awards: Arc<dyn AwardRepo>,
    credit_guild: Arc<CreditGuild>,
    random: Arc<dyn RandomPort>,
    clock: Arc<dyn ClockPort>,
    max_attempts: u32,
}

impl DrainOutbox {
    pub fn new(
        outbox: Arc<dyn OutboxRepo>,
        students: Arc<dyn StudentRepo>,
        guilds: Arc<dyn GuildRepo>,
        awards: Arc<dyn AwardRepo>,
        credit_guild: Arc<CreditGuild>,
        random: Arc<dyn RandomPort>,
        clock: Arc<dyn ClockPort>,
        max_attempts: u32,
    ) -> Self {
        Self {
            outbox,
            students,
            guilds,
            awards,
            credit_guild,
            random,
            clock,
            max_attempts,
        }
    }

    /// Apply up to `batch` pending entries, oldest first.
    ///
    /// Entry failures are recorded on the entry and never returned; only a
    /// failure to read or update the outbox itself is an error.
    pub async fn execute(&self, batch: u32) -> Result<DrainReport, OutboxError> {
        let entries = self.outbox.fetch_pending(batch).await?;
        let mut report = DrainReport {
            fetched: entries.len(),
            ..Default::default()
        };

        for entry in &entries {
            match self.apply(entry).await {
                Ok(grants) => {
                    self.outbox.mark_applied(entry.id, self.clock.now()).await?;
                    report.applied += 1;
                    report.grants += grants;
                }
                Err(e) => {
                    let status = self
                        .outbox
                        .mark_failed(entry.id, &e.to_string(), self.clock.now(), self.max_attempts)
                        .await?;
                    tracing::warn!(
                        entry_id = %entry.id,
                        kind = entry.payload.kind(),
                        attempt = entry.attempts + 1,
                        status = %status,
                        error = %e,
                        "Failed to apply outbox entry"
                    );
                    match status {
                        OutboxStatus::Dead => report.dead += 1,
                        OutboxStatus::Pending | OutboxStatus::Applied => report.failed += 1,
                    }
                }
            }
        }

        if report.fetched > 0 {
            tracing::debug!(
                fetched = report.fetched,
                applied = report.applied,
                failed = report.failed,
                dead = report.dead,
                grants = report.grants,
                "Outbox drained"
            );
        }
        Ok(report)
    }

    async fn apply(&self, entry: &OutboxEntry) -> Result<usize, OutboxError> {
        match &entry.payload {
            OutboxPayload::GuildCredit { student, stars } => {
                let key = format!("{}:guild", entry.id);
                let stars = i64::try_from(*stars).unwrap_or(i64::MAX);
                let credited = self.credit_guild.execute(&key, *student, stars).await?;
                Ok(usize::from(credited))
            }
            OutboxPayload::Outward {
                award,
                source,
                classroom,
                guild,
                reason,
                awarded_on,
                effect,
            } => match effect {
                OutwardEffect::ClassmateGold { amount, .. } => {
                    let earners = self
                        .awards
                        .earners_in_classroom(*classroom, *reason, *awarded_on, *award)
                        .await?;
                    self.grant_each(entry, *source, &earners, *amount).await
                }
                OutwardEffect::GuildmateGold { amount, .. } => {
                    let Some(guild) = guild else {
                        return Ok(0);
                    };
                    let earners = self
                        .awards
                        .earners_in_guild(*guild, *reason, *awarded_on, *award)
                        .await?;
                    self.grant_each(entry, *source, &earners, *amount).await
                }
                OutwardEffect::RandomClassmateGold { amount, .. } => {
                    self.grant_random_classmate(entry, *source, *classroom, *amount)
                        .await
                }
                OutwardEffect::FirstOfMonthGuildBonus { amount, .. } => {
                    let Some(guild) = guild else {
                        return Ok(0);
                    };
                    let members = self.guild_members(*guild).await?;
                    self.grant_each(entry, *source, &members, *amount).await
                }
            },
        }
    }

    async fn guild_members(&self, guild_id: GuildId) -> Result<Vec<StudentId>, OutboxError> {
        Ok(self
            .guilds
            .get(guild_id)
            .await?
            .map(|g| g.member_ids().iter().copied().collect())
            .unwrap_or_default())
    }

    async fn grant_random_classmate(
        &self,
        entry: &OutboxEntry,
        source: StudentId,
        classroom: ClassroomId,
        amount: u32,
    ) -> Result<usize, OutboxError> {
        let classmates: Vec<StudentId> = self
            .students
            .list_in_classroom(classroom)
            .await?
            .iter()
            .map(|s| s.id())
            .filter(|id| *id != source)
            .collect();
        if classmates.is_empty() {
            return Ok(0);
        }

        let max = i32::try_from(classmates.len() - 1).unwrap_or(i32::MAX);
        let pick = usize::try_from(self.random.gen_range(0, max)).unwrap_or(0);
        let Some(recipient) = classmates.get(pick).copied() else {
            return Ok(0);
        };

        // One key per entry, so a retry cannot pay a second classmate.
        let key = format!("{}:random", entry.id);
        let granted = self
            .students
            .grant_gold(&key, recipient, i64::from(amount))
            .await?;
        Ok(usize::from(granted))
    }

    async fn grant_each(
        &self,
        entry: &OutboxEntry,
        source: StudentId,
        recipients: &[StudentId],
        amount: u32,
    ) -> Result<usize, OutboxError> {
        let mut granted = 0;
        for recipient in recipients.iter().filter(|id| **id != source) {
            let key = format!("{}:{}", entry.id, recipient);
            if self
                .students
                .grant_gold(&key, *recipient, i64::from(amount))
                .await?
            {
                granted += 1;
            }
        }
        Ok(granted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::{FixedClock, FixedRandom};
    use crate::infrastructure::ports::{
        MockAwardRepo, MockGuildRepo, MockOutboxRepo, MockStudentRepo, RepoError,
    };
    use chrono::{NaiveDate, Utc};
    use classquest_domain::{AwardId, GuildAggregate, OutboxEntryId, Reason, StudentProgress};
    use std::collections::BTreeSet;
    use std::sync::Mutex;

    fn entry(payload: OutboxPayload) -> OutboxEntry {
        OutboxEntry {
            id: OutboxEntryId::new(),
            payload,
            status: OutboxStatus::Pending,
            attempts: 0,
            last_error: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn outward(
        source: StudentId,
        classroom: ClassroomId,
        guild: Option<GuildId>,
        effect: OutwardEffect,
    ) -> OutboxPayload {
        OutboxPayload::Outward {
            award: AwardId::new(),
            source,
            classroom,
            guild,
            reason: Reason::Kindness,
            awarded_on: NaiveDate::from_ymd_opt(2026, 10, 6).unwrap(),
            effect,
        }
    }

    fn outbox_with(entries: Vec<OutboxEntry>) -> MockOutboxRepo {
        let mut outbox = MockOutboxRepo::new();
        outbox
            .expect_fetch_pending()
            .returning(move |_| Ok(entries.clone()));
        outbox
    }

    struct Harness {
        outbox: MockOutboxRepo,
        students: MockStudentRepo,
        guilds: MockGuildRepo,
        awards: MockAwardRepo,
        random: i32,
    }

    impl Harness {
        fn new(outbox: MockOutboxRepo) -> Self {
            Self {
                outbox,
                students: MockStudentRepo::new(),
                guilds: MockGuildRepo::new(),
                awards: MockAwardRepo::new(),
                random: 0,
            }
        }

        fn build(self) -> DrainOutbox {
            let students: Arc<dyn StudentRepo> = Arc::new(self.students);
            let guilds: Arc<dyn GuildRepo> = Arc::new(self.guilds);
            let clock: Arc<dyn ClockPort> = Arc::new(FixedClock::on(2026, 10, 6));
            let credit = Arc::new(CreditGuild::new(
                students.clone(),
                guilds.clone(),
                clock.clone(),
            ));
            DrainOutbox::new(
                Arc::new(self.outbox),
                students,
                guilds,
                Arc::new(self.awards),
                credit,
                Arc::new(FixedRandom(self.random)),
                clock,
                3,
            )
        }
    }

    #[tokio::test]
    async fn classmate_gold_pays_same_day_earners_except_source() {
        let source = StudentId::new();
        let mate_a = StudentId::new();
        let mate_b = StudentId::new();
        let classroom = ClassroomId::new();
        let e = entry(outward(
            source,
            classroom,
            None,
            OutwardEffect::ClassmateGold {
                amount: 2,
                source_branch: "healer_circle".into(),
            },
        ));
        let entry_id = e.id;
        let OutboxPayload::Outward { award, .. } = e.payload else {
            unreachable!("outward payload");
        };

        let mut outbox = outbox_with(vec![e]);
        outbox
            .expect_mark_applied()
            .withf(move |id, _| *id == entry_id)
            .times(1)
            .returning(|_, _| Ok(()));

        let mut h = Harness::new(outbox);
        // Earners are looked up as of the triggering award.
        h.awards
            .expect_earners_in_classroom()
            .withf(move |c, r, _, up_to| {
                *c == classroom && *r == Reason::Kindness && *up_to == award
            })
            .returning(move |_, _, _, _| Ok(vec![source, mate_a, mate_b]));
        let paid = Arc::new(Mutex::new(Vec::new()));
        let paid_log = paid.clone();
        h.students
            .expect_grant_gold()
            .withf(|_, _, amount| *amount == 2)
            .times(2)
            .returning(move |key, id, _| {
                paid_log.lock().unwrap().push((key.to_string(), id));
                Ok(true)
            });

        let report = h.build().execute(10).await.unwrap();

        assert_eq!(report.applied, 1);
        assert_eq!(report.grants, 2);
        let paid = paid.lock().unwrap();
        assert!(paid.iter().all(|(_, id)| *id != source));
        assert!(paid.contains(&(format!("{}:{}", entry_id, mate_a), mate_a)));
    }

    #[tokio::test]
    async fn retried_entry_does_not_double_credit() {
        let source = StudentId::new();
        let mate = StudentId::new();
        let mut e = entry(outward(
            source,
            ClassroomId::new(),
            None,
            OutwardEffect::ClassmateGold {
                amount: 2,
                source_branch: "healer_circle".into(),
            },
        ));
        e.attempts = 1;

        let mut outbox = outbox_with(vec![e]);
        outbox.expect_mark_applied().returning(|_, _| Ok(()));

        let mut h = Harness::new(outbox);
        h.awards
            .expect_earners_in_classroom()
            .returning(move |_, _, _, _| Ok(vec![mate]));
        // Key already used by the earlier attempt.
        h.students
            .expect_grant_gold()
            .times(1)
            .returning(|_, _, _| Ok(false));

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(report.grants, 0);
    }

    #[tokio::test]
    async fn failure_is_recorded_and_retried() {
        let e = entry(outward(
            StudentId::new(),
            ClassroomId::new(),
            None,
            OutwardEffect::ClassmateGold {
                amount: 1,
                source_branch: "x".into(),
            },
        ));
        let entry_id = e.id;

        let mut outbox = outbox_with(vec![e]);
        outbox.expect_mark_applied().never();
        outbox
            .expect_mark_failed()
            .withf(move |id, err, _, max| *id == entry_id && err.contains("locked") && *max == 3)
            .times(1)
            .returning(|_, _, _, _| Ok(OutboxStatus::Pending));

        let mut h = Harness::new(outbox);
        h.awards
            .expect_earners_in_classroom()
            .returning(|_, _, _, _| Err(RepoError::database("earners_in_classroom", "locked")));

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.failed, 1);
        assert_eq!(report.dead, 0);
    }

    #[tokio::test]
    async fn entry_goes_dead_after_last_attempt() {
        let mut e = entry(OutboxPayload::GuildCredit {
            student: StudentId::new(),
            stars: 2,
        });
        e.attempts = 2;

        let mut outbox = outbox_with(vec![e]);
        outbox
            .expect_mark_failed()
            .returning(|_, _, _, _| Ok(OutboxStatus::Dead));

        let mut h = Harness::new(outbox);
        h.students
            .expect_get()
            .returning(|_| Err(RepoError::database("student_get", "disk full")));

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.dead, 1);
        assert_eq!(report.applied, 0);
    }

    #[tokio::test]
    async fn random_classmate_gets_single_keyed_grant() {
        let classroom = ClassroomId::new();
        let source = StudentProgress::new(StudentId::new(), classroom, "Src").unwrap();
        let a = StudentProgress::new(StudentId::new(), classroom, "A").unwrap();
        let b = StudentProgress::new(StudentId::new(), classroom, "B").unwrap();
        let source_id = source.id();
        let b_id = b.id();
        let e = entry(outward(
            source_id,
            classroom,
            None,
            OutwardEffect::RandomClassmateGold {
                amount: 3,
                source_branch: "healer_mend".into(),
            },
        ));
        let random_key = format!("{}:random", e.id);

        let mut outbox = outbox_with(vec![e]);
        outbox.expect_mark_applied().returning(|_, _| Ok(()));

        let mut h = Harness::new(outbox);
        h.random = 1;
        h.students
            .expect_list_in_classroom()
            .returning(move |_| Ok(vec![a.clone(), source.clone(), b.clone()]));
        h.students
            .expect_grant_gold()
            .withf(move |key, id, amount| key == random_key && *id == b_id && *amount == 3)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.grants, 1);
    }

    #[tokio::test]
    async fn random_classmate_with_no_classmates_is_a_no_op() {
        let classroom = ClassroomId::new();
        let source = StudentProgress::new(StudentId::new(), classroom, "Solo").unwrap();
        let e = entry(outward(
            source.id(),
            classroom,
            None,
            OutwardEffect::RandomClassmateGold {
                amount: 3,
                source_branch: "healer_mend".into(),
            },
        ));

        let mut outbox = outbox_with(vec![e]);
        outbox.expect_mark_applied().returning(|_, _| Ok(()));

        let mut h = Harness::new(outbox);
        h.students
            .expect_list_in_classroom()
            .returning(move |_| Ok(vec![source.clone()]));
        h.students.expect_grant_gold().never();

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.applied, 1);
        assert_eq!(report.grants, 0);
    }

    #[tokio::test]
    async fn first_of_month_bonus_pays_every_other_guild_member() {
        let source = StudentId::new();
        let m1 = StudentId::new();
        let m2 = StudentId::new();
        let e = entry(outward(
            source,
            ClassroomId::new(),
            Some(GuildId::Grove),
            OutwardEffect::FirstOfMonthGuildBonus {
                amount: 10,
                source_branch: "healer_renewal".into(),
            },
        ));

        let mut outbox = outbox_with(vec![e]);
        outbox.expect_mark_applied().returning(|_, _| Ok(()));

        let mut h = Harness::new(outbox);
        h.guilds
            .expect_get()
            .withf(|g| *g == GuildId::Grove)
            .returning(move |_| {
                Ok(Some(GuildAggregate::from_parts(
                    GuildId::Grove,
                    0,
                    BTreeSet::from([source, m1, m2]),
                    None,
                )))
            });
        h.students
            .expect_grant_gold()
            .withf(move |_, id, amount| *id != source && *amount == 10)
            .times(2)
            .returning(|_, _, _| Ok(true));

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.grants, 2);
    }

    #[tokio::test]
    async fn guildmate_gold_without_guild_is_a_no_op() {
        let e = entry(outward(
            StudentId::new(),
            ClassroomId::new(),
            None,
            OutwardEffect::GuildmateGold {
                amount: 2,
                source_branch: "guardian_banner".into(),
            },
        ));
        let mut outbox = outbox_with(vec![e]);
        outbox.expect_mark_applied().returning(|_, _| Ok(()));

        let mut h = Harness::new(outbox);
        h.awards.expect_earners_in_guild().never();

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.applied, 1);
    }

    #[tokio::test]
    async fn guild_credit_uses_entry_scoped_key() {
        let s = StudentProgress::new(StudentId::new(), ClassroomId::new(), "G")
            .unwrap()
            .with_guild(Some(GuildId::Ember), None);
        let student_id = s.id();
        let e = entry(OutboxPayload::GuildCredit {
            student: student_id,
            stars: 5,
        });
        let expected_key = format!("{}:guild", e.id);

        let mut outbox = outbox_with(vec![e]);
        outbox.expect_mark_applied().returning(|_, _| Ok(()));

        let mut h = Harness::new(outbox);
        h.students
            .expect_get()
            .returning(move |_| Ok(Some(s.clone())));
        h.guilds
            .expect_credit_stars()
            .withf(move |key, g, stars, _| {
                key == expected_key && *g == GuildId::Ember && *stars == 5
            })
            .times(1)
            .returning(|_, _, _, _| Ok(true));

        let report = h.build().execute(10).await.unwrap();
        assert_eq!(report.grants, 1);
    }
}
