//! StudentProgress aggregate - a student's stars, gold, hero ladder, and guild.
//!
//! # Invariants
//!
//! - `hero_level` always equals the level computed from the stars earned in
//!   the hero class's reason
//! - a skill slot is only filled once its level is unlocked, and never changes
//!   afterwards
//! - `stars_by_reason` only grows
//! - the guild, once assigned, is permanent

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::catalog::{ClassDefinition, HeroClass, SkillBranch, SkillTree};
use crate::error::{DomainError, GuildAssignmentError, HeroClassError, SkillChoiceError};
use crate::ids::{ClassroomId, StudentId};
use crate::rules::DirectBonus;
use crate::value_objects::{GuildId, MonthKey, Reason};

/// Running totals that storage updates with atomic increments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StudentCounters {
    pub total_stars: u64,
    pub monthly_stars: u64,
    pub monthly_stars_month: Option<MonthKey>,
    pub gold: i64,
}

/// Level transition caused by a mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelChange {
    pub previous: usize,
    pub current: usize,
    /// True when this change raised the pending-choice flag.
    pub skill_choice_raised: bool,
}

impl LevelChange {
    pub fn leveled_up(&self) -> bool {
        self.current > self.previous
    }
}

/// Result of a successful skill choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkillChoice {
    /// The slot was empty and now holds the branch.
    Chosen { level: usize, branch_id: String },
    /// The same branch was already in the slot.
    Unchanged { level: usize, branch_id: String },
}

/// Result of a successful guild assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuildAssignment {
    Assigned(GuildId),
    Unchanged(GuildId),
}

/// A student's progression record.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProgress {
    // Identity
    id: StudentId,
    classroom_id: ClassroomId,
    display_name: String,

    // Hero ladder
    hero_class: Option<HeroClass>,
    hero_class_locked: bool,
    chosen_skills: Vec<Option<String>>,
    stars_by_reason: BTreeMap<Reason, u32>,
    hero_level: usize,
    pending_skill_choice: bool,
    last_guild_bonus_month: BTreeMap<Reason, MonthKey>,

    // Guild
    guild_id: Option<GuildId>,
    guild_assigned_at: Option<DateTime<Utc>>,

    // Running totals
    counters: StudentCounters,

    // Storage revision the document was read at
    version: u64,
}

impl StudentProgress {
    // =========================================================================
    // Constructor
    // =========================================================================

    /// Enroll a student with no hero class and no guild.
    pub fn new(
        id: StudentId,
        classroom_id: ClassroomId,
        display_name: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let display_name = display_name.into().trim().to_string();
        if display_name.is_empty() {
            return Err(DomainError::validation("display name cannot be empty"));
        }

        Ok(Self {
            id,
            classroom_id,
            display_name,
            hero_class: None,
            hero_class_locked: false,
            chosen_skills: Vec::new(),
            stars_by_reason: BTreeMap::new(),
            hero_level: 0,
            pending_skill_choice: false,
            last_guild_bonus_month: BTreeMap::new(),
            guild_id: None,
            guild_assigned_at: None,
            counters: StudentCounters::default(),
            version: 0,
        })
    }

    /// Replace the running totals with values read from storage.
    pub fn with_counters(mut self, counters: StudentCounters) -> Self {
        self.counters = counters;
        self
    }

    /// Record the storage revision this copy was read at.
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = version;
        self
    }

    /// Restore guild membership read from storage.
    pub fn with_guild(mut self, guild_id: Option<GuildId>, at: Option<DateTime<Utc>>) -> Self {
        self.guild_id = guild_id;
        self.guild_assigned_at = at;
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn id(&self) -> StudentId {
        self.id
    }

    #[inline]
    pub fn classroom_id(&self) -> ClassroomId {
        self.classroom_id
    }

    #[inline]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    #[inline]
    pub fn hero_class(&self) -> Option<HeroClass> {
        self.hero_class
    }

    #[inline]
    pub fn is_hero_class_locked(&self) -> bool {
        self.hero_class_locked
    }

    pub fn class_definition(&self) -> Option<&'static ClassDefinition> {
        self.hero_class.map(|c| c.definition())
    }

    pub fn skill_tree(&self) -> Option<&'static SkillTree> {
        self.hero_class.map(|c| c.skill_tree())
    }

    /// Chosen branch id per level; `None` for open or locked slots.
    #[inline]
    pub fn chosen_skills(&self) -> &[Option<String>] {
        &self.chosen_skills
    }

    /// Branch definitions for every filled slot, in level order.
    pub fn chosen_branches(&self) -> Vec<&'static SkillBranch> {
        let Some(tree) = self.skill_tree() else {
            return Vec::new();
        };
        self.chosen_skills
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| {
                let branch_id = slot.as_deref()?;
                tree.level(idx)?.branch(branch_id)
            })
            .collect()
    }

    #[inline]
    pub fn stars_by_reason(&self) -> &BTreeMap<Reason, u32> {
        &self.stars_by_reason
    }

    pub fn stars_in(&self, reason: Reason) -> u32 {
        self.stars_by_reason.get(&reason).copied().unwrap_or(0)
    }

    /// Stars in the hero class's reason, or 0 without a class.
    pub fn stars_in_class_reason(&self) -> u32 {
        self.hero_class
            .map(|c| self.stars_in(c.reason()))
            .unwrap_or(0)
    }

    #[inline]
    pub fn hero_level(&self) -> usize {
        self.hero_level
    }

    pub fn stars_to_next_level(&self) -> Option<u32> {
        self.skill_tree()?
            .stars_to_next_level(self.hero_level, self.stars_in_class_reason())
    }

    #[inline]
    pub fn pending_skill_choice(&self) -> bool {
        self.pending_skill_choice
    }

    /// First unlocked level whose slot is still empty.
    pub fn open_skill_level(&self) -> Option<usize> {
        (0..self.hero_level).find(|&idx| self.chosen_skills.get(idx).map_or(true, Option::is_none))
    }

    pub fn last_guild_bonus_month(&self, reason: Reason) -> Option<MonthKey> {
        self.last_guild_bonus_month.get(&reason).copied()
    }

    #[inline]
    pub fn guild_id(&self) -> Option<GuildId> {
        self.guild_id
    }

    #[inline]
    pub fn guild_assigned_at(&self) -> Option<DateTime<Utc>> {
        self.guild_assigned_at
    }

    #[inline]
    pub fn counters(&self) -> StudentCounters {
        self.counters
    }

    #[inline]
    pub fn total_stars(&self) -> u64 {
        self.counters.total_stars
    }

    #[inline]
    pub fn monthly_stars(&self) -> u64 {
        self.counters.monthly_stars
    }

    #[inline]
    pub fn gold(&self) -> i64 {
        self.counters.gold
    }

    /// Storage revision; writes of the progress document must match it.
    pub fn version(&self) -> u64 {
        self.version
    }

    // =========================================================================
    // Hero class
    // =========================================================================

    /// Pick a hero class. Switching classes clears the ladder; a locked class
    /// cannot be switched.
    pub fn select_hero_class(&mut self, class: HeroClass) -> Result<LevelChange, HeroClassError> {
        if self.hero_class == Some(class) {
            return Ok(self.refresh_level());
        }
        if self.hero_class_locked {
            return Err(HeroClassError::Locked {
                current: self
                    .hero_class
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
            });
        }

        self.hero_class = Some(class);
        self.chosen_skills = vec![None; class.skill_tree().max_level()];
        self.hero_level = 0;
        self.pending_skill_choice = false;
        Ok(self.refresh_level())
    }

    pub fn lock_hero_class(&mut self) -> Result<(), HeroClassError> {
        if self.hero_class.is_none() {
            return Err(HeroClassError::NoHeroClass);
        }
        self.hero_class_locked = true;
        Ok(())
    }

    // =========================================================================
    // Skill selection
    // =========================================================================

    /// Permanently choose a branch at an unlocked level.
    ///
    /// Re-choosing the branch already in the slot succeeds without change.
    /// The first successful choice locks the hero class.
    pub fn choose_skill(
        &mut self,
        level: usize,
        branch_id: &str,
    ) -> Result<SkillChoice, SkillChoiceError> {
        let tree = self.skill_tree().ok_or(SkillChoiceError::NoHeroClass)?;
        let skill_level = tree
            .level(level)
            .ok_or(SkillChoiceError::LevelOutOfRange {
                level,
                max_level: tree.max_level(),
            })?;

        let current = self.stars_in_class_reason();
        if current < skill_level.threshold {
            return Err(SkillChoiceError::LevelLocked {
                level,
                required: skill_level.threshold,
                current,
            });
        }

        if let Some(existing) = self.chosen_skills.get(level).and_then(Option::as_ref) {
            if existing == branch_id {
                return Ok(SkillChoice::Unchanged {
                    level,
                    branch_id: existing.clone(),
                });
            }
            return Err(SkillChoiceError::AlreadyChosen {
                level,
                existing: existing.clone(),
            });
        }

        if skill_level.branch(branch_id).is_none() {
            return Err(SkillChoiceError::UnknownBranch {
                level,
                branch_id: branch_id.to_string(),
            });
        }

        if self.chosen_skills.len() < tree.max_level() {
            self.chosen_skills.resize(tree.max_level(), None);
        }
        self.chosen_skills[level] = Some(branch_id.to_string());
        self.hero_class_locked = true;
        self.pending_skill_choice = self.open_skill_level().is_some();

        Ok(SkillChoice::Chosen {
            level,
            branch_id: branch_id.to_string(),
        })
    }

    // =========================================================================
    // Awards
    // =========================================================================

    /// Credit an award and its resolved bonus to this student.
    ///
    /// `stars` go to the reason counter; total and monthly counters also get
    /// the bonus stars. The monthly counter restarts when `on` falls in a new
    /// month.
    pub fn apply_award(
        &mut self,
        reason: Option<Reason>,
        stars: u32,
        bonus: &DirectBonus,
        on: NaiveDate,
    ) -> LevelChange {
        if let Some(reason) = reason {
            let entry = self.stars_by_reason.entry(reason).or_insert(0);
            *entry = entry.saturating_add(stars);
        }

        let credited = u64::from(stars) + u64::from(bonus.bonus_stars);
        let month = MonthKey::of(on);
        self.counters.total_stars += credited;
        if self.counters.monthly_stars_month == Some(month) {
            self.counters.monthly_stars += credited;
        } else {
            self.counters.monthly_stars = credited;
            self.counters.monthly_stars_month = Some(month);
        }
        self.counters.gold += bonus.gold_change;

        self.refresh_level()
    }

    /// Recompute the cached level and the pending-choice flag.
    pub fn refresh_level(&mut self) -> LevelChange {
        let previous = self.hero_level;
        let was_pending = self.pending_skill_choice;

        match self.skill_tree() {
            Some(tree) => {
                self.hero_level = tree.level_for(self.stars_in_class_reason());
                if self.chosen_skills.len() < tree.max_level() {
                    self.chosen_skills.resize(tree.max_level(), None);
                }
            }
            None => self.hero_level = 0,
        }
        self.pending_skill_choice = self.open_skill_level().is_some();

        LevelChange {
            previous,
            current: self.hero_level,
            skill_choice_raised: self.pending_skill_choice && !was_pending,
        }
    }

    // =========================================================================
    // Monthly guild bonus
    // =========================================================================

    /// Whether the guild-wide bonus for `reason` has not fired in `month`.
    pub fn guild_bonus_due(&self, reason: Reason, month: MonthKey) -> bool {
        self.last_guild_bonus_month(reason) != Some(month)
    }

    /// Mark the guild-wide bonus for `reason` as fired in `month`.
    ///
    /// Returns `false` when it already fired this month.
    pub fn claim_guild_bonus(&mut self, reason: Reason, month: MonthKey) -> bool {
        if !self.guild_bonus_due(reason, month) {
            return false;
        }
        self.last_guild_bonus_month.insert(reason, month);
        true
    }

    // =========================================================================
    // Guild
    // =========================================================================

    /// Assign a guild once. Reassigning the same guild is a no-op.
    pub fn assign_guild(
        &mut self,
        guild_id: GuildId,
        at: DateTime<Utc>,
    ) -> Result<GuildAssignment, GuildAssignmentError> {
        match self.guild_id {
            Some(existing) if existing == guild_id => Ok(GuildAssignment::Unchanged(existing)),
            Some(existing) => Err(GuildAssignmentError::AlreadyAssigned {
                existing: existing.to_string(),
            }),
            None => {
                self.guild_id = Some(guild_id);
                self.guild_assigned_at = Some(at);
                Ok(GuildAssignment::Assigned(guild_id))
            }
        }
    }
}

// ============================================================================
// Serde Implementation
// ============================================================================

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StudentProgressWireFormat {
    id: StudentId,
    classroom_id: ClassroomId,
    display_name: String,
    hero_class: Option<HeroClass>,
    #[serde(default)]
    is_hero_class_locked: bool,
    #[serde(default)]
    hero_skills: Vec<Option<String>>,
    #[serde(default)]
    stars_by_reason: BTreeMap<Reason, u32>,
    #[serde(default)]
    hero_level: usize,
    #[serde(default)]
    pending_skill_choice: bool,
    #[serde(default)]
    last_guild_bonus_month: BTreeMap<Reason, MonthKey>,
    guild_id: Option<GuildId>,
    guild_assignment_date: Option<DateTime<Utc>>,
    #[serde(default)]
    total_stars: u64,
    #[serde(default)]
    monthly_stars: u64,
    monthly_stars_month: Option<MonthKey>,
    #[serde(default)]
    gold: i64,
}

impl Serialize for StudentProgress {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let wire = StudentProgressWireFormat {
            id: self.id,
            classroom_id: self.classroom_id,
            display_name: self.display_name.clone(),
            hero_class: self.hero_class,
            is_hero_class_locked: self.hero_class_locked,
            hero_skills: self.chosen_skills.clone(),
            stars_by_reason: self.stars_by_reason.clone(),
            hero_level: self.hero_level,
            pending_skill_choice: self.pending_skill_choice,
            last_guild_bonus_month: self.last_guild_bonus_month.clone(),
            guild_id: self.guild_id,
            guild_assignment_date: self.guild_assigned_at,
            total_stars: self.counters.total_stars,
            monthly_stars: self.counters.monthly_stars,
            monthly_stars_month: self.counters.monthly_stars_month,
            gold: self.counters.gold,
        };
        wire.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StudentProgress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let wire = StudentProgressWireFormat::deserialize(deserializer)?;

        let mut student = StudentProgress {
            id: wire.id,
            classroom_id: wire.classroom_id,
            display_name: wire.display_name,
            hero_class: wire.hero_class,
            hero_class_locked: wire.is_hero_class_locked,
            chosen_skills: wire.hero_skills,
            stars_by_reason: wire.stars_by_reason,
            hero_level: wire.hero_level,
            pending_skill_choice: wire.pending_skill_choice,
            last_guild_bonus_month: wire.last_guild_bonus_month,
            guild_id: wire.guild_id,
            guild_assigned_at: wire.guild_assignment_date,
            counters: StudentCounters {
                total_stars: wire.total_stars,
                monthly_stars: wire.monthly_stars,
                monthly_stars_month: wire.monthly_stars_month,
                gold: wire.gold,
            },
            version: 0,
        };
        // The cached level is derived state; never trust a stored copy.
        student.refresh_level();
        Ok(student)
    }
}

// ============================================================================
// Tests
// ============================================================================
