//! Static skill ladders, one per hero class.

use super::effect::Effect::{
    ClassmateGoldOnReason, FirstOfMonthGuildBonus, GuildmateGoldOnReason, RandomClassmateGold,
    SelfGoldOnReason, StarBonusOnReason,
};
use super::skill_tree::{SkillBranch, SkillLevel, SkillTree};
use super::HeroClass;

macro_rules! branch {
    ($id:literal, $name:literal, $effect:expr) => {
        SkillBranch {
            id: $id,
            name: $name,
            effect: $effect,
            secondary: None,
        }
    };
    ($id:literal, $name:literal, $effect:expr, $secondary:expr) => {
        SkillBranch {
            id: $id,
            name: $name,
            effect: $effect,
            secondary: Some($secondary),
        }
    };
}

// Guardian (respect) - 5 levels
static GUARDIAN_LEVELS: [SkillLevel; 5] = [
    SkillLevel {
        threshold: 5,
        branches: [
            branch!("guardian_steadfast", "Steadfast", SelfGoldOnReason { amount: 1 }),
            branch!("guardian_vigilant", "Vigilant", StarBonusOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 15,
        branches: [
            branch!("guardian_rally", "Rally", ClassmateGoldOnReason { amount: 2 }),
            branch!("guardian_banner", "Banner", GuildmateGoldOnReason { amount: 2 }),
        ],
    },
    SkillLevel {
        threshold: 30,
        branches: [
            branch!("guardian_tithe", "Tithe", SelfGoldOnReason { amount: 2 }),
            branch!("guardian_gift", "Gift", RandomClassmateGold { amount: 3 }),
        ],
    },
    SkillLevel {
        threshold: 50,
        branches: [
            branch!("guardian_muster", "Muster", FirstOfMonthGuildBonus { amount: 5 }),
            branch!("guardian_honor", "Honor", StarBonusOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 80,
        branches: [
            branch!(
                "guardian_bulwark",
                "Bulwark",
                SelfGoldOnReason { amount: 3 },
                GuildmateGoldOnReason { amount: 2 }
            ),
            branch!(
                "guardian_aegis",
                "Aegis",
                ClassmateGoldOnReason { amount: 3 },
                FirstOfMonthGuildBonus { amount: 10 }
            ),
        ],
    },
];

// Sage (focus) - 3 levels
static SAGE_LEVELS: [SkillLevel; 3] = [
    SkillLevel {
        threshold: 8,
        branches: [
            branch!("sage_study", "Study", SelfGoldOnReason { amount: 1 }),
            branch!("sage_mentor", "Mentor", ClassmateGoldOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 20,
        branches: [
            branch!("sage_insight", "Insight", StarBonusOnReason { amount: 1 }),
            branch!("sage_lecture", "Lecture", GuildmateGoldOnReason { amount: 2 }),
        ],
    },
    SkillLevel {
        threshold: 40,
        branches: [
            branch!(
                "sage_archive",
                "Archive",
                SelfGoldOnReason { amount: 2 },
                StarBonusOnReason { amount: 1 }
            ),
            branch!(
                "sage_library",
                "Library",
                FirstOfMonthGuildBonus { amount: 8 },
                ClassmateGoldOnReason { amount: 2 }
            ),
        ],
    },
];

// Artisan (creativity) - 5 levels
static ARTISAN_LEVELS: [SkillLevel; 5] = [
    SkillLevel {
        threshold: 5,
        branches: [
            branch!("artisan_sketch", "Sketch", SelfGoldOnReason { amount: 1 }),
            branch!("artisan_muse", "Muse", RandomClassmateGold { amount: 2 }),
        ],
    },
    SkillLevel {
        threshold: 12,
        branches: [
            branch!("artisan_workshop", "Workshop", ClassmateGoldOnReason { amount: 2 }),
            branch!("artisan_gallery", "Gallery", GuildmateGoldOnReason { amount: 2 }),
        ],
    },
    SkillLevel {
        threshold: 25,
        branches: [
            branch!("artisan_masterwork", "Masterwork", StarBonusOnReason { amount: 1 }),
            branch!("artisan_commission", "Commission", SelfGoldOnReason { amount: 2 }),
        ],
    },
    SkillLevel {
        threshold: 45,
        branches: [
            branch!("artisan_exhibition", "Exhibition", FirstOfMonthGuildBonus { amount: 6 }),
            branch!("artisan_patron", "Patron", RandomClassmateGold { amount: 4 }),
        ],
    },
    SkillLevel {
        threshold: 70,
        branches: [
            branch!(
                "artisan_legacy",
                "Legacy",
                SelfGoldOnReason { amount: 3 },
                RandomClassmateGold { amount: 3 }
            ),
            branch!(
                "artisan_renaissance",
                "Renaissance",
                StarBonusOnReason { amount: 1 },
                GuildmateGoldOnReason { amount: 3 }
            ),
        ],
    },
];

// Ranger (teamwork) - 3 levels
static RANGER_LEVELS: [SkillLevel; 3] = [
    SkillLevel {
        threshold: 6,
        branches: [
            branch!("ranger_scout", "Scout", GuildmateGoldOnReason { amount: 1 }),
            branch!("ranger_tracker", "Tracker", SelfGoldOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 18,
        branches: [
            branch!("ranger_pack", "Pack", ClassmateGoldOnReason { amount: 2 }),
            branch!("ranger_trail", "Trail", StarBonusOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 36,
        branches: [
            branch!(
                "ranger_warden",
                "Warden",
                FirstOfMonthGuildBonus { amount: 8 },
                GuildmateGoldOnReason { amount: 2 }
            ),
            branch!(
                "ranger_pathfinder",
                "Pathfinder",
                SelfGoldOnReason { amount: 3 },
                RandomClassmateGold { amount: 2 }
            ),
        ],
    },
];

// Healer (kindness) - 5 levels
static HEALER_LEVELS: [SkillLevel; 5] = [
    SkillLevel {
        threshold: 4,
        branches: [
            branch!("healer_mend", "Mend", RandomClassmateGold { amount: 2 }),
            branch!("healer_tend", "Tend", SelfGoldOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 12,
        branches: [
            branch!("healer_circle", "Circle", ClassmateGoldOnReason { amount: 2 }),
            branch!("healer_balm", "Balm", StarBonusOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 24,
        branches: [
            branch!("healer_sanctuary", "Sanctuary", GuildmateGoldOnReason { amount: 2 }),
            branch!("healer_remedy", "Remedy", SelfGoldOnReason { amount: 2 }),
        ],
    },
    SkillLevel {
        threshold: 40,
        branches: [
            branch!("healer_pilgrimage", "Pilgrimage", FirstOfMonthGuildBonus { amount: 6 }),
            branch!("healer_blessing", "Blessing", RandomClassmateGold { amount: 4 }),
        ],
    },
    SkillLevel {
        threshold: 64,
        branches: [
            branch!(
                "healer_radiance",
                "Radiance",
                ClassmateGoldOnReason { amount: 3 },
                SelfGoldOnReason { amount: 2 }
            ),
            branch!(
                "healer_renewal",
                "Renewal",
                StarBonusOnReason { amount: 1 },
                FirstOfMonthGuildBonus { amount: 10 }
            ),
        ],
    },
];

// Champion (perseverance) - 3 levels
static CHAMPION_LEVELS: [SkillLevel; 3] = [
    SkillLevel {
        threshold: 10,
        branches: [
            branch!("champion_grit", "Grit", SelfGoldOnReason { amount: 1 }),
            branch!("champion_rally", "Rally", GuildmateGoldOnReason { amount: 1 }),
        ],
    },
    SkillLevel {
        threshold: 25,
        branches: [
            branch!("champion_endure", "Endure", StarBonusOnReason { amount: 1 }),
            branch!("champion_inspire", "Inspire", ClassmateGoldOnReason { amount: 2 }),
        ],
    },
    SkillLevel {
        threshold: 50,
        branches: [
            branch!(
                "champion_legend",
                "Legend",
                SelfGoldOnReason { amount: 3 },
                FirstOfMonthGuildBonus { amount: 8 }
            ),
            branch!(
                "champion_triumph",
                "Triumph",
                StarBonusOnReason { amount: 1 },
                RandomClassmateGold { amount: 3 }
            ),
        ],
    },
];

pub(super) static GUARDIAN_TREE: SkillTree = SkillTree {
    class: HeroClass::Guardian,
    levels: &GUARDIAN_LEVELS,
};

pub(super) static SAGE_TREE: SkillTree = SkillTree {
    class: HeroClass::Sage,
    levels: &SAGE_LEVELS,
};

pub(super) static ARTISAN_TREE: SkillTree = SkillTree {
    class: HeroClass::Artisan,
    levels: &ARTISAN_LEVELS,
};

pub(super) static RANGER_TREE: SkillTree = SkillTree {
    class: HeroClass::Ranger,
    levels: &RANGER_LEVELS,
};

pub(super) static HEALER_TREE: SkillTree = SkillTree {
    class: HeroClass::Healer,
    levels: &HEALER_LEVELS,
};

pub(super) static CHAMPION_TREE: SkillTree = SkillTree {
    class: HeroClass::Champion,
    levels: &CHAMPION_LEVELS,
};
