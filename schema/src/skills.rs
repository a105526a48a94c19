use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Every skill the engine knows how to resolve.
///
/// The string form (`"Power Strike"`, `"Fireball"`, ...) is the stable skill
/// name used by records and by callers that identify skills by text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "title_case", ascii_case_insensitive)]
pub enum Skill {
    PowerStrike,
    Guard,
    Cleave,
    Fireball,
    FrostKiss,
    ArcaneShield,
    Heal,
    Purify,
    Counterstrike,
    Earthquake,
    Backstab,
    PoisonedBlade,
    ShadowStrike,
}

/// Which side of the field a skill is aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillTarget {
    Enemies,
    Allies,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum CharacterClass {
    Warrior,
    Mage,
    Rogue,
}

impl CharacterClass {
    /// Skills a freshly created character of this class starts with.
    pub fn starting_skills(self) -> [Skill; 2] {
        match self {
            CharacterClass::Warrior => [Skill::PowerStrike, Skill::Guard],
            CharacterClass::Mage => [Skill::Fireball, Skill::ArcaneShield],
            CharacterClass::Rogue => [Skill::Backstab, Skill::PoisonedBlade],
        }
    }
}
