use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Elemental tag carried by skills, weapons and loot.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum DamageType {
    Physical,
    Fire,
    Ice,
    Poison,
    Magical,
}

impl DamageType {
    /// Prefix used when naming generated loot. Physical gear gets no prefix.
    pub fn item_prefix(self) -> &'static str {
        match self {
            DamageType::Physical => "",
            DamageType::Fire => "Fiery",
            DamageType::Ice => "Frozen",
            DamageType::Poison => "Venomous",
            DamageType::Magical => "Arcane",
        }
    }
}

/// The kinds of timed status effect a character can carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EffectKind {
    Regeneration,
    Burn,
    Freeze,
    Poison,
    Stun,
}

impl EffectKind {
    /// Effects that cost the afflicted character its action for the round.
    pub fn prevents_action(self) -> bool {
        matches!(self, EffectKind::Freeze | EffectKind::Stun)
    }

    /// Effects removed by cleansing skills.
    pub fn is_harmful(self) -> bool {
        !matches!(self, EffectKind::Regeneration)
    }
}

/// Combat attributes that battlefield modifiers can scale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display,
)]
pub enum Stat {
    AttackPower,
    Defense,
    ManaCost,
}
