use crate::combat_types::Stat;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Weather {
    Clear,
    Rain,
    Storm,
    Fog,
}

impl Weather {
    /// Fractional stat adjustments this weather imposes on every combatant.
    pub fn modifiers(self) -> &'static [(Stat, f64)] {
        match self {
            Weather::Clear => &[],
            Weather::Rain => &[(Stat::AttackPower, -0.1)],
            Weather::Storm => &[(Stat::AttackPower, -0.2), (Stat::ManaCost, 0.1)],
            Weather::Fog => &[(Stat::AttackPower, -0.15), (Stat::Defense, -0.1)],
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Location {
    Forest,
    Mountains,
    Desert,
}

impl Location {
    pub fn modifiers(self) -> &'static [(Stat, f64)] {
        match self {
            Location::Forest => &[(Stat::AttackPower, 0.1)],
            Location::Mountains => &[(Stat::Defense, 0.2), (Stat::AttackPower, -0.1)],
            Location::Desert => &[(Stat::AttackPower, 0.15), (Stat::ManaCost, 0.1)],
        }
    }
}

/// Quest objectives the combat core reports progress on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
    EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ObjectiveKind {
    EnemiesDefeated,
    RareItems,
    GuildVictory,
    MaxRelations,
}
