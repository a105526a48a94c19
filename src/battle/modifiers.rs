//! Battlefield modifiers and the per-battle stat view they produce.
//!
//! Modifiers never touch a `Character`. They are collected in a
//! [`ModifierStack`] and folded into a [`CombatStats`] copy when a battle
//! starts; dropping the stack is all it takes to undo them.

use crate::character::Character;
use crate::config::BattleLimits;
use schema::{Location, Stat, Weather};
use serde::{Deserialize, Serialize};

pub const KNIGHTS: &str = "Knights";
pub const MAGES: &str = "Mages";

const KNIGHTS_ATTACK_BONUS: f64 = 0.05;
const MAGES_MANA_DISCOUNT: f64 = -0.10;

/// Where a modifier came from.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum ModifierSource {
    Weather(Weather),
    Location(Location),
    Faction(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Modifier {
    pub source: ModifierSource,
    pub stat: Stat,
    /// Fractional adjustment, e.g. `-0.1` for ten percent less.
    pub amount: f64,
}

/// Ordered collection of active modifiers.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ModifierStack {
    modifiers: Vec<Modifier>,
}

impl ModifierStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack holding the weather and (optional) location adjustments.
    pub fn battlefield(weather: Weather, location: Option<Location>) -> Self {
        let mut stack = Self::new();
        stack.push_all(ModifierSource::Weather(weather), weather.modifiers());
        if let Some(location) = location {
            stack.push_all(ModifierSource::Location(location), location.modifiers());
        }
        stack
    }

    pub fn push(&mut self, source: ModifierSource, stat: Stat, amount: f64) {
        self.modifiers.push(Modifier {
            source,
            stat,
            amount,
        });
    }

    fn push_all(&mut self, source: ModifierSource, entries: &[(Stat, f64)]) {
        for &(stat, amount) in entries {
            self.push(source.clone(), stat, amount);
        }
    }

    /// Remove every modifier contributed by `source`. Returns how many were removed.
    pub fn remove_source(&mut self, source: &ModifierSource) -> usize {
        let before = self.modifiers.len();
        self.modifiers.retain(|modifier| &modifier.source != source);
        before - self.modifiers.len()
    }

    /// Copy of this stack plus the faction bonuses `character` qualifies for.
    pub fn with_faction_bonuses(&self, character: &Character, limits: &BattleLimits) -> Self {
        let mut stack = self.clone();
        if character.reputation_with(KNIGHTS) >= limits.faction_bonus_standing {
            stack.push(
                ModifierSource::Faction(KNIGHTS.to_string()),
                Stat::AttackPower,
                KNIGHTS_ATTACK_BONUS,
            );
        }
        if character.reputation_with(MAGES) >= limits.faction_bonus_standing {
            stack.push(
                ModifierSource::Faction(MAGES.to_string()),
                Stat::ManaCost,
                MAGES_MANA_DISCOUNT,
            );
        }
        stack
    }

    /// Sum of the adjustments for one stat.
    pub fn total(&self, stat: Stat) -> f64 {
        self.modifiers
            .iter()
            .filter(|modifier| modifier.stat == stat)
            .map(|modifier| modifier.amount)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }

    /// Fold the stack over a character's gear-inclusive stats.
    pub fn apply(&self, character: &Character) -> CombatStats {
        CombatStats {
            attack_power: character.offensive_power() * scale(self.total(Stat::AttackPower)),
            defense: character.defensive_power() * scale(self.total(Stat::Defense)),
            mana_cost_multiplier: scale(self.total(Stat::ManaCost)),
        }
    }
}

// Adjustments below -100% would flip the sign of a stat.
fn scale(total: f64) -> f64 {
    (1.0 + total).max(0.0)
}

/// Stats a character fights with for the duration of one battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct CombatStats {
    /// Base attack plus weapon and accessory, after modifiers.
    pub attack_power: f64,
    /// Base defense plus armor and accessory, after modifiers.
    pub defense: f64,
    pub mana_cost_multiplier: f64,
}

impl CombatStats {
    /// Stats with no battlefield modifiers at all.
    pub fn unmodified(character: &Character) -> Self {
        ModifierStack::new().apply(character)
    }

    pub fn mana_cost(&self, base_cost: f64) -> f64 {
        base_cost * self.mana_cost_multiplier
    }
}
