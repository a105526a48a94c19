//! Engine tuning loaded once at startup.
//!
//! Every value has a built-in default; `data/engine.ron` spells the same
//! defaults out so they can be tuned without a rebuild.

use crate::battle::combos::ElementalComboRule;
use crate::effects::Effect;
use crate::errors::ConfigError;
use schema::{DamageType, EffectKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rewards: RewardConfig,
    pub loot: LootConfig,
    pub limits: BattleLimits,
    pub combos: Vec<ElementalComboRule>,
}

/// Victory rewards. Experience and gold are multiplied by difficulty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RewardConfig {
    pub experience_per_difficulty: u32,
    pub gold_per_difficulty: u32,
    pub reputation_award: i32,
    pub reputation_faction: String,
    pub reputation_cap: i32,
}

/// Loot quality thresholds and roll ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub legendary_threshold: f64,
    pub epic_threshold: f64,
    pub rare_threshold: f64,
    /// Amount every difficulty point above 1 lowers each threshold.
    pub difficulty_shift: f64,
    pub min_base_power: u32,
    pub max_base_power: u32,
    pub value_per_power: u32,
    pub enchantment_threshold: f64,
    pub min_enchantment_power: f64,
    pub max_enchantment_power: f64,
    pub item_set_threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleLimits {
    /// Rounds after which an undecided battle is declared a draw.
    pub max_rounds: u32,
    /// Times a decision provider is asked again after an invalid action.
    pub max_decision_attempts: u32,
    /// Standing with a faction needed before its battle bonus applies.
    pub faction_bonus_standing: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rewards: RewardConfig::default(),
            loot: LootConfig::default(),
            limits: BattleLimits::default(),
            combos: default_combos(),
        }
    }
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            experience_per_difficulty: 50,
            gold_per_difficulty: 100,
            reputation_award: 5,
            reputation_faction: "Knights".to_string(),
            reputation_cap: 100,
        }
    }
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            legendary_threshold: 0.95,
            epic_threshold: 0.80,
            rare_threshold: 0.50,
            difficulty_shift: 0.05,
            min_base_power: 5,
            max_base_power: 15,
            value_per_power: 10,
            enchantment_threshold: 0.7,
            min_enchantment_power: 0.1,
            max_enchantment_power: 0.3,
            item_set_threshold: 0.9,
        }
    }
}

impl Default for BattleLimits {
    fn default() -> Self {
        Self {
            max_rounds: 100,
            max_decision_attempts: 3,
            faction_bonus_standing: 50,
        }
    }
}

/// The three combos of the base game.
pub fn default_combos() -> Vec<ElementalComboRule> {
    vec![
        ElementalComboRule::new(
            "Steam",
            vec![DamageType::Fire, DamageType::Ice],
            Effect::new(EffectKind::Stun, 2, 0.0),
        ),
        ElementalComboRule::new(
            "Explosion",
            vec![DamageType::Fire, DamageType::Physical],
            Effect::new(EffectKind::Burn, 3, 5.0),
        ),
        ElementalComboRule::new(
            "Toxic Cloud",
            vec![DamageType::Poison, DamageType::Magical],
            Effect::new(EffectKind::Poison, 3, 7.0),
        ),
    ]
}

impl EngineConfig {
    /// Parse a RON document and validate it.
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate the config file at `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ron_str(&source)?;
        tracing::info!(path = %path.display(), combos = config.combos.len(), "engine config loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let loot = &self.loot;
        if !(loot.rare_threshold <= loot.epic_threshold
            && loot.epic_threshold <= loot.legendary_threshold)
        {
            return Err(ConfigError::Invalid(
                "loot thresholds must satisfy rare <= epic <= legendary".to_string(),
            ));
        }
        if loot.min_base_power > loot.max_base_power {
            return Err(ConfigError::Invalid(
                "min_base_power exceeds max_base_power".to_string(),
            ));
        }
        if loot.min_enchantment_power > loot.max_enchantment_power {
            return Err(ConfigError::Invalid(
                "min_enchantment_power exceeds max_enchantment_power".to_string(),
            ));
        }
        if self.limits.max_rounds == 0 || self.limits.max_decision_attempts == 0 {
            return Err(ConfigError::Invalid(
                "battle limits must be at least 1".to_string(),
            ));
        }
        if let Some(rule) = self.combos.iter().find(|rule| rule.required.is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "combo {} has no required damage types",
                rule.name
            )));
        }
        Ok(())
    }
}
