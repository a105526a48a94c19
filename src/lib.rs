// In: src/lib.rs

//! Arena Combat Engine
//!
//! Turn-based team combat for a role-playing game: timed status effects,
//! level-scaled skills, elemental combos, probabilistic loot and a round
//! scheduler that drives every battle to a terminal outcome.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod character;
pub mod config;
pub mod effects;
pub mod errors;
pub mod item;
pub mod loot;
pub mod records;
pub mod skill_data;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    CharacterClass, DamageType, EffectKind, EquipSlot, ItemCategory, ItemSet, Location,
    ObjectiveKind, Quality, Skill, SkillTarget, Stat, Weather,
};

// --- From this crate's modules (`src/`) ---

// Battle entry points and their inputs and outputs.
pub use battle::ai::{Action, BattleView, DecisionProvider, RandomEnemyAi, ScriptedDecisions};
pub use battle::engine::{run_battle, start_battle, BattleOptions, BattleProviders, BattleResult};
pub use battle::rewards::{NoObjectives, ObjectiveLog, ObjectiveSink, RewardGrant};
pub use battle::state::{BattleEvent, BattleRng, TeamSide};

// Core runtime types.
pub use character::Character;
pub use effects::Effect;
pub use item::{Enchantment, Item};

// Standalone components.
pub use battle::combos::{evaluate_combos, ElementalComboRule};
pub use battle::skills::{attack, use_skill, Combatant};
pub use effects::{advance_effects, apply_effect};
pub use loot::generate_loot;
pub use records::RecordSet;

pub use config::EngineConfig;
pub use errors::{
    ActionError, ActionResult, ConfigError, EngineError, EngineResult, RecordError, RecordResult,
};
