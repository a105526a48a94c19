//! Victory rewards and quest-objective signals.

use crate::battle::state::{BattleEvent, BattleRng, EventBus};
use crate::character::Character;
use crate::config::EngineConfig;
use crate::item::Item;
use crate::loot::generate_loot;
use schema::{ObjectiveKind, Quality};
use std::collections::BTreeMap;

/// Receives objective progress emitted by the combat core. Quest tracking
/// itself lives outside the engine.
pub trait ObjectiveSink {
    fn on_objective_progress(&mut self, character: &str, kind: ObjectiveKind, amount: u32);
}

/// Sink that drops every signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoObjectives;

impl ObjectiveSink for NoObjectives {
    fn on_objective_progress(&mut self, _: &str, _: ObjectiveKind, _: u32) {}
}

/// Sink that keeps every signal in arrival order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectiveLog {
    pub entries: Vec<(String, ObjectiveKind, u32)>,
}

impl ObjectiveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total progress reported for one character and objective.
    pub fn total(&self, character: &str, kind: ObjectiveKind) -> u32 {
        self.entries
            .iter()
            .filter(|(name, entry_kind, _)| name == character && *entry_kind == kind)
            .map(|(_, _, amount)| amount)
            .sum()
    }
}

impl ObjectiveSink for ObjectiveLog {
    fn on_objective_progress(&mut self, character: &str, kind: ObjectiveKind, amount: u32) {
        self.entries.push((character.to_string(), kind, amount));
    }
}

/// Everything one winner received.
#[derive(Debug, Clone, PartialEq)]
pub struct RewardGrant {
    pub character: String,
    pub loot: Item,
    pub experience: u32,
    pub gold: u32,
    pub levels_gained: u32,
    /// Standing with the reward faction after the award.
    pub reputation: i32,
}

/// Grant loot, experience, gold and reputation to every living winner and
/// emit the matching objective signals.
///
/// `kills` maps a winner's index in `winners` to the defeats credited to it.
pub fn award_victory(
    winners: &mut [Character],
    difficulty: u32,
    kills: &BTreeMap<usize, u32>,
    config: &EngineConfig,
    rng: &mut BattleRng,
    bus: &mut EventBus,
    sink: &mut dyn ObjectiveSink,
) -> Vec<RewardGrant> {
    let rewards = &config.rewards;
    let difficulty = difficulty.max(1);
    let guild_victory = shared_guild(winners).is_some();

    let mut grants = Vec::new();
    for (index, winner) in winners.iter_mut().enumerate().filter(|(_, c)| c.is_alive()) {
        let loot = generate_loot(difficulty, &config.loot, rng);
        winner.inventory.push(loot.clone());
        bus.push(BattleEvent::LootAwarded {
            character: winner.name.clone(),
            item: loot.clone(),
        });

        let experience = rewards.experience_per_difficulty.saturating_mul(difficulty);
        let gold = rewards.gold_per_difficulty.saturating_mul(difficulty);
        let levels_gained = winner.add_experience(experience);
        winner.gold = winner.gold.saturating_add(gold);

        let standing_before = winner.reputation_with(&rewards.reputation_faction);
        let reputation = winner.adjust_reputation(
            &rewards.reputation_faction,
            rewards.reputation_award,
            rewards.reputation_cap,
        );

        // --- Objective signals ---
        if let Some(&count) = kills.get(&index) {
            if count > 0 {
                sink.on_objective_progress(&winner.name, ObjectiveKind::EnemiesDefeated, count);
            }
        }
        if loot.quality >= Quality::Rare {
            sink.on_objective_progress(&winner.name, ObjectiveKind::RareItems, 1);
        }
        if guild_victory {
            sink.on_objective_progress(&winner.name, ObjectiveKind::GuildVictory, 1);
        }
        if standing_before < rewards.reputation_cap && reputation >= rewards.reputation_cap {
            sink.on_objective_progress(&winner.name, ObjectiveKind::MaxRelations, 1);
        }

        tracing::info!(
            character = %winner.name,
            loot = %loot,
            experience,
            gold,
            "victory rewards granted"
        );
        grants.push(RewardGrant {
            character: winner.name.clone(),
            loot,
            experience,
            gold,
            levels_gained,
            reputation,
        });
    }
    grants
}

/// The guild every living winner belongs to, if they all share one.
fn shared_guild(winners: &[Character]) -> Option<&str> {
    let mut living = winners.iter().filter(|c| c.is_alive());
    let first = living.next()?.guild.as_deref()?;
    living
        .all(|c| c.guild.as_deref() == Some(first))
        .then_some(first)
}
