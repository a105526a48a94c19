use crate::effects::Effect;
use crate::item::Item;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schema::{DamageType, EffectKind, Location, Skill, Weather};
use serde::{Deserialize, Serialize};

/// One of the two sides of a battle.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TeamSide {
    A,
    B,
}

impl TeamSide {
    pub fn opponent(self) -> TeamSide {
        match self {
            TeamSide::A => TeamSide::B,
            TeamSide::B => TeamSide::A,
        }
    }

    pub fn index(self) -> usize {
        match self {
            TeamSide::A => 0,
            TeamSide::B => 1,
        }
    }
}

/// Stages of the round state machine.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    RoundStart,
    TeamAActs,
    TeamBActs,
    EffectAdvance,
    TerminationCheck,
    BattleEnded,
}

impl BattlePhase {
    pub fn acting(side: TeamSide) -> BattlePhase {
        match side {
            TeamSide::A => BattlePhase::TeamAActs,
            TeamSide::B => BattlePhase::TeamBActs,
        }
    }
}

/// Why a character did not act on its turn.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub enum SkipReason {
    Stunned,
    Frozen,
    /// The provider chose to pass.
    Passed,
    /// Every decision attempt was rejected.
    TooManyInvalidActions,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum BattleEvent {
    BattleStarted {
        weather: Weather,
        location: Option<Location>,
        difficulty: u32,
    },
    RoundStarted {
        round: u32,
    },
    PhaseEntered {
        phase: BattlePhase,
    },
    TurnSkipped {
        actor: String,
        reason: SkipReason,
    },
    ActionRejected {
        actor: String,
        reason: String,
    },
    Attacked {
        attacker: String,
        target: String,
        damage: f64,
        damage_type: DamageType,
        remaining_hp: f64,
    },
    SkillUsed {
        caster: String,
        skill: Skill,
        mana_spent: f64,
    },
    SkillDamage {
        caster: String,
        target: String,
        skill: Skill,
        damage: f64,
        remaining_hp: f64,
    },
    EffectApplied {
        target: String,
        effect: Effect,
    },
    EffectsCleansed {
        target: String,
        removed: Vec<EffectKind>,
    },
    ItemUsed {
        actor: String,
        item: String,
    },
    EffectTicked {
        target: String,
        kind: EffectKind,
        hp_change: f64,
    },
    EffectExpired {
        target: String,
        kind: EffectKind,
    },
    ComboTriggered {
        combo: String,
        target: String,
    },
    CharacterDefeated {
        name: String,
        side: TeamSide,
        credited_to: Option<String>,
    },
    LootAwarded {
        character: String,
        item: Item,
    },
    BattleEnded {
        winner: Option<TeamSide>,
        rounds: u32,
    },
}

/// Ordered log of everything that happened in a battle.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<BattleEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    pub fn into_events(self) -> Vec<BattleEvent> {
        self.events
    }
}

/// The single source of randomness for loot and automated decisions.
///
/// Every draw goes through [`BattleRng::next_roll`], so a seeded instance
/// replays a battle exactly and a scripted one lets tests pin each outcome.
#[derive(Debug, Clone)]
pub struct BattleRng {
    source: RngSource,
}

#[derive(Debug, Clone)]
enum RngSource {
    Seeded(StdRng),
    Scripted { rolls: Vec<f64>, index: usize },
}

impl BattleRng {
    pub fn from_seed(seed: u64) -> Self {
        Self {
            source: RngSource::Seeded(StdRng::seed_from_u64(seed)),
        }
    }

    /// Seed from the thread rng. The seed is logged so the battle can be replayed.
    pub fn from_entropy() -> Self {
        let seed = rand::rng().random::<u64>();
        tracing::info!(seed, "battle rng seeded");
        Self::from_seed(seed)
    }

    pub fn new_for_test(rolls: Vec<f64>) -> Self {
        Self {
            source: RngSource::Scripted { rolls, index: 0 },
        }
    }

    /// Uniform value in `[0, 1)`.
    pub fn next_roll(&mut self, reason: &str) -> f64 {
        let roll = match &mut self.source {
            RngSource::Seeded(rng) => rng.random::<f64>(),
            RngSource::Scripted { rolls, index } => {
                if *index >= rolls.len() {
                    panic!(
                        "BattleRng exhausted! Tried to get a value for: '{}'. Need more scripted rolls.",
                        reason
                    );
                }
                let roll = rolls[*index];
                *index += 1;
                roll.clamp(0.0, 1.0 - f64::EPSILON)
            }
        };
        tracing::trace!(roll, reason, "rng draw");
        roll
    }

    /// Index in `0..len`. `len` must be non-zero.
    pub fn pick_index(&mut self, len: usize, reason: &str) -> usize {
        debug_assert!(len > 0, "pick_index called with an empty range");
        let roll = self.next_roll(reason);
        ((roll * len as f64) as usize).min(len.saturating_sub(1))
    }

    /// Integer in `low..=high`.
    pub fn roll_range(&mut self, low: u32, high: u32, reason: &str) -> u32 {
        let span = (high - low + 1) as usize;
        low + self.pick_index(span, reason) as u32
    }

    /// Float in `[low, high)`.
    pub fn roll_between(&mut self, low: f64, high: f64, reason: &str) -> f64 {
        low + (high - low) * self.next_roll(reason)
    }

    /// True with probability `chance`.
    pub fn chance(&mut self, chance: f64, reason: &str) -> bool {
        self.next_roll(reason) < chance
    }
}
