use crate::battle::ai::DecisionProvider;
use crate::battle::engine::{run_battle, BattleOptions, BattleProviders, BattleResult};
use crate::battle::rewards::ObjectiveLog;
use crate::battle::state::{BattleEvent, BattleRng};
use crate::character::Character;
use crate::config::EngineConfig;
use crate::effects::Effect;
use crate::errors::ActionResult;
use crate::item::Item;
use schema::{CharacterClass, DamageType, ItemCategory, Quality, Skill, Weather};

/// A builder for creating test characters with common defaults.
///
/// # Example
/// ```ignore
/// let mage = TestCharacterBuilder::new("Ayla", CharacterClass::Mage)
///     .with_hp(40.0)
///     .with_skill(Skill::FrostKiss, 1)
///     .build();
/// ```
pub struct TestCharacterBuilder {
    name: String,
    class: CharacterClass,
    hp: Option<f64>,
    max_hp: Option<f64>,
    mana: Option<f64>,
    skills: Vec<(Skill, u32)>,
    effects: Vec<Effect>,
    weapon: Option<Item>,
    inventory: Vec<Item>,
    guild: Option<String>,
}

impl TestCharacterBuilder {
    pub fn new(name: &str, class: CharacterClass) -> Self {
        Self {
            name: name.to_string(),
            class,
            hp: None,
            max_hp: None,
            mana: None,
            skills: Vec::new(),
            effects: Vec::new(),
            weapon: None,
            inventory: Vec::new(),
            guild: None,
        }
    }

    /// Sets current HP. If not set, HP will be max.
    pub fn with_hp(mut self, hp: f64) -> Self {
        self.hp = Some(hp);
        self
    }

    /// Raises max HP and fills it, for long-lived punching bags.
    pub fn with_max_hp(mut self, max_hp: f64) -> Self {
        self.max_hp = Some(max_hp);
        self
    }

    pub fn with_mana(mut self, mana: f64) -> Self {
        self.mana = Some(mana);
        self
    }

    /// Learns (or re-levels) a skill.
    pub fn with_skill(mut self, skill: Skill, level: u32) -> Self {
        self.skills.push((skill, level));
        self
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    /// Equips a weapon of the given element and power.
    pub fn with_weapon(mut self, damage_type: DamageType, power: f64) -> Self {
        self.weapon = Some(
            Item::new("test weapon", ItemCategory::Weapon, power, 0, Quality::Common)
                .with_damage_type(damage_type),
        );
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn with_guild(mut self, guild: &str) -> Self {
        self.guild = Some(guild.to_string());
        self
    }

    pub fn build(self) -> Character {
        let mut character = Character::new(self.name, self.class);
        if let Some(max_hp) = self.max_hp {
            character.max_hp = max_hp;
            character.hp = max_hp;
        }
        if let Some(hp) = self.hp {
            character.hp = hp;
        }
        if let Some(mana) = self.mana {
            character.mana = mana;
        }
        for (skill, level) in self.skills {
            character.skills.insert(skill, level);
        }
        character.effects = self.effects;
        if let Some(weapon) = self.weapon {
            if let Err(err) = character.equip(weapon) {
                panic!("Failed to equip test weapon: {}", err);
            }
        }
        character.inventory = self.inventory;
        character.guild = self.guild;
        character
    }
}

/// Options with fixed clear weather and no location, so no modifier applies
/// and no rng draw is spent on weather.
pub fn clear_skies() -> BattleOptions {
    BattleOptions {
        difficulty: 1,
        rng_seed: None,
        weather: Some(Weather::Clear),
        location: None,
    }
}

/// Config that stops the battle after `rounds` rounds.
pub fn config_with_round_limit(rounds: u32) -> EngineConfig {
    let mut config = EngineConfig::default();
    config.limits.max_rounds = rounds;
    config
}

/// Creates a `BattleRng` with a long list of mid-range rolls.
/// Useful for tests where the specific outcome is not important, preventing panics from exhaustion.
pub fn predictable_rng() -> BattleRng {
    BattleRng::new_for_test(vec![0.5; 200])
}

/// Runs a clear-weather battle with a predictable rng and a recording sink.
pub fn run_test_battle(
    config: &EngineConfig,
    team_a: &mut [Character],
    team_b: &mut [Character],
    provider_a: &mut dyn DecisionProvider,
    provider_b: &mut dyn DecisionProvider,
) -> (BattleResult, ObjectiveLog) {
    let mut sink = ObjectiveLog::new();
    let result = run_battle(
        config,
        team_a,
        team_b,
        &clear_skies(),
        BattleProviders::new(provider_a, provider_b),
        &mut sink,
        predictable_rng(),
    );
    (result, sink)
}

/// Events matching `predicate`, in order.
pub fn events_where<'a>(
    result: &'a BattleResult,
    predicate: impl Fn(&BattleEvent) -> bool,
) -> Vec<&'a BattleEvent> {
    result.events.iter().filter(|event| predicate(event)).collect()
}

/// Helper function to assert that a Result is Ok and return the value.
pub fn assert_ok<T>(result: ActionResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => panic!("Expected Ok but got error: {}", err),
    }
}
