use crate::battle::ai::{Action, BattleView, DecisionProvider};
use crate::battle::combos::{evaluate_combos, RoundDamageLog};
use crate::battle::modifiers::{CombatStats, ModifierStack};
use crate::battle::rewards::{award_victory, ObjectiveSink, RewardGrant};
use crate::battle::skills::{attack, prepare_skill};
use crate::battle::state::{BattleEvent, BattlePhase, BattleRng, EventBus, SkipReason, TeamSide};
use crate::character::{Character, ItemUse};
use crate::config::EngineConfig;
use crate::effects::advance_effects;
use crate::errors::{ActionError, ActionResult};
use schema::{Location, Skill, SkillTarget, Weather};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use strum::IntoEnumIterator;

const SIDES: [TeamSide; 2] = [TeamSide::A, TeamSide::B];

/// Caller-chosen battle parameters.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BattleOptions {
    /// Scales rewards and loot. 0 is treated as 1.
    pub difficulty: u32,
    /// Fixed seed for a reproducible battle; drawn from entropy otherwise.
    pub rng_seed: Option<u64>,
    /// Drawn from the rng when not fixed.
    pub weather: Option<Weather>,
    pub location: Option<Location>,
}

impl Default for BattleOptions {
    fn default() -> Self {
        Self {
            difficulty: 1,
            rng_seed: None,
            weather: None,
            location: None,
        }
    }
}

/// One decision provider per team.
pub struct BattleProviders<'p> {
    pub team_a: &'p mut dyn DecisionProvider,
    pub team_b: &'p mut dyn DecisionProvider,
}

impl<'p> BattleProviders<'p> {
    pub fn new(team_a: &'p mut dyn DecisionProvider, team_b: &'p mut dyn DecisionProvider) -> Self {
        Self { team_a, team_b }
    }

    fn for_side(&mut self, side: TeamSide) -> &mut dyn DecisionProvider {
        match side {
            TeamSide::A => &mut *self.team_a,
            TeamSide::B => &mut *self.team_b,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BattleResult {
    /// `None` for a draw.
    pub winner: Option<TeamSide>,
    /// Characters on either side that fell during the battle.
    pub defeated_count: u32,
    pub rewards: Vec<RewardGrant>,
    /// Rounds fully played.
    pub rounds: u32,
    pub events: Vec<BattleEvent>,
}

/// Run a battle to completion with the built-in configuration.
pub fn start_battle(
    team_a: &mut [Character],
    team_b: &mut [Character],
    options: BattleOptions,
    providers: BattleProviders<'_>,
    sink: &mut dyn ObjectiveSink,
) -> BattleResult {
    let rng = match options.rng_seed {
        Some(seed) => BattleRng::from_seed(seed),
        None => BattleRng::from_entropy(),
    };
    run_battle(
        &EngineConfig::default(),
        team_a,
        team_b,
        &options,
        providers,
        sink,
        rng,
    )
}

/// Run a battle with explicit configuration and random source.
///
/// `options.rng_seed` is ignored here; the caller owns `rng`.
pub fn run_battle(
    config: &EngineConfig,
    team_a: &mut [Character],
    team_b: &mut [Character],
    options: &BattleOptions,
    mut providers: BattleProviders<'_>,
    sink: &mut dyn ObjectiveSink,
    mut rng: BattleRng,
) -> BattleResult {
    let difficulty = options.difficulty.max(1);
    let weather = match options.weather {
        Some(weather) => weather,
        None => {
            let all: Vec<Weather> = Weather::iter().collect();
            all[rng.pick_index(all.len(), "weather")]
        }
    };

    let mut battle = Battle::new(config, [team_a, team_b], weather, options.location, rng);
    battle.bus.push(BattleEvent::BattleStarted {
        weather,
        location: options.location,
        difficulty,
    });
    tracing::info!(
        %weather,
        location = ?options.location,
        difficulty,
        team_a = battle.teams[0].len(),
        team_b = battle.teams[1].len(),
        "battle started"
    );

    let winner = battle.run(&mut providers);

    let rewards = match winner {
        Some(side) if battle.rounds > 0 => award_victory(
            &mut *battle.teams[side.index()],
            difficulty,
            &battle.kills[side.index()],
            config,
            &mut battle.rng,
            &mut battle.bus,
            sink,
        ),
        _ => Vec::new(),
    };

    battle.bus.push(BattleEvent::PhaseEntered {
        phase: BattlePhase::BattleEnded,
    });
    battle.bus.push(BattleEvent::BattleEnded {
        winner,
        rounds: battle.rounds,
    });
    tracing::info!(winner = ?winner, rounds = battle.rounds, defeated = battle.defeated_count, "battle ended");

    BattleResult {
        winner,
        defeated_count: battle.defeated_count,
        rewards,
        rounds: battle.rounds,
        events: battle.bus.into_events(),
    }
}

/// Mutable state of one running battle.
struct Battle<'t, 'c> {
    config: &'c EngineConfig,
    teams: [&'t mut [Character]; 2],
    battlefield: ModifierStack,
    stats: [Vec<CombatStats>; 2],
    /// Members already counted as defeated, per side.
    fallen: [BTreeSet<usize>; 2],
    /// Credited defeats per side, keyed by the killer's team index.
    kills: [BTreeMap<usize, u32>; 2],
    defeated_count: u32,
    damage_log: RoundDamageLog,
    rng: BattleRng,
    bus: EventBus,
    rounds: u32,
}

impl<'t, 'c> Battle<'t, 'c> {
    fn new(
        config: &'c EngineConfig,
        teams: [&'t mut [Character]; 2],
        weather: Weather,
        location: Option<Location>,
        rng: BattleRng,
    ) -> Self {
        let battlefield = ModifierStack::battlefield(weather, location);
        let stats_for = |team: &[Character]| -> Vec<CombatStats> {
            team.iter()
                .map(|c| battlefield.with_faction_bonuses(c, &config.limits).apply(c))
                .collect()
        };
        let stats = [stats_for(&*teams[0]), stats_for(&*teams[1])];
        let fallen_at = |team: &[Character]| -> BTreeSet<usize> {
            team.iter()
                .enumerate()
                .filter(|(_, c)| c.is_defeated())
                .map(|(index, _)| index)
                .collect()
        };
        let fallen = [fallen_at(&*teams[0]), fallen_at(&*teams[1])];

        Self {
            config,
            teams,
            battlefield,
            stats,
            fallen,
            kills: [BTreeMap::new(), BTreeMap::new()],
            defeated_count: 0,
            damage_log: RoundDamageLog::new(),
            rng,
            bus: EventBus::new(),
            rounds: 0,
        }
    }

    fn team(&self, side: TeamSide) -> &[Character] {
        &*self.teams[side.index()]
    }

    fn living_indices(&self, side: TeamSide) -> Vec<usize> {
        living_indices(self.team(side))
    }

    fn has_living(&self, side: TeamSide) -> bool {
        self.team(side).iter().any(Character::is_alive)
    }

    /// Winner if the battle is over, `Some(None)` for a draw.
    fn outcome(&self) -> Option<Option<TeamSide>> {
        match (self.has_living(TeamSide::A), self.has_living(TeamSide::B)) {
            (true, true) => None,
            (true, false) => Some(Some(TeamSide::A)),
            (false, true) => Some(Some(TeamSide::B)),
            (false, false) => Some(None),
        }
    }

    fn run(&mut self, providers: &mut BattleProviders<'_>) -> Option<TeamSide> {
        if let Some(result) = self.outcome() {
            tracing::info!(winner = ?result, "battle decided before the first round");
            return result;
        }

        loop {
            self.rounds += 1;
            let round = self.rounds;

            // --- RoundStart: snapshot the living members of both teams ---
            self.enter(BattlePhase::RoundStart);
            self.bus.push(BattleEvent::RoundStarted { round });
            tracing::info!(round, "round started");
            self.damage_log.clear();
            let order = [
                self.living_indices(TeamSide::A),
                self.living_indices(TeamSide::B),
            ];

            // --- TeamAActs / TeamBActs ---
            for side in SIDES {
                self.enter(BattlePhase::acting(side));
                for &index in &order[side.index()] {
                    if !self.has_living(side.opponent()) {
                        break;
                    }
                    self.take_turn(side, index, providers);
                }
            }

            // --- Combos, then EffectAdvance ---
            self.resolve_combos();
            self.enter(BattlePhase::EffectAdvance);
            self.advance_all_effects();

            // --- TerminationCheck ---
            self.enter(BattlePhase::TerminationCheck);
            if let Some(result) = self.outcome() {
                return result;
            }
            if round >= self.config.limits.max_rounds {
                tracing::info!(round, "round limit reached, declaring a draw");
                return None;
            }
        }
    }

    fn enter(&mut self, phase: BattlePhase) {
        self.bus.push(BattleEvent::PhaseEntered { phase });
    }

    fn take_turn(&mut self, side: TeamSide, index: usize, providers: &mut BattleProviders<'_>) {
        let actor = &self.team(side)[index];
        if actor.is_defeated() {
            return;
        }
        if actor.is_stunned() || actor.is_frozen() {
            let reason = if actor.is_stunned() {
                SkipReason::Stunned
            } else {
                SkipReason::Frozen
            };
            let name = actor.name.clone();
            tracing::debug!(actor = %name, ?reason, "turn skipped");
            self.bus.push(BattleEvent::TurnSkipped { actor: name, reason });
            return;
        }

        let provider = providers.for_side(side);
        for _ in 0..self.config.limits.max_decision_attempts {
            let action = {
                let view = BattleView {
                    round: self.rounds,
                    actor_stats: self.stats[side.index()][index],
                    opponents: living(&*self.teams[side.opponent().index()]),
                    allies: living(&*self.teams[side.index()]),
                };
                let actor = &self.teams[side.index()][index];
                provider.decide_action(actor, &view, &mut self.rng)
            };

            if action == Action::Skip {
                let actor = self.team(side)[index].name.clone();
                self.bus.push(BattleEvent::TurnSkipped {
                    actor,
                    reason: SkipReason::Passed,
                });
                return;
            }

            match self.execute(side, index, &action) {
                Ok(()) => {
                    self.record_defeats(Some((side, index)));
                    return;
                }
                Err(error) => {
                    let actor = self.team(side)[index].name.clone();
                    tracing::warn!(actor = %actor, ?action, %error, "action rejected");
                    self.bus.push(BattleEvent::ActionRejected {
                        actor,
                        reason: error.to_string(),
                    });
                }
            }
        }

        let actor = self.team(side)[index].name.clone();
        self.bus.push(BattleEvent::TurnSkipped {
            actor,
            reason: SkipReason::TooManyInvalidActions,
        });
    }

    /// Validate and resolve one action. A rejected action leaves every
    /// character untouched.
    fn execute(&mut self, side: TeamSide, index: usize, action: &Action) -> ActionResult<()> {
        match action {
            Action::Attack { target } => self.execute_attack(side, index, *target),
            Action::UseSkill { skill, targets } => {
                self.execute_skill(side, index, *skill, targets)
            }
            Action::UseItem { index: item } => self.execute_item(side, index, *item),
            Action::Skip => Ok(()),
        }
    }

    fn execute_attack(&mut self, side: TeamSide, index: usize, target: usize) -> ActionResult<()> {
        let opponent = side.opponent();
        let target_index = *self
            .living_indices(opponent)
            .get(target)
            .ok_or(ActionError::InvalidTargetIndex(target))?;

        let attacker_stats = self.stats[side.index()][index];
        let target_stats = self.stats[opponent.index()][target_index];
        let (own, other) = split_teams(&mut self.teams, side);
        let attacker = &own[index];
        let defender = &mut other[target_index];
        let outcome = attack(attacker, &attacker_stats, defender, &target_stats);

        self.bus.push(BattleEvent::Attacked {
            attacker: attacker.name.clone(),
            target: defender.name.clone(),
            damage: outcome.damage,
            damage_type: outcome.damage_type,
            remaining_hp: outcome.remaining_hp,
        });
        self.damage_log.record(opponent, target_index, outcome.damage_type);
        Ok(())
    }

    fn execute_skill(
        &mut self,
        side: TeamSide,
        index: usize,
        skill: Skill,
        targets: &[usize],
    ) -> ActionResult<()> {
        // --- Validate everything before the first mutation ---
        let caster_stats = self.stats[side.index()][index];
        let prepared = prepare_skill(&self.team(side)[index], &caster_stats, skill)?;
        if targets.is_empty() {
            return Err(ActionError::NoTargets);
        }
        let target_side = match prepared.definition.target {
            SkillTarget::Enemies => side.opponent(),
            SkillTarget::Allies => side,
        };
        let living = self.living_indices(target_side);
        let mut resolved: Vec<usize> = Vec::new();
        for &target in targets {
            let team_index = *living
                .get(target)
                .ok_or(ActionError::InvalidTargetIndex(target))?;
            if !resolved.contains(&team_index) {
                resolved.push(team_index);
            }
        }

        // --- Pay and resolve ---
        let caster = &mut self.teams[side.index()][index];
        prepared.pay(caster)?;
        let caster_name = caster.name.clone();
        self.bus.push(BattleEvent::SkillUsed {
            caster: caster_name.clone(),
            skill,
            mana_spent: prepared.mana_cost,
        });
        tracing::debug!(caster = %caster_name, %skill, targets = resolved.len(), "skill used");

        for team_index in resolved {
            let target_stats = self.stats[target_side.index()][team_index];
            let target = &mut self.teams[target_side.index()][team_index];
            let outcome = prepared.resolve_on(target, &target_stats);

            if prepared.definition.deals_damage() {
                self.bus.push(BattleEvent::SkillDamage {
                    caster: caster_name.clone(),
                    target: outcome.target.clone(),
                    skill,
                    damage: outcome.damage,
                    remaining_hp: outcome.remaining_hp,
                });
            }
            if let Some(damage_type) = prepared.definition.damage_type {
                self.damage_log.record(target_side, team_index, damage_type);
            }
            if let Some(effect) = outcome.effect {
                self.bus.push(BattleEvent::EffectApplied {
                    target: outcome.target.clone(),
                    effect,
                });
            }
            if !outcome.cleansed.is_empty() {
                self.bus.push(BattleEvent::EffectsCleansed {
                    target: outcome.target,
                    removed: outcome.cleansed,
                });
            }
        }
        Ok(())
    }

    fn execute_item(&mut self, side: TeamSide, index: usize, item: usize) -> ActionResult<()> {
        let actor = &mut self.teams[side.index()][index];
        let used = actor.use_inventory_item(item)?;
        let item = match used {
            ItemUse::Drank { item, restored } => {
                tracing::debug!(actor = %actor.name, item = %item.name, restored, "potion used");
                item.name
            }
            ItemUse::Equipped { name } => {
                tracing::debug!(actor = %actor.name, item = %name, "item equipped");
                // Gear changes the stats this character fights with.
                self.stats[side.index()][index] = self.combat_stats(&self.team(side)[index]);
                name
            }
        };
        let actor = self.team(side)[index].name.clone();
        self.bus.push(BattleEvent::ItemUsed { actor, item });
        Ok(())
    }

    fn combat_stats(&self, character: &Character) -> CombatStats {
        self.battlefield
            .with_faction_bonuses(character, &self.config.limits)
            .apply(character)
    }

    fn resolve_combos(&mut self) {
        for side in SIDES {
            if self.damage_log.types(side).is_empty() {
                continue;
            }
            let hit = self.damage_log.hit(side).clone();
            let mut targets: Vec<&mut Character> = self.teams[side.index()]
                .iter_mut()
                .enumerate()
                .filter(|(index, c)| hit.contains(index) && c.is_alive())
                .map(|(_, c)| c)
                .collect();
            let triggers =
                evaluate_combos(&self.config.combos, self.damage_log.types(side), &mut targets);
            for trigger in triggers {
                self.bus.push(BattleEvent::ComboTriggered {
                    combo: trigger.combo,
                    target: trigger.target.clone(),
                });
                self.bus.push(BattleEvent::EffectApplied {
                    target: trigger.target,
                    effect: trigger.effect,
                });
            }
        }
    }

    fn advance_all_effects(&mut self) {
        for side in SIDES {
            for index in self.living_indices(side) {
                let character = &mut self.teams[side.index()][index];
                let report = advance_effects(character);
                let name = character.name.clone();
                for (kind, hp_change) in report.ticks {
                    self.bus.push(BattleEvent::EffectTicked {
                        target: name.clone(),
                        kind,
                        hp_change,
                    });
                }
                for kind in report.expired {
                    self.bus.push(BattleEvent::EffectExpired {
                        target: name.clone(),
                        kind,
                    });
                }
            }
        }
        self.record_defeats(None);
    }

    /// Log every character that fell since the last check. Direct kills are
    /// credited to `actor`; effect ticks credit nobody.
    fn record_defeats(&mut self, actor: Option<(TeamSide, usize)>) {
        for side in SIDES {
            let newly_fallen: Vec<usize> = self
                .team(side)
                .iter()
                .enumerate()
                .filter(|(index, c)| c.is_defeated() && !self.fallen[side.index()].contains(index))
                .map(|(index, _)| index)
                .collect();
            for index in newly_fallen {
                self.fallen[side.index()].insert(index);
                self.defeated_count += 1;
                let name = self.team(side)[index].name.clone();
                let credited_to = match actor {
                    Some((killer_side, killer)) => {
                        *self.kills[killer_side.index()].entry(killer).or_insert(0) += 1;
                        Some(self.team(killer_side)[killer].name.clone())
                    }
                    None => None,
                };
                tracing::info!(character = %name, ?side, credited_to = ?credited_to, "character defeated");
                self.bus.push(BattleEvent::CharacterDefeated {
                    name,
                    side,
                    credited_to,
                });
            }
        }
    }
}

/// Own team and opposing team, both mutable.
fn split_teams<'a>(
    teams: &'a mut [&mut [Character]; 2],
    side: TeamSide,
) -> (&'a mut [Character], &'a mut [Character]) {
    let [team_a, team_b] = teams;
    match side {
        TeamSide::A => (&mut **team_a, &mut **team_b),
        TeamSide::B => (&mut **team_b, &mut **team_a),
    }
}

fn living_indices(team: &[Character]) -> Vec<usize> {
    team.iter()
        .enumerate()
        .filter(|(_, c)| c.is_alive())
        .map(|(index, _)| index)
        .collect()
}

fn living(team: &[Character]) -> Vec<&Character> {
    team.iter().filter(|c| c.is_alive()).collect()
}
