//! Decision providers: whatever chooses a character's action each turn.

use crate::battle::modifiers::CombatStats;
use crate::battle::state::BattleRng;
use crate::character::Character;
use crate::skill_data::SkillDefinition;
use schema::{Skill, SkillTarget};
use std::collections::VecDeque;

/// An action request. Indices refer to the lists in the [`BattleView`]
/// the provider was shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Basic attack on `view.opponents[target]`.
    Attack { target: usize },
    /// Enemy skills index `view.opponents`, ally skills index `view.allies`.
    UseSkill { skill: Skill, targets: Vec<usize> },
    /// Use `actor.inventory[index]`.
    UseItem { index: usize },
    Skip,
}

/// What a provider may look at when deciding.
#[derive(Debug, Clone)]
pub struct BattleView<'a> {
    pub round: u32,
    /// Stats the actor fights with this battle.
    pub actor_stats: CombatStats,
    /// Living members of the opposing team, in team order.
    pub opponents: Vec<&'a Character>,
    /// Living members of the actor's team, the actor included.
    pub allies: Vec<&'a Character>,
}

impl BattleView<'_> {
    /// Known skills the actor can pay for right now.
    pub fn affordable_skills(&self, actor: &Character) -> Vec<Skill> {
        actor
            .skills
            .keys()
            .copied()
            .filter(|&skill| {
                let cost = self.actor_stats.mana_cost(SkillDefinition::get(skill).mana_cost);
                actor.mana + f64::EPSILON >= cost
            })
            .collect()
    }
}

/// A trait for any system that can decide on a battle action.
pub trait DecisionProvider {
    /// Inspects the battle and decides on the next action for `actor`.
    /// Called again after a rejected action.
    fn decide_action(&mut self, actor: &Character, view: &BattleView<'_>, rng: &mut BattleRng)
        -> Action;
}

/// Automated enemy: a coin flip between a basic attack and a random
/// affordable skill, aimed at a random target.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomEnemyAi;

impl RandomEnemyAi {
    pub fn new() -> Self {
        Self
    }
}

impl DecisionProvider for RandomEnemyAi {
    fn decide_action(
        &mut self,
        actor: &Character,
        view: &BattleView<'_>,
        rng: &mut BattleRng,
    ) -> Action {
        if view.opponents.is_empty() {
            return Action::Skip;
        }

        let use_skill = rng.chance(0.5, "enemy chooses skill");
        let skills = view.affordable_skills(actor);
        if use_skill && !skills.is_empty() {
            let skill = skills[rng.pick_index(skills.len(), "enemy skill choice")];
            let pool = match SkillDefinition::get(skill).target {
                SkillTarget::Enemies => view.opponents.len(),
                SkillTarget::Allies => view.allies.len(),
            };
            if pool > 0 {
                let target = rng.pick_index(pool, "enemy skill target");
                return Action::UseSkill {
                    skill,
                    targets: vec![target],
                };
            }
        }

        let target = rng.pick_index(view.opponents.len(), "enemy attack target");
        Action::Attack { target }
    }
}

/// Replays a fixed list of actions, then skips. Also stands in for a
/// human front end that has already collected its choices.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDecisions {
    actions: VecDeque<Action>,
}

impl ScriptedDecisions {
    pub fn new(actions: Vec<Action>) -> Self {
        Self {
            actions: actions.into(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl DecisionProvider for ScriptedDecisions {
    fn decide_action(&mut self, _: &Character, _: &BattleView<'_>, _: &mut BattleRng) -> Action {
        self.actions.pop_front().unwrap_or(Action::Skip)
    }
}

/// Always attacks the first living opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstTargetAttacker;

impl DecisionProvider for FirstTargetAttacker {
    fn decide_action(&mut self, _: &Character, view: &BattleView<'_>, _: &mut BattleRng) -> Action {
        if view.opponents.is_empty() {
            Action::Skip
        } else {
            Action::Attack { target: 0 }
        }
    }
}
