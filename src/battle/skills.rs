//! Skill and basic attack resolution.

use crate::battle::modifiers::CombatStats;
use crate::character::Character;
use crate::effects::{apply_effect, clear_harmful, Effect};
use crate::errors::{ActionError, ActionResult};
use crate::skill_data::SkillDefinition;
use schema::{DamageType, EffectKind, Skill};

/// Every hit deals at least this much.
pub const MIN_DAMAGE: f64 = 1.0;

const DEFENSE_FACTOR: f64 = 0.5;

/// `power × multiplier − 0.5 × defense`, floored at [`MIN_DAMAGE`].
pub fn calculate_damage(power: f64, multiplier: f64, defense: f64) -> f64 {
    (power * multiplier - DEFENSE_FACTOR * defense).max(MIN_DAMAGE)
}

/// A character together with the stats it fights with this battle.
pub struct Combatant<'a> {
    pub character: &'a mut Character,
    pub stats: CombatStats,
}

impl<'a> Combatant<'a> {
    pub fn new(character: &'a mut Character, stats: CombatStats) -> Self {
        Self { character, stats }
    }

    /// Combatant with no battlefield modifiers.
    pub fn unmodified(character: &'a mut Character) -> Self {
        let stats = CombatStats::unmodified(character);
        Self { character, stats }
    }
}

/// What happened to one target of a skill.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetOutcome {
    pub target: String,
    pub damage: f64,
    pub remaining_hp: f64,
    pub effect: Option<Effect>,
    pub cleansed: Vec<EffectKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkillOutcome {
    pub skill: Skill,
    pub mana_spent: f64,
    /// Type recorded against the target group, if the skill deals damage.
    pub damage_type: Option<DamageType>,
    pub targets: Vec<TargetOutcome>,
}

/// A validated cast: the caster knows the skill and can pay for it.
///
/// Splitting validation from resolution lets the orchestrator pay the cost
/// on the caster and then resolve on targets that may include the caster.
#[derive(Debug, Clone)]
pub struct PreparedSkill {
    pub definition: SkillDefinition,
    pub level: u32,
    pub mana_cost: f64,
    caster_attack: f64,
}

/// Check that `caster` can cast `skill` right now. Never mutates.
pub fn prepare_skill(
    caster: &Character,
    caster_stats: &CombatStats,
    skill: Skill,
) -> ActionResult<PreparedSkill> {
    let level = caster
        .skill_level(skill)
        .ok_or_else(|| ActionError::SkillNotKnown {
            caster: caster.name.clone(),
            skill,
        })?;
    let definition = SkillDefinition::get(skill);
    let mana_cost = caster_stats.mana_cost(definition.mana_cost);
    if caster.mana + f64::EPSILON < mana_cost {
        return Err(ActionError::InsufficientMana {
            caster: caster.name.clone(),
            required: mana_cost,
            available: caster.mana,
        });
    }
    Ok(PreparedSkill {
        definition,
        level,
        mana_cost,
        caster_attack: caster_stats.attack_power,
    })
}

impl PreparedSkill {
    /// Deduct the mana cost from the caster.
    pub fn pay(&self, caster: &mut Character) -> ActionResult<()> {
        if !caster.spend_mana(self.mana_cost) {
            return Err(ActionError::InsufficientMana {
                caster: caster.name.clone(),
                required: self.mana_cost,
                available: caster.mana,
            });
        }
        Ok(())
    }

    /// Apply damage, effect and cleansing to one target.
    pub fn resolve_on(&self, target: &mut Character, target_stats: &CombatStats) -> TargetOutcome {
        let definition = &self.definition;

        let damage = if definition.deals_damage() {
            let amount = calculate_damage(
                self.caster_attack,
                definition.multiplier(self.level),
                target_stats.defense,
            );
            target.take_damage(amount)
        } else {
            0.0
        };

        let effect = definition.effect_at(self.level);
        if let Some(effect) = &effect {
            apply_effect(target, effect.clone());
        }

        let cleansed = if definition.cleanses {
            clear_harmful(target)
        } else {
            Vec::new()
        };

        TargetOutcome {
            target: target.name.clone(),
            damage,
            remaining_hp: target.hp,
            effect,
            cleansed,
        }
    }
}

/// Cast `skill` from `caster` on `targets`.
///
/// Fails without touching any state if the caster does not know the skill,
/// cannot afford it or no target was given.
pub fn use_skill(
    caster: &mut Combatant<'_>,
    skill: Skill,
    targets: &mut [Combatant<'_>],
) -> ActionResult<SkillOutcome> {
    if targets.is_empty() {
        return Err(ActionError::NoTargets);
    }
    let prepared = prepare_skill(caster.character, &caster.stats, skill)?;
    prepared.pay(caster.character)?;

    let outcomes = targets
        .iter_mut()
        .map(|target| prepared.resolve_on(target.character, &target.stats))
        .collect();

    tracing::debug!(
        caster = %caster.character.name,
        skill = %skill,
        level = prepared.level,
        mana = prepared.mana_cost,
        "skill used"
    );

    Ok(SkillOutcome {
        skill,
        mana_spent: prepared.mana_cost,
        damage_type: prepared.definition.damage_type,
        targets: outcomes,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttackOutcome {
    pub damage: f64,
    pub damage_type: DamageType,
    pub remaining_hp: f64,
}

/// Basic attack: `attack − 0.5 × defense`, typed by the attacker's weapon.
pub fn attack(
    attacker: &Character,
    attacker_stats: &CombatStats,
    target: &mut Character,
    target_stats: &CombatStats,
) -> AttackOutcome {
    let amount = calculate_damage(attacker_stats.attack_power, 1.0, target_stats.defense);
    let damage = target.take_damage(amount);
    let damage_type = attacker.weapon_damage_type();
    tracing::debug!(
        attacker = %attacker.name,
        target = %target.name,
        damage,
        damage_type = %damage_type,
        "attack"
    );
    AttackOutcome {
        damage,
        damage_type,
        remaining_hp: target.hp,
    }
}
