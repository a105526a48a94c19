//! Static skill table.
//!
//! Each skill maps to plain data: a damage multiplier, an optional damage
//! type, an optional effect template, its side of the field and its mana
//! cost. Adding a `Skill` variant without a row here is a compile error.

use crate::effects::Effect;
use crate::errors::{ActionError, ActionResult};
use schema::{DamageType, EffectKind, Skill, SkillTarget};
use std::str::FromStr;

/// Blueprint for the effect a skill leaves behind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectTemplate {
    pub kind: EffectKind,
    pub duration: u32,
    /// Magnitude at skill level 1; scales linearly with level.
    pub base_magnitude: f64,
}

impl EffectTemplate {
    const fn new(kind: EffectKind, duration: u32, base_magnitude: f64) -> Self {
        Self {
            kind,
            duration,
            base_magnitude,
        }
    }

    pub fn instantiate(&self, level: u32) -> Effect {
        Effect::new(self.kind, self.duration, self.base_magnitude * level as f64)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkillDefinition {
    pub skill: Skill,
    /// Zero for skills that deal no direct damage.
    pub base_multiplier: f64,
    /// Whether the multiplier grows with skill level.
    pub multiplier_scales: bool,
    pub damage_type: Option<DamageType>,
    pub effect: Option<EffectTemplate>,
    pub target: SkillTarget,
    pub mana_cost: f64,
    /// Removes harmful effects from each target.
    pub cleanses: bool,
}

impl SkillDefinition {
    const fn strike(
        skill: Skill,
        base_multiplier: f64,
        damage_type: DamageType,
        effect: Option<EffectTemplate>,
        mana_cost: f64,
    ) -> Self {
        Self {
            skill,
            base_multiplier,
            multiplier_scales: true,
            damage_type: Some(damage_type),
            effect,
            target: SkillTarget::Enemies,
            mana_cost,
            cleanses: false,
        }
    }

    const fn support(skill: Skill, effect: Option<EffectTemplate>, mana_cost: f64) -> Self {
        Self {
            skill,
            base_multiplier: 0.0,
            multiplier_scales: false,
            damage_type: None,
            effect,
            target: SkillTarget::Allies,
            mana_cost,
            cleanses: false,
        }
    }

    /// Look up the definition of a skill.
    pub fn get(skill: Skill) -> SkillDefinition {
        use EffectKind::*;
        match skill {
            Skill::PowerStrike => Self::strike(skill, 1.5, DamageType::Physical, None, 10.0),
            Skill::Guard => {
                Self::support(skill, Some(EffectTemplate::new(Regeneration, 3, 5.0)), 8.0)
            }
            Skill::Cleave => Self::strike(skill, 1.2, DamageType::Physical, None, 15.0),
            Skill::Fireball => Self::strike(
                skill,
                1.2,
                DamageType::Fire,
                Some(EffectTemplate::new(Burn, 2, 3.0)),
                15.0,
            ),
            Skill::FrostKiss => Self::strike(
                skill,
                0.8,
                DamageType::Ice,
                Some(EffectTemplate::new(Freeze, 1, 0.0)),
                12.0,
            ),
            Skill::ArcaneShield => {
                Self::support(skill, Some(EffectTemplate::new(Regeneration, 2, 3.0)), 10.0)
            }
            Skill::Heal => {
                Self::support(skill, Some(EffectTemplate::new(Regeneration, 2, 10.0)), 20.0)
            }
            Skill::Purify => Self {
                cleanses: true,
                ..Self::support(skill, None, 10.0)
            },
            Skill::Counterstrike => Self::strike(skill, 1.3, DamageType::Physical, None, 10.0),
            Skill::Earthquake => Self::strike(
                skill,
                1.0,
                DamageType::Physical,
                Some(EffectTemplate::new(Stun, 1, 0.0)),
                20.0,
            ),
            Skill::Backstab => Self::strike(skill, 1.8, DamageType::Physical, None, 12.0),
            Skill::PoisonedBlade => Self {
                multiplier_scales: false,
                ..Self::strike(
                    skill,
                    1.0,
                    DamageType::Poison,
                    Some(EffectTemplate::new(Poison, 3, 4.0)),
                    10.0,
                )
            },
            Skill::ShadowStrike => Self::strike(skill, 1.5, DamageType::Magical, None, 15.0),
        }
    }

    /// Damage multiplier at the given skill level.
    pub fn multiplier(&self, level: u32) -> f64 {
        if self.multiplier_scales {
            self.base_multiplier * level as f64
        } else {
            self.base_multiplier
        }
    }

    pub fn deals_damage(&self) -> bool {
        self.base_multiplier > 0.0
    }

    pub fn effect_at(&self, level: u32) -> Option<Effect> {
        self.effect.map(|template| template.instantiate(level))
    }
}

/// Resolve a skill from its display name (`"Power Strike"`, `"fireball"`).
pub fn skill_by_name(name: &str) -> ActionResult<Skill> {
    Skill::from_str(name.trim()).map_err(|_| ActionError::UnknownSkill(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use strum::IntoEnumIterator;

    #[test]
    fn test_every_skill_has_a_consistent_row() {
        for skill in Skill::iter() {
            let definition = SkillDefinition::get(skill);
            assert_eq!(definition.skill, skill);
            assert!(definition.mana_cost > 0.0, "{skill} should cost mana");
            // Direct damage always carries a type so it can feed combos.
            if definition.deals_damage() {
                assert!(definition.damage_type.is_some(), "{skill} needs a damage type");
                assert_eq!(definition.target, SkillTarget::Enemies);
            }
        }
    }

    #[rstest]
    #[case(Skill::PowerStrike, 1, 1.5)]
    #[case(Skill::PowerStrike, 3, 4.5)]
    #[case(Skill::Fireball, 2, 2.4)]
    #[case(Skill::PoisonedBlade, 4, 1.0)]
    #[case(Skill::Heal, 5, 0.0)]
    fn test_multiplier_scales_with_level(
        #[case] skill: Skill,
        #[case] level: u32,
        #[case] expected: f64,
    ) {
        let multiplier = SkillDefinition::get(skill).multiplier(level);
        assert!((multiplier - expected).abs() < 1e-9, "{skill} at {level}: {multiplier}");
    }

    #[test]
    fn test_effect_magnitude_scales_with_level() {
        let burn = SkillDefinition::get(Skill::Fireball).effect_at(3).unwrap();

        assert_eq!(burn, Effect::new(EffectKind::Burn, 2, 9.0));
        assert_eq!(SkillDefinition::get(Skill::Backstab).effect_at(3), None);
    }

    #[rstest]
    #[case("Power Strike", Skill::PowerStrike)]
    #[case("fireball", Skill::Fireball)]
    #[case("  Poisoned Blade ", Skill::PoisonedBlade)]
    fn test_skill_by_name(#[case] name: &str, #[case] expected: Skill) {
        assert_eq!(skill_by_name(name), Ok(expected));
    }

    #[test]
    fn test_unknown_skill_name() {
        assert_eq!(
            skill_by_name("Meteor"),
            Err(ActionError::UnknownSkill("Meteor".to_string()))
        );
    }
}
