//! Elemental combos.
//!
//! Typed damage dealt during a round is logged per target group. Once the
//! action phases are over, every rule whose required types were all dealt
//! to a group fires exactly once for that group.

use crate::battle::state::TeamSide;
use crate::character::Character;
use crate::effects::{apply_effect, Effect};
use schema::DamageType;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementalComboRule {
    pub name: String,
    pub required: Vec<DamageType>,
    /// Applied to every affected target when the combo fires.
    pub bonus: Effect,
}

impl ElementalComboRule {
    pub fn new(name: impl Into<String>, required: Vec<DamageType>, bonus: Effect) -> Self {
        Self {
            name: name.into(),
            required,
            bonus,
        }
    }

    pub fn is_satisfied_by(&self, used_types: &BTreeSet<DamageType>) -> bool {
        self.required.iter().all(|damage_type| used_types.contains(damage_type))
    }
}

/// A combo that fired on one target.
#[derive(Debug, Clone, PartialEq)]
pub struct ComboTrigger {
    pub combo: String,
    pub target: String,
    pub effect: Effect,
}

/// Apply the bonus of every satisfied rule to each living target, once per rule.
pub fn evaluate_combos(
    rules: &[ElementalComboRule],
    used_types: &BTreeSet<DamageType>,
    targets: &mut [&mut Character],
) -> Vec<ComboTrigger> {
    let mut triggers = Vec::new();
    for rule in rules.iter().filter(|rule| rule.is_satisfied_by(used_types)) {
        tracing::debug!(combo = %rule.name, targets = targets.len(), "combo triggered");
        for target in targets.iter_mut().filter(|target| target.is_alive()) {
            apply_effect(target, rule.bonus.clone());
            triggers.push(ComboTrigger {
                combo: rule.name.clone(),
                target: target.name.clone(),
                effect: rule.bonus.clone(),
            });
        }
    }
    triggers
}

#[derive(Debug, Clone, Default)]
struct GroupDamage {
    types: BTreeSet<DamageType>,
    hit: BTreeSet<usize>,
}

/// Damage types dealt to each team this round, and which members were hit.
#[derive(Debug, Clone, Default)]
pub struct RoundDamageLog {
    groups: [GroupDamage; 2],
}

impl RoundDamageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, side: TeamSide, target_index: usize, damage_type: DamageType) {
        let group = &mut self.groups[side.index()];
        group.types.insert(damage_type);
        group.hit.insert(target_index);
    }

    pub fn types(&self, side: TeamSide) -> &BTreeSet<DamageType> {
        &self.groups[side.index()].types
    }

    /// Indices of the members of `side` that took typed damage, ascending.
    pub fn hit(&self, side: TeamSide) -> &BTreeSet<usize> {
        &self.groups[side.index()].hit
    }

    pub fn clear(&mut self) {
        self.groups = Default::default();
    }
}
