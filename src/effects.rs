//! Timed status effects and the per-round advancement rules.
//!
//! Effects live on the character they afflict, in application order. There
//! is no merging: two burns are two independent instances.

use crate::character::Character;
use schema::EffectKind;
use serde::{Deserialize, Serialize};

/// An active status instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effect {
    pub kind: EffectKind,
    /// Rounds left before the effect expires.
    pub remaining: u32,
    pub magnitude: f64,
}

impl Effect {
    pub fn new(kind: EffectKind, remaining: u32, magnitude: f64) -> Self {
        Self {
            kind,
            remaining,
            magnitude,
        }
    }

    /// Signed HP change this effect contributes per round.
    pub fn hp_delta(&self) -> f64 {
        match self.kind {
            EffectKind::Regeneration => self.magnitude,
            EffectKind::Burn | EffectKind::Poison => -self.magnitude,
            EffectKind::Freeze | EffectKind::Stun => 0.0,
        }
    }
}

/// What one call to [`advance_effects`] did to a character.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectReport {
    /// Each effect that ticked, in list order, with the HP change it asked for.
    pub ticks: Vec<(EffectKind, f64)>,
    pub expired: Vec<EffectKind>,
    pub hp_before: f64,
    pub hp_after: f64,
}

impl EffectReport {
    pub fn net_change(&self) -> f64 {
        self.hp_after - self.hp_before
    }
}

/// Attach an effect to the target.
pub fn apply_effect(target: &mut Character, effect: Effect) {
    tracing::debug!(
        target = %target.name,
        kind = %effect.kind,
        rounds = effect.remaining,
        magnitude = effect.magnitude,
        "effect applied"
    );
    target.effects.push(effect);
}

/// Advance every effect on `target` by one round.
///
/// HP deltas are summed across all effects and the result is clamped to
/// `[0, max_hp]` once, so the outcome does not depend on effect order.
pub fn advance_effects(target: &mut Character) -> EffectReport {
    let mut report = EffectReport {
        hp_before: target.hp,
        ..Default::default()
    };

    let mut net = 0.0;
    for effect in target.effects.iter_mut() {
        effect.remaining = effect.remaining.saturating_sub(1);
        let delta = effect.hp_delta();
        net += delta;
        report.ticks.push((effect.kind, delta));
        if effect.remaining == 0 {
            report.expired.push(effect.kind);
        }
    }
    target.effects.retain(|effect| effect.remaining > 0);

    target.hp = (target.hp + net).clamp(0.0, target.max_hp);
    report.hp_after = target.hp;

    if !report.ticks.is_empty() {
        tracing::debug!(
            target = %target.name,
            net_change = report.net_change(),
            expired = report.expired.len(),
            "effects advanced"
        );
    }
    report
}

/// Strip every harmful effect. Returns the kinds removed.
pub fn clear_harmful(target: &mut Character) -> Vec<EffectKind> {
    let mut removed = Vec::new();
    target.effects.retain(|effect| {
        if effect.kind.is_harmful() {
            removed.push(effect.kind);
            false
        } else {
            true
        }
    });
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schema::CharacterClass;

    fn character_with_hp(hp: f64) -> Character {
        let mut character = Character::new("Target", CharacterClass::Mage);
        character.hp = hp;
        character
    }

    #[test]
    fn test_burn_expires_after_single_round() {
        let mut target = character_with_hp(20.0);
        apply_effect(&mut target, Effect::new(EffectKind::Burn, 1, 5.0));

        let report = advance_effects(&mut target);

        assert_eq!(target.hp, 15.0);
        assert!(target.effects.is_empty());
        assert_eq!(report.expired, vec![EffectKind::Burn]);
    }

    #[test]
    fn test_duration_decrements_by_one_per_round() {
        let mut target = character_with_hp(50.0);
        apply_effect(&mut target, Effect::new(EffectKind::Poison, 3, 4.0));

        advance_effects(&mut target);
        assert_eq!(target.effects[0].remaining, 2);
        advance_effects(&mut target);
        assert_eq!(target.effects[0].remaining, 1);
        advance_effects(&mut target);
        assert!(target.effects.is_empty());
        assert_eq!(target.hp, 38.0);
    }

    #[test]
    fn test_duplicates_are_independent() {
        let mut target = character_with_hp(50.0);
        apply_effect(&mut target, Effect::new(EffectKind::Burn, 2, 3.0));
        apply_effect(&mut target, Effect::new(EffectKind::Burn, 1, 3.0));

        advance_effects(&mut target);

        assert_eq!(target.hp, 44.0);
        assert_eq!(target.effects.len(), 1);
        assert_eq!(target.effects[0].remaining, 1);
    }

    #[test]
    fn test_regeneration_clamps_to_max_hp() {
        let mut target = character_with_hp(98.0);
        apply_effect(&mut target, Effect::new(EffectKind::Regeneration, 2, 10.0));

        advance_effects(&mut target);

        assert_eq!(target.hp, target.max_hp);
    }

    #[test]
    fn test_damage_never_drops_below_zero() {
        let mut target = character_with_hp(3.0);
        apply_effect(&mut target, Effect::new(EffectKind::Poison, 2, 7.0));

        advance_effects(&mut target);

        assert_eq!(target.hp, 0.0);
        assert!(target.is_defeated());
    }

    #[test]
    fn test_clamping_happens_once_after_all_effects() {
        // At full HP a per-effect clamp would swallow the regeneration and
        // leave the burn; netting first keeps the character at full health.
        let mut target = character_with_hp(100.0);
        apply_effect(&mut target, Effect::new(EffectKind::Regeneration, 2, 5.0));
        apply_effect(&mut target, Effect::new(EffectKind::Burn, 2, 5.0));

        let report = advance_effects(&mut target);

        assert_eq!(target.hp, 100.0);
        assert_eq!(report.net_change(), 0.0);
    }

    #[test]
    fn test_control_effects_do_not_change_hp() {
        let mut target = character_with_hp(40.0);
        apply_effect(&mut target, Effect::new(EffectKind::Stun, 1, 0.0));
        apply_effect(&mut target, Effect::new(EffectKind::Freeze, 2, 0.0));
        assert!(!target.can_act());

        advance_effects(&mut target);

        assert_eq!(target.hp, 40.0);
        assert!(target.is_frozen());
        assert!(!target.is_stunned());
    }

    #[test]
    fn test_clear_harmful_keeps_regeneration() {
        let mut target = character_with_hp(40.0);
        apply_effect(&mut target, Effect::new(EffectKind::Burn, 2, 3.0));
        apply_effect(&mut target, Effect::new(EffectKind::Regeneration, 2, 3.0));
        apply_effect(&mut target, Effect::new(EffectKind::Stun, 1, 0.0));

        let removed = clear_harmful(&mut target);

        assert_eq!(removed, vec![EffectKind::Burn, EffectKind::Stun]);
        assert_eq!(target.effects.len(), 1);
        assert_eq!(target.effects[0].kind, EffectKind::Regeneration);
    }
}
