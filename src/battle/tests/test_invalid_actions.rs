#[cfg(test)]
mod tests {
    use crate::battle::ai::{Action, ScriptedDecisions};
    use crate::battle::state::{BattleEvent, SkipReason};
    use crate::battle::tests::common::{
        config_with_round_limit, events_where, run_test_battle, TestCharacterBuilder,
    };
    use crate::errors::ActionError;
    use crate::item::Item;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use schema::{CharacterClass, ItemCategory, Quality, Skill};

    fn rejections(result: &crate::battle::engine::BattleResult) -> Vec<String> {
        result
            .events
            .iter()
            .filter_map(|event| match event {
                BattleEvent::ActionRejected { reason, .. } => Some(reason.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_rejected_action_is_asked_again() {
        let mut team_a = vec![TestCharacterBuilder::new("Brom", CharacterClass::Warrior).build()];
        let mut team_b = vec![TestCharacterBuilder::new("Ayla", CharacterClass::Mage).build()];
        let mut a = ScriptedDecisions::new(vec![
            Action::Attack { target: 5 },
            Action::Attack { target: 0 },
        ]);
        let mut b = ScriptedDecisions::new(vec![]);

        let (result, _) = run_test_battle(
            &config_with_round_limit(1),
            &mut team_a,
            &mut team_b,
            &mut a,
            &mut b,
        );

        assert_eq!(
            rejections(&result),
            vec![ActionError::InvalidTargetIndex(5).to_string()]
        );
        assert_eq!(team_b[0].hp, 92.5);
    }

    #[rstest]
    #[case::unknown_skill(Action::UseSkill { skill: Skill::Backstab, targets: vec![0] })]
    #[case::no_targets(Action::UseSkill { skill: Skill::PowerStrike, targets: vec![] })]
    #[case::bad_skill_target(Action::UseSkill { skill: Skill::PowerStrike, targets: vec![0, 3] })]
    #[case::bad_item(Action::UseItem { index: 4 })]
    #[case::bad_attack_target(Action::Attack { target: 1 })]
    fn test_repeated_invalid_actions_skip_turn_without_mutation(#[case] action: Action) {
        let mut team_a = vec![TestCharacterBuilder::new("Brom", CharacterClass::Warrior).build()];
        let mut team_b = vec![TestCharacterBuilder::new("Ayla", CharacterClass::Mage).build()];
        let (brom_before, ayla_before) = (team_a[0].clone(), team_b[0].clone());
        let mut a = ScriptedDecisions::new(vec![action.clone(), action.clone(), action]);
        let mut b = ScriptedDecisions::new(vec![]);

        let (result, _) = run_test_battle(
            &config_with_round_limit(1),
            &mut team_a,
            &mut team_b,
            &mut a,
            &mut b,
        );

        assert_eq!(rejections(&result).len(), 3);
        assert!(result.events.contains(&BattleEvent::TurnSkipped {
            actor: "Brom".to_string(),
            reason: SkipReason::TooManyInvalidActions,
        }));
        assert_eq!(team_a[0], brom_before);
        assert_eq!(team_b[0], ayla_before);
    }

    #[test]
    fn test_insufficient_mana_keeps_mana() {
        let mut team_a = vec![TestCharacterBuilder::new("Ayla", CharacterClass::Mage)
            .with_mana(10.0)
            .build()];
        let mut team_b = vec![TestCharacterBuilder::new("Brom", CharacterClass::Warrior).build()];
        let mut a = ScriptedDecisions::new(vec![
            Action::UseSkill {
                skill: Skill::Fireball,
                targets: vec![0],
            },
            Action::Attack { target: 0 },
        ]);
        let mut b = ScriptedDecisions::new(vec![]);

        let (result, _) = run_test_battle(
            &config_with_round_limit(1),
            &mut team_a,
            &mut team_b,
            &mut a,
            &mut b,
        );

        assert_eq!(
            rejections(&result),
            vec![ActionError::InsufficientMana {
                caster: "Ayla".to_string(),
                required: 15.0,
                available: 10.0,
            }
            .to_string()]
        );
        assert_eq!(team_a[0].mana, 10.0);
        assert!(team_b[0].effects.is_empty());
        assert_eq!(team_b[0].hp, 92.5);
    }

    #[test]
    fn test_equipping_gear_from_inventory_counts_as_the_turn() {
        let sword = Item::new("sword", ItemCategory::Weapon, 5.0, 50, Quality::Rare);
        let mut team_a = vec![TestCharacterBuilder::new("Brom", CharacterClass::Warrior)
            .with_item(sword)
            .build()];
        let mut team_b = vec![TestCharacterBuilder::new("Ayla", CharacterClass::Mage).build()];
        let mut a = ScriptedDecisions::new(vec![
            Action::UseItem { index: 0 },
            Action::Attack { target: 0 },
        ]);
        let mut b = ScriptedDecisions::new(vec![]);

        let (result, _) = run_test_battle(
            &config_with_round_limit(2),
            &mut team_a,
            &mut team_b,
            &mut a,
            &mut b,
        );

        assert!(result.events.contains(&BattleEvent::ItemUsed {
            actor: "Brom".to_string(),
            item: "sword".to_string(),
        }));
        assert!(team_a[0].inventory.is_empty());
        // Second round attack uses the new weapon: 15 − 2.5.
        assert_eq!(team_b[0].hp, 87.5);
        assert_eq!(
            events_where(&result, |e| matches!(e, BattleEvent::Attacked { .. })).len(),
            1
        );
    }
}
