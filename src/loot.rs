//! Reward item generation.
//!
//! A pure function of difficulty, tuning and the injected [`BattleRng`]:
//! the same seed and difficulty always produce the same item.

use crate::battle::state::BattleRng;
use crate::config::LootConfig;
use crate::item::{Enchantment, Item};
use schema::{DamageType, EffectKind, ItemCategory, ItemSet, Quality};
use strum::IntoEnumIterator;

const ENCHANTMENT_KINDS: [EffectKind; 3] = [EffectKind::Burn, EffectKind::Freeze, EffectKind::Poison];
const ITEM_SETS: [ItemSet; 2] = [ItemSet::WarriorSet, ItemSet::MageSet];

/// Pick the quality tier for a roll. Each difficulty point above 1 lowers
/// every boundary by `difficulty_shift`, pushing rolls toward higher tiers.
pub fn quality_for_roll(roll: f64, difficulty: u32, config: &LootConfig) -> Quality {
    let shift = config.difficulty_shift * difficulty.saturating_sub(1) as f64;
    if roll > config.legendary_threshold - shift {
        Quality::Legendary
    } else if roll > config.epic_threshold - shift {
        Quality::Epic
    } else if roll > config.rare_threshold - shift {
        Quality::Rare
    } else {
        Quality::Common
    }
}

/// Generate one loot item. Difficulty 0 is treated as 1.
pub fn generate_loot(difficulty: u32, config: &LootConfig, rng: &mut BattleRng) -> Item {
    let difficulty = difficulty.max(1);

    let quality = quality_for_roll(rng.next_roll("loot quality"), difficulty, config);

    let categories: Vec<ItemCategory> = ItemCategory::iter().collect();
    let category = categories[rng.pick_index(categories.len(), "loot category")];

    let base_power = rng
        .roll_range(config.min_base_power, config.max_base_power, "loot power")
        .saturating_mul(difficulty);
    let value = base_power.saturating_mul(config.value_per_power);

    let enchantment = if rng.next_roll("loot enchantment") > config.enchantment_threshold {
        let kind = ENCHANTMENT_KINDS[rng.pick_index(ENCHANTMENT_KINDS.len(), "enchantment kind")];
        let power = rng.roll_between(
            config.min_enchantment_power,
            config.max_enchantment_power,
            "enchantment power",
        );
        Some(Enchantment {
            name: enchantment_name(kind).to_string(),
            kind,
            power,
        })
    } else {
        None
    };

    let item_set = if rng.next_roll("loot item set") > config.item_set_threshold {
        Some(ITEM_SETS[rng.pick_index(ITEM_SETS.len(), "item set")])
    } else {
        None
    };

    let damage_types: Vec<DamageType> = DamageType::iter().collect();
    let damage_type = damage_types[rng.pick_index(damage_types.len(), "loot damage type")];

    let name = format!("{} {}", damage_type.item_prefix(), category.noun())
        .trim()
        .to_string();

    let item = Item {
        name,
        category,
        power: base_power as f64,
        value,
        quality,
        damage_type: Some(damage_type),
        enchantment,
        item_set,
    };
    tracing::debug!(item = %item, difficulty, "loot generated");
    item
}

fn enchantment_name(kind: EffectKind) -> &'static str {
    match kind {
        EffectKind::Burn => "Charm of Fire",
        EffectKind::Freeze => "Charm of Ice",
        EffectKind::Poison => "Charm of Venom",
        EffectKind::Regeneration => "Charm of Renewal",
        EffectKind::Stun => "Charm of Thunder",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    const DRAWS: usize = 10_000;

    fn legendary_share(difficulty: u32, seed: u64) -> f64 {
        let config = LootConfig::default();
        let mut rng = BattleRng::from_seed(seed);
        let legendary = (0..DRAWS)
            .map(|_| generate_loot(difficulty, &config, &mut rng))
            .filter(|item| item.quality == Quality::Legendary)
            .count();
        legendary as f64 / DRAWS as f64
    }

    #[test]
    fn test_legendary_share_at_difficulty_one_is_near_five_percent() {
        let share = legendary_share(1, 7);

        // Standard deviation is about 0.0022 over 10,000 draws.
        assert!((share - 0.05).abs() < 0.015, "legendary share was {share}");
    }

    #[test]
    fn test_extreme_difficulty_saturates_power_and_value() {
        let mut rng = BattleRng::from_seed(3);

        let item = generate_loot(u32::MAX, &LootConfig::default(), &mut rng);

        assert_eq!(item.power, u32::MAX as f64);
        assert_eq!(item.value, u32::MAX);
        assert_eq!(item.quality, Quality::Legendary);
    }

    #[test]
    fn test_higher_difficulty_raises_legendary_share() {
        let easy = legendary_share(1, 11);
        let hard = legendary_share(10, 11);

        assert!(hard > easy, "difficulty 10 share {hard} should exceed {easy}");
        assert!((hard - 0.5).abs() < 0.03, "difficulty 10 share was {hard}");
    }

    #[rstest]
    #[case(0.96, 1, Quality::Legendary)]
    #[case(0.95, 1, Quality::Epic)]
    #[case(0.81, 1, Quality::Epic)]
    #[case(0.51, 1, Quality::Rare)]
    #[case(0.50, 1, Quality::Common)]
    #[case(0.91, 2, Quality::Legendary)]
    #[case(0.46, 2, Quality::Rare)]
    #[case(0.51, 10, Quality::Legendary)]
    #[case(0.04, 10, Quality::Common)]
    fn test_quality_thresholds(#[case] roll: f64, #[case] difficulty: u32, #[case] expected: Quality) {
        assert_eq!(quality_for_roll(roll, difficulty, &LootConfig::default()), expected);
    }

    #[test]
    fn test_scripted_draw_produces_exact_item() {
        let mut rng = BattleRng::new_for_test(vec![
            0.97, // quality: legendary
            0.0,  // category: weapon
            1.0,  // power: 15
            0.8,  // enchantment present
            0.0,  // enchantment kind: burn
            0.5,  // enchantment power: 0.2
            0.95, // item set present
            0.99, // item set: mage
            0.2,  // damage type: fire
        ]);

        let item = generate_loot(2, &LootConfig::default(), &mut rng);

        assert_eq!(item.name, "Fiery weapon");
        assert_eq!(item.category, ItemCategory::Weapon);
        assert_eq!(item.quality, Quality::Legendary);
        assert_eq!(item.power, 30.0);
        assert_eq!(item.value, 300);
        assert_eq!(item.item_set, Some(ItemSet::MageSet));
        assert_eq!(item.damage_type, Some(DamageType::Fire));
        let enchantment = item.enchantment.expect("enchantment roll passed");
        assert_eq!(enchantment.kind, EffectKind::Burn);
        assert!((enchantment.power - 0.2).abs() < 1e-9);
    }

    #[test]
    fn test_physical_items_have_no_prefix() {
        let mut rng = BattleRng::new_for_test(vec![0.1, 0.6, 0.0, 0.1, 0.1, 0.0]);

        let item = generate_loot(1, &LootConfig::default(), &mut rng);

        assert_eq!(item.name, "potion");
        assert_eq!(item.quality, Quality::Common);
        assert_eq!(item.power, 5.0);
        assert_eq!(item.value, 50);
        assert_eq!(item.enchantment, None);
        assert_eq!(item.item_set, None);
    }

    #[test]
    fn test_same_seed_same_loot() {
        let config = LootConfig::default();
        let mut first = BattleRng::from_seed(99);
        let mut second = BattleRng::from_seed(99);

        for _ in 0..50 {
            assert_eq!(
                generate_loot(4, &config, &mut first),
                generate_loot(4, &config, &mut second)
            );
        }
    }
}
