use schema::{DamageType, EffectKind, EquipSlot, ItemCategory, ItemSet, Quality};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An enchantment bound to an item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enchantment {
    pub name: String,
    pub kind: EffectKind,
    pub power: f64,
}

/// An immutable item value. Moving it between inventories transfers ownership.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub category: ItemCategory,
    pub power: f64,
    pub value: u32,
    pub quality: Quality,
    pub damage_type: Option<DamageType>,
    pub enchantment: Option<Enchantment>,
    pub item_set: Option<ItemSet>,
}

impl Item {
    /// Create a plain item with no damage type, enchantment or set.
    pub fn new(
        name: impl Into<String>,
        category: ItemCategory,
        power: f64,
        value: u32,
        quality: Quality,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            power,
            value,
            quality,
            damage_type: None,
            enchantment: None,
            item_set: None,
        }
    }

    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    pub fn with_enchantment(mut self, enchantment: Enchantment) -> Self {
        self.enchantment = Some(enchantment);
        self
    }

    pub fn with_item_set(mut self, item_set: ItemSet) -> Self {
        self.item_set = Some(item_set);
        self
    }

    pub fn slot(&self) -> Option<EquipSlot> {
        self.category.slot()
    }

    pub fn is_potion(&self) -> bool {
        self.category == ItemCategory::Potion
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, {}, power {}, value {})",
            self.name, self.category, self.quality, self.power, self.value
        )
    }
}
