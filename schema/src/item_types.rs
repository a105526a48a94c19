use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum ItemCategory {
    Weapon,
    Armor,
    Potion,
    Accessory,
}

impl ItemCategory {
    /// The equipment slot this category occupies, if it can be worn at all.
    pub fn slot(self) -> Option<EquipSlot> {
        match self {
            ItemCategory::Weapon => Some(EquipSlot::Weapon),
            ItemCategory::Armor => Some(EquipSlot::Armor),
            ItemCategory::Accessory => Some(EquipSlot::Accessory),
            ItemCategory::Potion => None,
        }
    }

    pub fn noun(self) -> &'static str {
        match self {
            ItemCategory::Weapon => "weapon",
            ItemCategory::Armor => "armor",
            ItemCategory::Potion => "potion",
            ItemCategory::Accessory => "accessory",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum EquipSlot {
    Weapon,
    Armor,
    Accessory,
}

/// Loot tiers. Declaration order is the rarity order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Quality {
    Common,
    Rare,
    Epic,
    Legendary,
}

/// Item set affiliation. A name-only tag.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "title_case", ascii_case_insensitive)]
pub enum ItemSet {
    WarriorSet,
    MageSet,
}
