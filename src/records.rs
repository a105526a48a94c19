//! Flat, versioned records of character state.
//!
//! A [`RecordSet`] is what a save-file layer would persist: one table per
//! concern, keyed by character nickname, item name and skill name. The
//! storage format itself belongs to the caller.

use crate::character::Character;
use crate::effects::Effect;
use crate::errors::{RecordError, RecordResult};
use crate::item::{Enchantment, Item};
use crate::skill_data::skill_by_name;
use schema::{CharacterClass, DamageType, EffectKind, EquipSlot, ItemCategory, ItemSet, Quality};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const RECORD_VERSION: u32 = 1;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CharacterRow {
    pub nickname: String,
    pub class: CharacterClass,
    pub hp: f64,
    pub max_hp: f64,
    pub mana: f64,
    pub max_mana: f64,
    pub attack_power: f64,
    pub defense: f64,
    pub level: u32,
    pub experience: u32,
    pub gold: u32,
    pub guild: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub owner: String,
    /// `None` for inventory items, the slot for equipped ones.
    pub equipped_slot: Option<EquipSlot>,
    /// Position in the inventory; ignored for equipped items.
    pub position: usize,
    pub name: String,
    pub category: ItemCategory,
    pub power: f64,
    pub value: u32,
    pub quality: Quality,
    pub damage_type: Option<DamageType>,
    pub enchantment_name: Option<String>,
    pub enchantment_kind: Option<EffectKind>,
    pub enchantment_power: Option<f64>,
    pub item_set: Option<ItemSet>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct EffectRow {
    pub owner: String,
    pub position: usize,
    pub kind: EffectKind,
    pub remaining: u32,
    pub magnitude: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SkillRow {
    pub owner: String,
    /// Display name, e.g. `"Power Strike"`.
    pub skill: String,
    pub level: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReputationRow {
    pub owner: String,
    pub faction: String,
    pub standing: i32,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub version: u32,
    pub characters: Vec<CharacterRow>,
    pub items: Vec<ItemRow>,
    pub effects: Vec<EffectRow>,
    pub skills: Vec<SkillRow>,
    pub reputation: Vec<ReputationRow>,
}

impl RecordSet {
    /// Flatten a roster into rows.
    pub fn capture(characters: &[Character]) -> Self {
        let mut records = RecordSet {
            version: RECORD_VERSION,
            characters: Vec::new(),
            items: Vec::new(),
            effects: Vec::new(),
            skills: Vec::new(),
            reputation: Vec::new(),
        };

        for character in characters {
            let owner = &character.name;
            records.characters.push(CharacterRow {
                nickname: owner.clone(),
                class: character.class,
                hp: character.hp,
                max_hp: character.max_hp,
                mana: character.mana,
                max_mana: character.max_mana,
                attack_power: character.attack_power,
                defense: character.defense,
                level: character.level,
                experience: character.experience,
                gold: character.gold,
                guild: character.guild.clone(),
            });

            for (&slot, item) in &character.equipped {
                records.items.push(ItemRow::from_item(owner, Some(slot), 0, item));
            }
            for (position, item) in character.inventory.iter().enumerate() {
                records.items.push(ItemRow::from_item(owner, None, position, item));
            }
            for (position, effect) in character.effects.iter().enumerate() {
                records.effects.push(EffectRow {
                    owner: owner.clone(),
                    position,
                    kind: effect.kind,
                    remaining: effect.remaining,
                    magnitude: effect.magnitude,
                });
            }
            for (skill, &level) in &character.skills {
                records.skills.push(SkillRow {
                    owner: owner.clone(),
                    skill: skill.to_string(),
                    level,
                });
            }
            for (faction, &standing) in &character.reputation {
                records.reputation.push(ReputationRow {
                    owner: owner.clone(),
                    faction: faction.clone(),
                    standing,
                });
            }
        }

        tracing::debug!(
            characters = records.characters.len(),
            items = records.items.len(),
            "records captured"
        );
        records
    }

    /// Rebuild the roster, in the order of the character rows.
    pub fn restore(&self) -> RecordResult<Vec<Character>> {
        if self.version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: self.version,
                expected: RECORD_VERSION,
            });
        }

        let mut index: BTreeMap<&str, usize> = BTreeMap::new();
        let mut characters = Vec::with_capacity(self.characters.len());
        for row in &self.characters {
            if index.insert(&row.nickname, characters.len()).is_some() {
                return Err(RecordError::DuplicateCharacter(row.nickname.clone()));
            }
            characters.push(row.to_character());
        }
        let owner = |name: &str| -> RecordResult<usize> {
            index
                .get(name)
                .copied()
                .ok_or_else(|| RecordError::UnknownOwner(name.to_string()))
        };

        // Rows are applied in position order so inventories and effect
        // lists come back in their original order.
        let mut items: Vec<&ItemRow> = self.items.iter().collect();
        items.sort_by_key(|row| row.position);
        for row in items {
            let character = &mut characters[owner(&row.owner)?];
            let item = row.to_item();
            match row.equipped_slot {
                Some(slot) => {
                    if item.slot() != Some(slot) {
                        return Err(RecordError::SlotMismatch {
                            item: item.name,
                            slot: slot.to_string(),
                        });
                    }
                    character.equipped.insert(slot, item);
                }
                None => character.inventory.push(item),
            }
        }

        let mut effects: Vec<&EffectRow> = self.effects.iter().collect();
        effects.sort_by_key(|row| row.position);
        for row in effects {
            characters[owner(&row.owner)?]
                .effects
                .push(Effect::new(row.kind, row.remaining, row.magnitude));
        }

        for row in &self.skills {
            let skill =
                skill_by_name(&row.skill).map_err(|_| RecordError::UnknownSkill(row.skill.clone()))?;
            characters[owner(&row.owner)?].skills.insert(skill, row.level);
        }

        for row in &self.reputation {
            characters[owner(&row.owner)?]
                .reputation
                .insert(row.faction.clone(), row.standing);
        }

        Ok(characters)
    }
}

impl CharacterRow {
    fn to_character(&self) -> Character {
        let mut character = Character::new(self.nickname.clone(), self.class);
        character.hp = self.hp;
        character.max_hp = self.max_hp;
        character.mana = self.mana;
        character.max_mana = self.max_mana;
        character.attack_power = self.attack_power;
        character.defense = self.defense;
        character.level = self.level;
        character.experience = self.experience;
        character.gold = self.gold;
        character.guild = self.guild.clone();
        // Collections come from their own tables.
        character.skills.clear();
        character.reputation.clear();
        character
    }
}

impl ItemRow {
    fn from_item(owner: &str, equipped_slot: Option<EquipSlot>, position: usize, item: &Item) -> Self {
        Self {
            owner: owner.to_string(),
            equipped_slot,
            position,
            name: item.name.clone(),
            category: item.category,
            power: item.power,
            value: item.value,
            quality: item.quality,
            damage_type: item.damage_type,
            enchantment_name: item.enchantment.as_ref().map(|e| e.name.clone()),
            enchantment_kind: item.enchantment.as_ref().map(|e| e.kind),
            enchantment_power: item.enchantment.as_ref().map(|e| e.power),
            item_set: item.item_set,
        }
    }

    fn to_item(&self) -> Item {
        let enchantment = match (&self.enchantment_name, self.enchantment_kind, self.enchantment_power) {
            (Some(name), Some(kind), Some(power)) => Some(Enchantment {
                name: name.clone(),
                kind,
                power,
            }),
            _ => None,
        };
        Item {
            name: self.name.clone(),
            category: self.category,
            power: self.power,
            value: self.value,
            quality: self.quality,
            damage_type: self.damage_type,
            enchantment,
            item_set: self.item_set,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::apply_effect;
    use pretty_assertions::assert_eq;
    use schema::Skill;

    fn roster() -> Vec<Character> {
        let mut brom = Character::new("Brom", CharacterClass::Warrior).with_guild("Iron Wolves");
        brom.equip(
            Item::new("Fiery weapon", ItemCategory::Weapon, 12.0, 120, Quality::Epic)
                .with_damage_type(DamageType::Fire)
                .with_enchantment(Enchantment {
                    name: "Charm of Fire".to_string(),
                    kind: EffectKind::Burn,
                    power: 0.25,
                })
                .with_item_set(ItemSet::WarriorSet),
        )
        .unwrap();
        brom.inventory.push(Item::new("potion", ItemCategory::Potion, 20.0, 50, Quality::Common));
        brom.inventory.push(Item::new("armor", ItemCategory::Armor, 6.0, 60, Quality::Rare));
        apply_effect(&mut brom, Effect::new(EffectKind::Burn, 2, 3.0));
        apply_effect(&mut brom, Effect::new(EffectKind::Regeneration, 1, 5.0));
        brom.skills.insert(Skill::PowerStrike, 3);
        brom.adjust_reputation("Knights", 40, 100);
        brom.hp = 61.5;

        let ayla = Character::new("Ayla", CharacterClass::Mage);
        vec![brom, ayla]
    }

    #[test]
    fn test_capture_then_restore_reproduces_roster() {
        let original = roster();

        let restored = RecordSet::capture(&original).restore().unwrap();

        assert_eq!(restored, original);
    }

    #[test]
    fn test_record_set_survives_json() {
        let records = RecordSet::capture(&roster());

        let json = serde_json::to_string(&records).unwrap();
        let parsed: RecordSet = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, records);
        assert!(json.contains("\"skill\":\"Power Strike\""));
    }

    #[test]
    fn test_rows_are_flat_and_keyed() {
        let records = RecordSet::capture(&roster());

        assert_eq!(records.version, RECORD_VERSION);
        assert_eq!(records.characters.len(), 2);
        assert_eq!(records.items.len(), 3);
        assert_eq!(records.effects.len(), 2);
        assert_eq!(records.skills.iter().filter(|row| row.owner == "Brom").count(), 2);
        assert_eq!(records.reputation.len(), 6);
    }

    #[test]
    fn test_version_mismatch_rejected() {
        let mut records = RecordSet::capture(&roster());
        records.version = 2;

        assert_eq!(
            records.restore(),
            Err(RecordError::UnsupportedVersion {
                found: 2,
                expected: RECORD_VERSION,
            })
        );
    }

    #[test]
    fn test_unknown_skill_and_orphan_rows_rejected() {
        let mut records = RecordSet::capture(&roster());
        records.skills[0].skill = "Meteor".to_string();
        assert_eq!(records.restore(), Err(RecordError::UnknownSkill("Meteor".to_string())));

        let mut records = RecordSet::capture(&roster());
        records.effects[0].owner = "Ghost".to_string();
        assert_eq!(records.restore(), Err(RecordError::UnknownOwner("Ghost".to_string())));
    }

    #[test]
    fn test_duplicate_nickname_rejected() {
        let mut records = RecordSet::capture(&roster());
        records.characters.push(records.characters[0].clone());

        assert_eq!(
            records.restore(),
            Err(RecordError::DuplicateCharacter("Brom".to_string()))
        );
    }
}
