use crate::effects::Effect;
use crate::errors::{ActionError, ActionResult};
use crate::item::Item;
use schema::{CharacterClass, DamageType, EffectKind, EquipSlot, Skill};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

pub const DEFAULT_MAX_HP: f64 = 100.0;
pub const DEFAULT_MAX_MANA: f64 = 50.0;
pub const DEFAULT_ATTACK_POWER: f64 = 10.0;
pub const DEFAULT_DEFENSE: f64 = 5.0;
pub const DEFAULT_GOLD: u32 = 100;

/// Factions every new character holds a standing with.
pub const DEFAULT_FACTIONS: [&str; 3] = ["Knights", "Mages", "Traders"];

/// Characters stop gaining levels here; experience keeps accumulating.
pub const MAX_LEVEL: u32 = 100;

// Level-up growth
const EXP_PER_LEVEL: u32 = 100;
const HP_PER_LEVEL: f64 = 10.0;
const MANA_PER_LEVEL: f64 = 5.0;
const ATTACK_PER_LEVEL: f64 = 2.0;
const DEFENSE_PER_LEVEL: f64 = 1.0;

/// Gold per current skill level needed to upgrade a skill.
pub const SKILL_UPGRADE_COST: u32 = 50;

/// A combat participant. Persists across battles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
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
    pub equipped: BTreeMap<EquipSlot, Item>,
    pub inventory: Vec<Item>,
    pub effects: Vec<Effect>,
    /// Known skills and their levels.
    pub skills: BTreeMap<Skill, u32>,
    pub reputation: BTreeMap<String, i32>,
    pub guild: Option<String>,
}

impl Character {
    /// Create a level 1 character with the class's starting skills.
    pub fn new(name: impl Into<String>, class: CharacterClass) -> Self {
        let skills = class
            .starting_skills()
            .into_iter()
            .map(|skill| (skill, 1))
            .collect();
        let reputation = DEFAULT_FACTIONS
            .iter()
            .map(|faction| (faction.to_string(), 0))
            .collect();

        Character {
            name: name.into(),
            class,
            hp: DEFAULT_MAX_HP,
            max_hp: DEFAULT_MAX_HP,
            mana: DEFAULT_MAX_MANA,
            max_mana: DEFAULT_MAX_MANA,
            attack_power: DEFAULT_ATTACK_POWER,
            defense: DEFAULT_DEFENSE,
            level: 1,
            experience: 0,
            gold: DEFAULT_GOLD,
            equipped: BTreeMap::new(),
            inventory: Vec::new(),
            effects: Vec::new(),
            skills,
            reputation,
            guild: None,
        }
    }

    pub fn with_guild(mut self, guild: impl Into<String>) -> Self {
        self.guild = Some(guild.into());
        self
    }

    pub fn is_defeated(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn is_alive(&self) -> bool {
        !self.is_defeated()
    }

    pub fn has_effect(&self, kind: EffectKind) -> bool {
        self.effects.iter().any(|effect| effect.kind == kind)
    }

    pub fn is_stunned(&self) -> bool {
        self.has_effect(EffectKind::Stun)
    }

    pub fn is_frozen(&self) -> bool {
        self.has_effect(EffectKind::Freeze)
    }

    /// Whether the character may take an action this round.
    pub fn can_act(&self) -> bool {
        self.is_alive() && !self.effects.iter().any(|e| e.kind.prevents_action())
    }

    /// Reduce HP, never below zero. Returns the damage actually taken.
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        let before = self.hp;
        self.hp = (self.hp - amount.max(0.0)).clamp(0.0, self.max_hp);
        before - self.hp
    }

    /// Restore HP up to the maximum. Defeated characters cannot be healed.
    /// Returns the HP actually restored.
    pub fn heal(&mut self, amount: f64) -> f64 {
        if self.is_defeated() {
            return 0.0;
        }
        let before = self.hp;
        self.hp = (self.hp + amount.max(0.0)).clamp(0.0, self.max_hp);
        self.hp - before
    }

    /// Deduct mana if enough is available.
    pub fn spend_mana(&mut self, amount: f64) -> bool {
        if self.mana + f64::EPSILON < amount {
            return false;
        }
        self.mana = (self.mana - amount).clamp(0.0, self.max_mana);
        true
    }

    pub fn skill_level(&self, skill: Skill) -> Option<u32> {
        self.skills.get(&skill).copied()
    }

    /// Learn a skill at level 1. Already known skills are left untouched.
    pub fn learn_skill(&mut self, skill: Skill) {
        self.skills.entry(skill).or_insert(1);
    }

    /// Raise a known skill by one level, paying `level × 50` gold.
    pub fn upgrade_skill(&mut self, skill: Skill) -> ActionResult<u32> {
        let level = self
            .skill_level(skill)
            .ok_or_else(|| ActionError::SkillNotKnown {
                caster: self.name.clone(),
                skill,
            })?;
        let cost = level.saturating_mul(SKILL_UPGRADE_COST);
        if self.gold < cost {
            return Err(ActionError::InsufficientGold {
                character: self.name.clone(),
                required: cost,
                available: self.gold,
            });
        }
        self.gold -= cost;
        let next = level.saturating_add(1);
        self.skills.insert(skill, next);
        Ok(next)
    }

    /// Base attack plus the power of weapon and accessory.
    pub fn offensive_power(&self) -> f64 {
        self.attack_power
            + self.equipped_power(EquipSlot::Weapon)
            + self.equipped_power(EquipSlot::Accessory)
    }

    /// Base defense plus the power of armor and accessory.
    pub fn defensive_power(&self) -> f64 {
        self.defense
            + self.equipped_power(EquipSlot::Armor)
            + self.equipped_power(EquipSlot::Accessory)
    }

    fn equipped_power(&self, slot: EquipSlot) -> f64 {
        self.equipped.get(&slot).map_or(0.0, |item| item.power)
    }

    /// Damage type of a basic attack: the weapon's element, else physical.
    pub fn weapon_damage_type(&self) -> DamageType {
        self.equipped
            .get(&EquipSlot::Weapon)
            .and_then(|item| item.damage_type)
            .unwrap_or(DamageType::Physical)
    }

    /// Equip an item, returning whatever previously occupied the slot to
    /// the inventory.
    pub fn equip(&mut self, item: Item) -> ActionResult<()> {
        let slot = item
            .slot()
            .ok_or_else(|| ActionError::ItemNotUsable(item.name.clone()))?;
        if let Some(previous) = self.equipped.insert(slot, item) {
            self.inventory.push(previous);
        }
        Ok(())
    }

    /// Use the inventory item at `index`: potions are drunk, gear is equipped.
    pub fn use_inventory_item(&mut self, index: usize) -> ActionResult<ItemUse> {
        let item = self
            .inventory
            .get(index)
            .ok_or(ActionError::InvalidItemIndex(index))?;

        if item.is_potion() {
            let item = self.inventory.remove(index);
            let restored = self.heal(item.power);
            return Ok(ItemUse::Drank { item, restored });
        }
        if item.slot().is_none() {
            return Err(ActionError::ItemNotUsable(item.name.clone()));
        }
        let item = self.inventory.remove(index);
        let name = item.name.clone();
        self.equip(item)?;
        Ok(ItemUse::Equipped { name })
    }

    /// Grant experience and apply any level-ups, stopping at `MAX_LEVEL`.
    /// Returns levels gained.
    pub fn add_experience(&mut self, amount: u32) -> u32 {
        self.experience = self.experience.saturating_add(amount);
        let mut gained = 0;
        while self.level < MAX_LEVEL
            && self.experience >= self.level.saturating_mul(EXP_PER_LEVEL)
        {
            self.level += 1;
            self.max_hp += HP_PER_LEVEL;
            self.hp = self.max_hp;
            self.max_mana += MANA_PER_LEVEL;
            self.mana = self.max_mana;
            self.attack_power += ATTACK_PER_LEVEL;
            self.defense += DEFENSE_PER_LEVEL;
            gained += 1;
        }
        if gained > 0 {
            tracing::info!(character = %self.name, level = self.level, "level up");
        }
        gained
    }

    /// Adjust standing with a faction. Gains stop at `cap`; a standing
    /// already above it is left where it is. Returns the new value.
    pub fn adjust_reputation(&mut self, faction: &str, amount: i32, cap: i32) -> i32 {
        let standing = self.reputation.entry(faction.to_string()).or_insert(0);
        let adjusted = standing.saturating_add(amount);
        *standing = if amount > 0 && adjusted > cap {
            (*standing).max(cap)
        } else {
            adjusted
        };
        *standing
    }

    pub fn reputation_with(&self, faction: &str) -> i32 {
        self.reputation.get(faction).copied().unwrap_or(0)
    }
}

/// Result of using an inventory item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemUse {
    Drank { item: Item, restored: f64 },
    Equipped { name: String },
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}, level {}, HP {:.1}/{:.1}, mana {:.1}/{:.1})",
            self.name, self.class, self.level, self.hp, self.max_hp, self.mana, self.max_mana
        )
    }
}
