// Arena Combat Schema - Shared type definitions
// This crate contains the static, data-only enums that every part of the
// combat engine agrees on: damage types, effect kinds, item tiers, skills,
// classes and battlefield conditions.

// Re-export the main types
pub use battlefield::*;
pub use combat_types::*;
pub use item_types::*;
pub use skills::*;

pub mod battlefield;
pub mod combat_types;
pub mod item_types;
pub mod skills;
