pub mod ai;
pub mod combos;
pub mod engine;
pub mod modifiers;
pub mod rewards;
pub mod skills;
pub mod state;

#[cfg(test)]
mod tests;
