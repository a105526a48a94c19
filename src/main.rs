use arena_combat::battle::ai::FirstTargetAttacker;
use arena_combat::{
    run_battle, BattleEvent, BattleOptions, BattleProviders, BattleRng, Character, CharacterClass,
    DamageType, EngineConfig, EngineResult, Item, ItemCategory, Location, ObjectiveLog, Quality,
    RandomEnemyAi, RecordSet, Weather,
};
use std::path::Path;
use tracing_subscriber::EnvFilter;

const DEMO_SEED: u64 = 2024;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run_demo() {
        tracing::error!(error = %e, "demo failed");
        std::process::exit(1);
    }
}

fn run_demo() -> EngineResult<()> {
    let config = EngineConfig::load(Path::new("data/engine.ron"))?;

    // Example 1: Build two teams
    let mut heroes = vec![
        Character::new("Brom", CharacterClass::Warrior).with_guild("Iron Wolves"),
        Character::new("Ayla", CharacterClass::Mage).with_guild("Iron Wolves"),
    ];
    heroes[0].equip(
        Item::new("Fiery weapon", ItemCategory::Weapon, 6.0, 60, Quality::Rare)
            .with_damage_type(DamageType::Fire),
    )?;
    let mut raiders = vec![
        Character::new("Goblin Cutthroat", CharacterClass::Rogue),
        Character::new("Goblin Hexer", CharacterClass::Mage),
        Character::new("Goblin Brute", CharacterClass::Warrior),
    ];

    for character in heroes.iter().chain(raiders.iter()) {
        println!("  {}", character);
    }
    println!();

    // Example 2: Run a seeded battle
    println!("=== Heroes vs Raiders ===");
    let options = BattleOptions {
        difficulty: 2,
        rng_seed: Some(DEMO_SEED),
        weather: Some(Weather::Clear),
        location: Some(Location::Forest),
    };
    let mut hero_ai = FirstTargetAttacker;
    let mut raider_ai = RandomEnemyAi::new();
    let mut objectives = ObjectiveLog::new();
    let result = run_battle(
        &config,
        &mut heroes,
        &mut raiders,
        &options,
        BattleProviders::new(&mut hero_ai, &mut raider_ai),
        &mut objectives,
        BattleRng::from_seed(DEMO_SEED),
    );

    for event in &result.events {
        match event {
            BattleEvent::RoundStarted { round } => println!("-- Round {} --", round),
            BattleEvent::PhaseEntered { .. } => {}
            other => println!("  {:?}", other),
        }
    }
    println!();
    match result.winner {
        Some(side) => println!("Winner: team {:?} after {} rounds", side, result.rounds),
        None => println!("Draw after {} rounds", result.rounds),
    }
    println!("Defeated: {}", result.defeated_count);
    for grant in &result.rewards {
        println!(
            "  {} receives {}, {} experience and {} gold",
            grant.character, grant.loot, grant.experience, grant.gold
        );
    }
    for (character, kind, amount) in &objectives.entries {
        println!("  objective {} +{} for {}", kind, amount, character);
    }
    println!();

    // Example 3: Hand the roster to a persistence layer and back
    let records = RecordSet::capture(&heroes);
    match serde_json::to_string_pretty(&records) {
        Ok(json) => println!("Hero records ({} bytes of JSON)", json.len()),
        Err(e) => println!("Error serializing records: {}", e),
    }
    let restored = records.restore()?;
    println!("Restored {} heroes, roster intact: {}", restored.len(), restored == heroes);
    Ok(())
}
