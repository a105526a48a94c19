use schema::Skill;
use std::path::PathBuf;

/// Main error type for the arena combat engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// A rejected action request
    #[error("Action error: {0}")]
    Action(#[from] ActionError),
    /// Engine configuration could not be loaded or is inconsistent
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    /// A record set could not be turned back into characters
    #[error("Record error: {0}")]
    Record(#[from] RecordError),
}

/// Errors related to action requests. None of these mutate battle state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ActionError {
    /// The skill name does not exist at all
    #[error("Unknown skill: {0}")]
    UnknownSkill(String),
    /// The caster has not learned this skill
    #[error("{caster} does not know {skill}")]
    SkillNotKnown { caster: String, skill: Skill },
    /// Not enough mana to pay the skill cost
    #[error("{caster} needs {required:.1} mana but has {available:.1}")]
    InsufficientMana {
        caster: String,
        required: f64,
        available: f64,
    },
    /// Target index is out of bounds for the living targets offered
    #[error("Invalid target index: {0}")]
    InvalidTargetIndex(usize),
    /// Inventory index is out of bounds
    #[error("Invalid item index: {0}")]
    InvalidItemIndex(usize),
    /// The item cannot be used or equipped this way
    #[error("Item cannot be used: {0}")]
    ItemNotUsable(String),
    /// A skill was requested without any target
    #[error("No targets selected")]
    NoTargets,
    /// Not enough gold for a skill upgrade
    #[error("{character} needs {required} gold but has {available}")]
    InsufficientGold {
        character: String,
        required: u32,
        available: u32,
    },
}

/// Errors raised while loading or validating engine configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
    #[error("invalid config value: {0}")]
    Invalid(String),
}

/// Errors raised while restoring characters from a record set
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RecordError {
    #[error("unsupported record version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("unknown skill name in records: {0}")]
    UnknownSkill(String),
    #[error("row references unknown character: {0}")]
    UnknownOwner(String),
    #[error("duplicate character in records: {0}")]
    DuplicateCharacter(String),
    #[error("item {item} cannot be equipped in the {slot} slot")]
    SlotMismatch { item: String, slot: String },
}

/// Type alias for Results using EngineError
pub type EngineResult<T> = Result<T, EngineError>;

/// Type alias for Results using ActionError
pub type ActionResult<T> = Result<T, ActionError>;

/// Type alias for Results using RecordError
pub type RecordResult<T> = Result<T, RecordError>;
