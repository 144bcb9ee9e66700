use crate::battle::state::BattlePhase;
use schema::{ItemId, SpeciesId, ZoneId};
use thiserror::Error;

/// Main error type for the Monster Adventure game core
#[derive(Debug, Error)]
pub enum GameError {
    /// Error related to registry lookups
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
    /// Error related to battle actions
    #[error("Battle error: {0}")]
    Battle(#[from] BattleError),
    /// Error related to profile, team or inventory bookkeeping
    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
    /// Error related to saving, loading or configuration files
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

/// Errors related to the static species/item/zone tables
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Species not found: {0}")]
    SpeciesNotFound(SpeciesId),
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),
    #[error("Zone not found: {0}")]
    ZoneNotFound(ZoneId),
    /// A text key that does not name any species, item or zone
    #[error("Unknown {kind} '{key}'")]
    UnknownKey { kind: &'static str, key: String },
    /// Embedded data failed to parse or is inconsistent
    #[error("Malformed registry data: {0}")]
    MalformedData(String),
}

/// Errors raised by the battle engine when a caller misuses it
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    /// The action is not legal in the current phase
    #[error("'{action}' is not allowed during {phase}")]
    InvalidTurn {
        action: &'static str,
        phase: BattlePhase,
    },
    #[error("No {0} left in the inventory")]
    InsufficientInventory(ItemId),
    /// Capture items only work once the enemy is weakened enough
    #[error("The wild monster is not weak enough to capture")]
    CaptureNotAllowed,
    #[error("The team has no monster to send out")]
    EmptyTeam,
    #[error("The battle has not reached an outcome yet")]
    BattleNotResolved,
}

/// Errors related to profile, team and inventory mutations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("Trainer name must not be empty")]
    InvalidPlayerName,
    #[error("{0} is not one of the available starters")]
    InvalidStarter(SpeciesId),
    #[error("Not enough money: need {needed}, have {available}")]
    InsufficientFunds { needed: u32, available: u32 },
    #[error("Quantity must be at least 1")]
    InvalidQuantity,
    #[error("The team already holds {capacity} monsters")]
    TeamFull { capacity: usize },
    #[error("No team member at position {0}")]
    InvalidTeamIndex(usize),
}

/// Errors related to persistence and configuration files
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Binary snapshot error: {0}")]
    Binary(#[from] postcard::Error),
    #[error("Config parse error: {0}")]
    Config(#[from] ron::error::SpannedError),
    /// A save parsed but breaks a game rule
    #[error("Invalid save: {0}")]
    InvalidSave(String),
    /// A config parsed but holds out-of-range values
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Could not determine a save directory")]
    NoSaveDirectory,
}

/// Type alias for Results using GameError
pub type GameResult<T> = Result<T, GameError>;

/// Type alias for Results using RegistryError
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Type alias for Results using BattleError
pub type BattleResult<T> = Result<T, BattleError>;

/// Type alias for Results using LedgerError
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Type alias for Results using SnapshotError
pub type SnapshotResult<T> = Result<T, SnapshotError>;
