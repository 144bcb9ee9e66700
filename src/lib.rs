// In: src/lib.rs

//! Monster Adventure Game Core
//!
//! Species, item and zone registries, a turn-based wild battle engine with
//! item-driven capture, and the ledger that folds battle results back into a
//! saved game.

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod creature;
pub mod errors;
pub mod interface;
pub mod player;
pub mod progression;
pub mod registry;
pub mod session;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, ElementType, ItemDefinition, ItemEffect, ItemId, SpeciesId, SpeciesTemplate,
    ZoneDefinition, ZoneId,
};

// --- From this crate's modules (`src/`) ---

// Core battle engine functions and state.
pub use battle::engine::{attack, enemy_turn, finish, start_battle, take_turn, use_item};
pub use battle::state::{
    BattleEvent, BattleOutcome, BattlePhase, BattleReport, BattleState, EventBus, PlayerAction,
    TurnRng,
};

// Runtime game types.
pub use config::{GameConfig, HpPersistence};
pub use creature::CreatureInst;
pub use player::{Inventory, PlayerProfile, Team};
pub use progression::{apply_battle_report, buy_item, CaptureFate, LedgerReport};
pub use session::{GameState, SaveManager};

// Primary data access functions.
pub use registry::{get_item_data, get_species_data, get_zone_data};

// Crate-specific error and result types.
pub use errors::{
    BattleError, BattleResult, GameError, GameResult, LedgerError, LedgerResult, RegistryError,
    RegistryResult, SnapshotError, SnapshotResult,
};
