// Monster Adventure Schema - Shared type definitions
// This crate contains the closed id enums and the immutable definition
// structs shared between the registry data files and the battle engine.

// Re-export the main types
pub use creature_types::*;
pub use item_data::*;
pub use species_data::*;
pub use zone_data::*;

pub mod creature_types;
pub mod item_data;
pub mod species_data;
pub mod zone_data;
