use crate::SpeciesId;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[strum(serialize_all = "camelCase", ascii_case_insensitive)]
pub enum ZoneId {
    Forest,
    Lake,
    Mountain,
}

/// An explorable area. Wild encounters are drawn from `monsters` at
/// `level` plus a small random spread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneDefinition {
    pub id: ZoneId,
    pub name: String,
    pub monsters: Vec<SpeciesId>,
    pub level: u32,
}

impl ZoneDefinition {
    pub fn can_spawn(&self, species: SpeciesId) -> bool {
        self.monsters.contains(&species)
    }
}
