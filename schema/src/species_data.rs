use crate::ElementType;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Every species the registry knows about.
///
/// The string form (`"flamby"`, `"shadowfang"`) is the lookup key used by
/// text surfaces; parsing ignores ASCII case.
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
pub enum SpeciesId {
    Flamby,
    Aqualis,
    Terrak,
    Voltix,
    Glaceon,
    Shadowfang,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u32,
    pub attack: u32,
    pub defense: u32,
    pub speed: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesTemplate {
    pub id: SpeciesId,
    pub name: String,
    pub element: ElementType,
    pub base_stats: BaseStats,
    pub glyph: String,
}
