//! Tunable game rules, loaded from RON.

use crate::errors::{SnapshotError, SnapshotResult};
use crate::player::MAX_TEAM_CAPACITY;
use schema::{ItemId, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Environment variable the binaries read to find a config file.
pub const CONFIG_ENV_VAR: &str = "MONSTER_ADVENTURE_CONFIG";

/// What happens to the active creature's HP once a battle ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HpPersistence {
    /// Write the working copy's HP back to the team after a victory or capture.
    CommitOnExit,
    /// Battle damage and healing never leave the battle.
    SessionLocal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_money: u32,
    pub starting_inventory: BTreeMap<ItemId, u32>,
    pub starters: Vec<SpeciesId>,
    pub starter_level: u32,
    pub team_capacity: usize,
    /// Fraction of max HP the enemy must drop below before capture items work.
    pub capture_threshold: f64,
    /// Wild levels are the zone level plus 0..=spread.
    pub enemy_level_spread: u32,
    /// Pause the presentation layer inserts before narrating the enemy's reply.
    pub turn_delay_ms: u64,
    pub hp_persistence: HpPersistence,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_money: 500,
            starting_inventory: BTreeMap::from([
                (ItemId::Potion, 3),
                (ItemId::SuperPotion, 1),
                (ItemId::MonsterBall, 5),
            ]),
            starters: vec![SpeciesId::Flamby, SpeciesId::Aqualis, SpeciesId::Terrak],
            starter_level: 5,
            team_capacity: 6,
            capture_threshold: 0.3,
            enemy_level_spread: 2,
            turn_delay_ms: 1500,
            hp_persistence: HpPersistence::CommitOnExit,
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> SnapshotResult<Self> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject rules the engine cannot honor.
    pub fn validate(&self) -> SnapshotResult<()> {
        let invalid =
            |message: String| -> SnapshotResult<()> { Err(SnapshotError::InvalidConfig(message)) };

        if self.team_capacity == 0 || self.team_capacity > MAX_TEAM_CAPACITY {
            return invalid(format!(
                "team_capacity {} is outside 1..={}",
                self.team_capacity, MAX_TEAM_CAPACITY
            ));
        }
        if !(self.capture_threshold > 0.0 && self.capture_threshold <= 1.0) {
            return invalid(format!(
                "capture_threshold {} is outside (0, 1]",
                self.capture_threshold
            ));
        }
        if self.starter_level == 0 {
            return invalid("starter_level must be at least 1".to_string());
        }
        if self.starters.is_empty() {
            return invalid("starters must name at least one species".to_string());
        }
        Ok(())
    }

    pub fn load(path: &Path) -> SnapshotResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_ron_str(&text)?;
        tracing::info!(path = %path.display(), "loaded game config");
        Ok(config)
    }

    /// Load from the file named by `MONSTER_ADVENTURE_CONFIG`, or fall back to
    /// the defaults when the variable is unset.
    pub fn from_env() -> SnapshotResult<Self> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }
}
