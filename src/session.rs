//! The whole persistent game: profile, team, inventory and where the player is.

use crate::config::GameConfig;
use crate::creature::CreatureInst;
use crate::errors::{GameResult, LedgerError, SnapshotError, SnapshotResult};
use crate::player::{Inventory, PlayerProfile, Team};
use directories::ProjectDirs;
use schema::{SpeciesId, ZoneId};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const SAVE_FILE_NAME: &str = "save.json";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GameState {
    pub player: PlayerProfile,
    pub team: Team,
    pub inventory: Inventory,
    pub current_zone: Option<ZoneId>,
    pub started: bool,
}

impl GameState {
    /// Start a fresh game with one starter at full HP.
    pub fn new_game(name: &str, starter: SpeciesId, config: &GameConfig) -> GameResult<Self> {
        let player = PlayerProfile::new(name, config.starting_money)?;
        if !config.starters.contains(&starter) {
            return Err(LedgerError::InvalidStarter(starter).into());
        }

        let mut team = Team::with_capacity(config.team_capacity);
        team.add(CreatureInst::from_species(starter, config.starter_level)?)?;

        info!(player = %player.name, %starter, "new game");
        Ok(Self {
            player,
            team,
            inventory: Inventory::from(config.starting_inventory.clone()),
            current_zone: None,
            started: true,
        })
    }

    pub fn to_json(&self) -> SnapshotResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> SnapshotResult<Self> {
        let state: Self = serde_json::from_str(text)?;
        state.validate()?;
        Ok(state)
    }

    /// Compact binary snapshot.
    pub fn to_bytes(&self) -> SnapshotResult<Vec<u8>> {
        Ok(postcard::to_allocvec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> SnapshotResult<Self> {
        let state: Self = postcard::from_bytes(bytes)?;
        state.validate()?;
        Ok(state)
    }

    /// Reject snapshots that parse but break the profile or team rules.
    pub fn validate(&self) -> SnapshotResult<()> {
        self.player
            .validate()
            .and_then(|()| self.team.validate())
            .map_err(SnapshotError::InvalidSave)
    }
}

/// Reads and writes a single JSON save file.
pub struct SaveManager {
    save_path: PathBuf,
}

impl SaveManager {
    pub fn new(save_path: impl Into<PathBuf>) -> Self {
        Self {
            save_path: save_path.into(),
        }
    }

    /// The save file under the platform data directory.
    pub fn default_location() -> SnapshotResult<Self> {
        let project_dirs = ProjectDirs::from("", "", "monster-adventure")
            .ok_or(SnapshotError::NoSaveDirectory)?;
        Ok(Self::new(project_dirs.data_dir().join(SAVE_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.save_path
    }

    pub fn save(&self, state: &GameState) -> SnapshotResult<()> {
        if let Some(dir) = self.save_path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.save_path, state.to_json()?)?;
        info!(path = %self.save_path.display(), "game saved");
        Ok(())
    }

    pub fn load(&self) -> SnapshotResult<GameState> {
        let text = fs::read_to_string(&self.save_path)?;
        let state = GameState::from_json(&text)?;
        info!(path = %self.save_path.display(), "game loaded");
        Ok(state)
    }

    pub fn exists(&self) -> bool {
        self.save_path.exists()
    }

    /// Remove the save file. A missing file is not an error.
    pub fn delete(&self) -> SnapshotResult<()> {
        match fs::remove_file(&self.save_path) {
            Ok(()) => {
                info!(path = %self.save_path.display(), "save deleted");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
