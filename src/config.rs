//! Match configuration.
//!
//! A `MatchConfig` describes the board and players of a match plus the
//! search budget used for AI moves. It loads from JSON; missing fields take
//! their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::board::{GameError, GameMode};
use crate::game::Game;
use crate::search::DEFAULT_MOVE_BUDGET;

/// Errors that can occur while loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid match settings: {0}")]
    Game(#[from] GameError),
}

/// Board and player settings for one match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    pub players: usize,
    pub width: usize,
    pub height: usize,
    pub mode: GameMode,
    /// Search budget for AI moves.
    pub move_budget: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            players: 2,
            width: 6,
            height: 6,
            mode: GameMode::Square,
            move_budget: DEFAULT_MOVE_BUDGET,
        }
    }
}

impl MatchConfig {
    /// Parses a configuration from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Reads and parses a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Returns a copy of `self` with the fields present in the JSON object
    /// `s` replaced. Absent fields keep their current values.
    pub fn overlay_json_str(&self, s: &str) -> Result<Self, ConfigError> {
        let patch: serde_json::Map<String, serde_json::Value> = serde_json::from_str(s)?;
        let mut merged = serde_json::to_value(self)?;
        if let Some(fields) = merged.as_object_mut() {
            fields.extend(patch);
        }
        Ok(serde_json::from_value(merged)?)
    }

    /// Reads a JSON file and overlays it on `self`.
    pub fn overlay_file(&self, path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        self.overlay_json_str(&text)
    }

    /// Creates the starting position described by this configuration.
    pub fn new_game(&self) -> Result<Game, GameError> {
        Game::new(self.players, self.width, self.height, self.mode)
    }

    /// Checks that a game can be built from these settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.new_game()?;
        Ok(())
    }
}
