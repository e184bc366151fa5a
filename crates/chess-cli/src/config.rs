//! Configuration file loading for the chess host.
//!
//! Settings come from a TOML file (`chess.toml` by default). A missing file
//! means defaults; command-line flags are applied on top by `main`.

use chess_core::{LayoutError, STANDARD_SIZE, STARTING_LAYOUT};
use chess_engine::Game;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading configuration or building a game from
/// it.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The configured start layout does not fit the board.
    #[error("Invalid start layout: {0}")]
    LayoutError(#[from] LayoutError),
}

/// Board and time settings for new games.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GameConfig {
    /// Files and rows of the square board. Defaults to 8.
    #[serde(default = "default_board_size")]
    pub board_size: u8,
    /// Layout text every new game starts from.
    #[serde(default = "default_start_layout")]
    pub start_layout: String,
    /// Time per side in seconds. Defaults to 600.
    #[serde(default = "default_max_time_secs")]
    pub max_time_secs: u64,
}

fn default_board_size() -> u8 {
    STANDARD_SIZE
}

fn default_start_layout() -> String {
    STARTING_LAYOUT.to_string()
}

fn default_max_time_secs() -> u64 {
    600
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            board_size: default_board_size(),
            start_layout: default_start_layout(),
            max_time_secs: default_max_time_secs(),
        }
    }
}

/// Timekeeper settings.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClockConfig {
    /// How often the active clock is decremented, in milliseconds.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
}

fn default_tick_ms() -> u64 {
    100
}

impl Default for ClockConfig {
    fn default() -> Self {
        ClockConfig {
            tick_ms: default_tick_ms(),
        }
    }
}

/// Complete host configuration.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub clock: ClockConfig,
}

impl CliConfig {
    /// Loads configuration from `path`, or defaults if the file is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be
    /// read, or [`ConfigError::ParseError`] if it is not valid TOML.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            tracing::debug!("No config at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    pub fn max_time(&self) -> Duration {
        Duration::from_secs(self.game.max_time_secs)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.clock.tick_ms.max(1))
    }

    /// Creates an idle game on the configured board.
    pub fn build_game(&self) -> Result<Game, ConfigError> {
        Ok(Game::from_layout(
            &self.game.start_layout,
            self.game.board_size,
        )?)
    }
}
