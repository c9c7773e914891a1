//! Game configuration loaded from TOML and overridden from the command line.

use crate::cli::SettingsArgs;
use derive_getters::Getters;
use derive_more::{Display, Error};
use noughts_core::{Difficulty, Mode, Session};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Config file read when no path is given, if it exists.
pub const DEFAULT_CONFIG_PATH: &str = "noughts.toml";

/// Settings for a playing session.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Opponent mode at startup.
    mode: Mode,

    /// Opponent tier at startup.
    difficulty: Difficulty,

    /// Pause before the computer moves, in milliseconds.
    think_delay_ms: u64,

    /// Fixed seed for the computer's random choices.
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,

    /// File that receives log output while the TUI owns the terminal.
    log_file: PathBuf,

    /// Log filter used when `RUST_LOG` is unset.
    log_level: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            mode: Mode::HumanVsHuman,
            difficulty: Difficulty::Medium,
            think_delay_ms: 800,
            seed: None,
            log_file: PathBuf::from("noughts.log"),
            log_level: "info".to_string(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(mode = %config.mode, difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }

    /// Loads the explicit config file, or [`DEFAULT_CONFIG_PATH`] if present,
    /// or falls back to defaults.
    ///
    /// A missing explicit file is an error; a missing default file is not.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => Self::from_file(DEFAULT_CONFIG_PATH),
            None => {
                debug!("No config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Applies command-line overrides on top of file values.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, args: &SettingsArgs) -> Self {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(difficulty) = args.difficulty {
            self.difficulty = difficulty;
        }
        if let Some(delay) = args.delay_ms {
            self.think_delay_ms = delay;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if let Some(log_file) = &args.log_file {
            self.log_file = log_file.clone();
        }
        self
    }

    /// Pause before the computer moves.
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    /// Builds a session from these settings.
    #[instrument(skip(self))]
    pub fn build_session(&self) -> Session {
        let session = match self.seed {
            Some(seed) => Session::seeded(self.mode, self.difficulty, seed),
            None => Session::new(self.mode, self.difficulty),
        };
        session.with_think_delay(self.think_delay())
    }

    /// Renders the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string(self)
            .map_err(|e| ConfigError::new(format!("Failed to serialize config: {}", e)))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
