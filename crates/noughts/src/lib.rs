//! Noughts - terminal tic-tac-toe.
//!
//! Wraps the [`noughts_core`] engine with everything needed to play it:
//!
//! - **Config**: TOML file plus command-line overrides
//! - **Scheduler**: delayed delivery of the computer's moves
//! - **TUI**: ratatui rendering and keyboard input

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod logging;
pub mod scheduler;
pub mod tui;

pub use cli::{Cli, Command, SettingsArgs};
pub use config::{ConfigError, DEFAULT_CONFIG_PATH, GameConfig};
pub use scheduler::{AppEvent, MoveScheduler};
pub use tui::{Action, App, run_tui};
