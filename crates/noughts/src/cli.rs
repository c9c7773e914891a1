//! Command-line interface for noughts.

use clap::{Args, Parser, Subcommand};
use noughts_core::{Difficulty, Mode};
use std::path::PathBuf;

/// Noughts - tic-tac-toe in the terminal
#[derive(Parser, Debug)]
#[command(name = "noughts")]
#[command(about = "Tic-tac-toe against a friend or the computer", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play in the terminal UI
    Play(SettingsArgs),

    /// Print the effective configuration as TOML
    Config(SettingsArgs),
}

impl Default for Command {
    fn default() -> Self {
        Command::Play(SettingsArgs::default())
    }
}

/// Settings shared by every command; each overrides the config file.
#[derive(Args, Debug, Clone, Default)]
pub struct SettingsArgs {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Opponent mode (human-vs-human / pvp, human-vs-automated / pvc)
    #[arg(short, long)]
    pub mode: Option<Mode>,

    /// Computer strength (easy, medium, hard)
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Seed for the computer's random choices
    #[arg(long)]
    pub seed: Option<u64>,

    /// Pause before the computer moves, in milliseconds
    #[arg(long)]
    pub delay_ms: Option<u64>,

    /// File to write logs to
    #[arg(long)]
    pub log_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_defaults_to_play() {
        let cli = Cli::try_parse_from(["noughts"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(cli.command.unwrap_or_default(), Command::Play(_)));
    }

    #[test]
    fn test_play_parses_overrides() {
        let cli = Cli::try_parse_from([
            "noughts",
            "play",
            "--mode",
            "pvc",
            "--difficulty",
            "hard",
            "--seed",
            "7",
            "--delay-ms",
            "0",
        ])
        .unwrap();
        let Some(Command::Play(args)) = cli.command else {
            panic!("expected play");
        };
        assert_eq!(args.mode, Some(Mode::HumanVsAutomated));
        assert_eq!(args.difficulty, Some(Difficulty::Hard));
        assert_eq!(args.seed, Some(7));
        assert_eq!(args.delay_ms, Some(0));
    }

    #[test]
    fn test_rejects_unknown_difficulty() {
        assert!(Cli::try_parse_from(["noughts", "play", "--difficulty", "brutal"]).is_err());
    }
}
