//! Noughts - tic-tac-toe in the terminal.

use anyhow::{Context, Result};
use clap::Parser;
use noughts::logging::{init_file_logging, init_stderr_logging};
use noughts::{Cli, Command, GameConfig, run_tui};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command.unwrap_or_default() {
        Command::Play(args) => {
            let config = GameConfig::load(args.config.as_deref())
                .context("Failed to load configuration")?
                .with_overrides(&args);
            init_file_logging(config.log_file(), config.log_level())?;
            run_tui(config).await
        }
        Command::Config(args) => {
            init_stderr_logging("warn");
            let config = GameConfig::load(args.config.as_deref())
                .context("Failed to load configuration")?
                .with_overrides(&args);
            info!("Printing effective configuration");
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
