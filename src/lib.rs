//! rClockfill library root.
//! Exposes the clocking scheduler core, its stores, and the CLI front end.

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use errors::AppResult;
use std::path::{Path, PathBuf};

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config, config_path: &Path) -> AppResult<()> {
    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli, cfg, config_path),
        Commands::Register { .. } => cli::commands::register::handle(&cli.command, cfg),
        Commands::Plan { .. } => cli::commands::plan::handle(&cli.command),
        Commands::Clock { .. } => cli::commands::clock::handle(&cli.command, cfg),
        Commands::FillDay { .. } => cli::commands::fill::handle_day(&cli.command, cfg),
        Commands::FillRange { .. } => cli::commands::fill::handle_range(&cli.command, cfg),
        Commands::Pending => cli::commands::pending::handle(cfg),
        Commands::Cutover => cli::commands::cutover::handle(cfg),
        Commands::Daemon => cli::commands::daemon::handle(cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
    }
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(Config::config_file);

    let mut cfg = Config::load_from(&config_path)?;

    if let Some(custom_db) = &cli.db {
        cfg.database = custom_db.clone();
    }

    dispatch(&cli, &cfg, &config_path)
}
