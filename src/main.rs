// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Some(Commands::Resolve {
            config,
            json,
            manifest,
        }) => commands::cmd_resolve(&config, json, manifest),

        Some(Commands::Curate {
            config,
            policy,
            origin,
            dry_run,
        }) => commands::cmd_curate(&config, policy, origin, dry_run),

        Some(Commands::Check { config }) => commands::cmd_check(&config),

        None => {
            Cli::command().print_help()?;
            println!();
            Ok(())
        }
    }
}
