// src/cli.rs
//! CLI definitions for curator
//!
//! Command implementations live in the `commands` module.

use clap::{Parser, Subcommand};
use curator::curation::{DependenciesOrigin, UpdatePolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "curator")]
#[command(version)]
#[command(about = "Dependency curation and conditional extension resolution", long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the application classpath, activating conditional dependencies
    Resolve {
        /// Build configuration file
        #[arg(short, long, default_value = "build.toml")]
        config: PathBuf,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Write runtime.classpath and deployment.classpath
        #[arg(long)]
        manifest: bool,
    },

    /// Apply the update policy to declared dependencies
    Curate {
        /// Build configuration file
        #[arg(short, long, default_value = "build.toml")]
        config: PathBuf,

        /// Override the configured update policy
        #[arg(long)]
        policy: Option<UpdatePolicy>,

        /// Override where curation starts from
        #[arg(long)]
        origin: Option<DependenciesOrigin>,

        /// Show updates without writing curation state
        #[arg(long)]
        dry_run: bool,
    },

    /// Validate the configuration and the artifact catalog
    Check {
        /// Build configuration file
        #[arg(short, long, default_value = "build.toml")]
        config: PathBuf,
    },
}
