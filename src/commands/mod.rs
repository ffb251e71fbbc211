// src/commands/mod.rs
//! Command handlers for the curator CLI

mod check;
mod curate;
mod resolve;

pub use check::cmd_check;
pub use curate::cmd_curate;
pub use resolve::cmd_resolve;

use anyhow::{Context, Result};
use curator::config::BuildConfig;
use curator::repository::CatalogRepository;
use std::path::Path;

/// Load a build configuration and the catalog it points to
fn load(config_path: &Path) -> Result<(BuildConfig, CatalogRepository)> {
    let config = BuildConfig::load(config_path)
        .with_context(|| format!("Failed to load build config {}", config_path.display()))?;
    let catalog_path = config.catalog_path();
    let catalog = CatalogRepository::from_file(&catalog_path)
        .with_context(|| format!("Failed to load catalog {}", catalog_path.display()))?;
    Ok((config, catalog))
}
