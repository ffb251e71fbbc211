// src/commands/curate.rs

//! Curate command: apply the update policy and persist the result

use super::load;
use anyhow::Result;
use curator::curation::{DependenciesOrigin, UpdatePolicy, VersionCurator};
use std::path::Path;

/// Curate declared dependencies and write the curation lock
pub fn cmd_curate(
    config_path: &Path,
    policy: Option<UpdatePolicy>,
    origin: Option<DependenciesOrigin>,
    dry_run: bool,
) -> Result<()> {
    let (mut config, catalog) = load(config_path)?;
    if let Some(policy) = policy {
        config.curation.policy = policy;
    }
    if let Some(origin) = origin {
        config.curation.origin = origin;
    }
    config.validate()?;

    if !config.curation.policy.is_active() {
        println!("No update policy configured, declared versions are kept.");
        return Ok(());
    }

    let curator = VersionCurator::new(&catalog, config.curation_settings());
    let outcome = curator.curate(&config.declared_dependencies())?;

    if outcome.report.is_empty() {
        println!(
            "All {} artifacts are current for policy {}.",
            outcome.curated.len(),
            outcome.policy
        );
    } else {
        println!("Version updates ({}):", outcome.report.len());
        for update in outcome.report.iter() {
            println!("  {} {} -> {}", update.key, update.from, update.to);
        }
    }

    if dry_run {
        println!("\nDry run: curation state not written.");
    } else if let Some(path) = curator.persist(&outcome)? {
        println!("\nCuration state written to {}", path.display());
    }
    Ok(())
}
