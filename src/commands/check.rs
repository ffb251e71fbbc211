// src/commands/check.rs

//! Check command: validate configuration and catalog

use super::load;
use anyhow::{bail, Result};
use curator::repository::ArtifactRepository;
use curator::resolver::detect_direct_conflicts;
use std::collections::HashMap;
use std::path::Path;

/// Report every problem that would make a build fail
pub fn cmd_check(config_path: &Path) -> Result<()> {
    let (config, catalog) = load(config_path)?;
    let declared = config.declared_dependencies();

    let mut problems = catalog.validate();
    for dep in &declared {
        if !catalog.contains(&dep.coords) {
            problems.push(format!("declared dependency {} is not in the catalog", dep.coords));
        }
    }
    if !config.curation.policy.is_active() {
        for conflict in detect_direct_conflicts(&declared, &HashMap::new()) {
            problems.push(conflict.to_string());
        }
    }
    for (key, version) in &config.platform.constraints {
        if !catalog.available_versions(key).contains(version) {
            problems.push(format!("platform constraint {}:{} is not in the catalog", key, version));
        }
    }

    if problems.is_empty() {
        println!(
            "OK: {} declared dependencies, {} catalog artifacts, {} extensions",
            declared.len(),
            catalog.len(),
            catalog.extension_count()
        );
        return Ok(());
    }

    println!("Found {} problems:", problems.len());
    for problem in &problems {
        println!("  - {}", problem);
    }
    bail!("{} problems found in {}", problems.len(), config_path.display())
}
