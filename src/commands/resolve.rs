// src/commands/resolve.rs

//! Resolve command: curation, resolution and conditional activation

use super::load;
use anyhow::Result;
use curator::creator::{
    AppCreator, ApplicationModel, ClasspathManifest, ClasspathManifestPhase, CurationPhase,
    ResolutionPhase,
};
use curator::curation::{CurationOutcome, UpdateReport};
use curator::resolver::ResolvedDependency;
use serde::Serialize;
use std::path::Path;
use tracing::info;

#[derive(Serialize)]
struct ExtensionEntry {
    extension: String,
    deployment: String,
    conditional: bool,
}

#[derive(Serialize)]
struct ResolveReport<'a> {
    runtime: Vec<&'a ResolvedDependency>,
    deployment: Vec<&'a ResolvedDependency>,
    extensions: Vec<ExtensionEntry>,
    activated: Vec<String>,
    rounds: usize,
    updates: &'a UpdateReport,
}

/// Resolve the configured application and print its classpaths
pub fn cmd_resolve(config_path: &Path, json: bool, manifest: bool) -> Result<()> {
    let (config, catalog) = load(config_path)?;
    let declared = config.declared_dependencies();
    info!("Resolving {} declared dependencies", declared.len());

    let mut creator = AppCreator::new(&catalog);
    if let Some(dir) = config.work_dir() {
        creator = creator.with_work_dir(dir);
    }
    creator = creator
        .add_phase(CurationPhase::new(declared.clone(), config.curation_settings()).dry_run())
        .add_phase(ResolutionPhase::new(declared, config.resolution_settings()));
    if manifest {
        creator = creator
            .add_phase(ClasspathManifestPhase::new().with_output_dir(config.manifest_dir()));
    }
    let outcomes = creator.run()?;

    let model = outcomes.get::<ApplicationModel>()?;
    let curation = outcomes.get::<CurationOutcome>()?;
    let report = ResolveReport {
        runtime: model.resolved.runtime().collect(),
        deployment: model
            .resolved
            .deployment()
            .filter(|d| !d.is_runtime())
            .collect(),
        extensions: model
            .extensions
            .iter()
            .map(|e| ExtensionEntry {
                extension: e.extension.extension_id.to_string(),
                deployment: e.extension.deployment_module.to_string(),
                conditional: e.conditionally_activated,
            })
            .collect(),
        activated: model.activated.iter().map(|d| d.coords.to_string()).collect(),
        rounds: model.rounds,
        updates: &curation.report,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if let Ok(written) = outcomes.get::<ClasspathManifest>() {
        println!();
        println!("Runtime classpath written to {}", written.runtime_path.display());
        println!("Deployment classpath written to {}", written.deployment_path.display());
    }
    Ok(())
}

fn print_report(report: &ResolveReport<'_>) {
    println!("Runtime classpath ({}):", report.runtime.len());
    for dep in &report.runtime {
        println!("  {} [{}]", dep.coords, dep.flags);
    }

    println!("\nDeployment-only artifacts ({}):", report.deployment.len());
    for dep in &report.deployment {
        println!("  {}", dep.coords);
    }

    println!("\nExtensions ({}):", report.extensions.len());
    for ext in &report.extensions {
        if ext.conditional {
            println!("  {} (conditional)", ext.extension);
        } else {
            println!("  {}", ext.extension);
        }
    }

    if !report.activated.is_empty() {
        println!(
            "\nActivated conditional dependencies ({} in {} rounds):",
            report.activated.len(),
            report.rounds
        );
        for coords in &report.activated {
            println!("  {}", coords);
        }
    }

    if !report.updates.is_empty() {
        println!("\nVersion updates ({}):", report.updates.len());
        for update in report.updates.iter() {
            println!("  {} {} -> {}", update.key, update.from, update.to);
        }
    }
}
