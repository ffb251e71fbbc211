// src/creator/phases.rs

//! Built-in build phases
//!
//! - [`CurationPhase`] curates declared versions and pushes a
//!   [`CurationOutcome`]
//! - [`ResolutionPhase`] resolves the (curated) declarations, activates
//!   conditional dependencies and pushes an [`ApplicationModel`]
//! - [`ClasspathManifestPhase`] writes the runtime and deployment classpaths
//!   of the model to disk and pushes a [`ClasspathManifest`]

use super::{AppCreationContext, AppCreationPhase};
use crate::artifact::{ArtifactCoords, Dependency};
use crate::conditional::{ConditionalDependencyEnabler, ResolutionSettings};
use crate::curation::{CurationOutcome, CurationSettings, VersionCurator};
use crate::error::Result;
use crate::extension::ActivatedExtension;
use crate::resolver::ResolvedArtifactSet;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use tracing::info;

/// File name of the runtime classpath listing
pub const RUNTIME_CLASSPATH_FILE: &str = "runtime.classpath";

/// File name of the deployment classpath listing
pub const DEPLOYMENT_CLASSPATH_FILE: &str = "deployment.classpath";

/// Curates declared dependencies
pub struct CurationPhase {
    declared: Vec<Dependency>,
    settings: CurationSettings,
    persist: bool,
}

impl CurationPhase {
    pub fn new(declared: Vec<Dependency>, settings: CurationSettings) -> Self {
        Self {
            declared,
            settings,
            persist: true,
        }
    }

    /// Skip writing curation state
    pub fn dry_run(mut self) -> Self {
        self.persist = false;
        self
    }
}

impl AppCreationPhase for CurationPhase {
    fn name(&self) -> &str {
        "curation"
    }

    fn process(&mut self, ctx: &mut AppCreationContext<'_>) -> Result<()> {
        let curator = VersionCurator::new(ctx.repository(), self.settings.clone());
        let outcome = curator.curate(&self.declared)?;
        if self.persist {
            curator.persist(&outcome)?;
        }
        ctx.push_outcome(outcome)
    }
}

/// The resolved application
#[derive(Debug, Clone)]
pub struct ApplicationModel {
    /// Runtime and deployment artifacts
    pub resolved: ResolvedArtifactSet,
    /// Active extensions, base extensions first
    pub extensions: Vec<ActivatedExtension>,
    /// Activated conditional dependencies
    pub activated: Vec<Dependency>,
    /// Conditional activation rounds
    pub rounds: usize,
}

impl ApplicationModel {
    pub fn runtime_classpath(&self) -> Vec<ArtifactCoords> {
        self.resolved.runtime().map(|d| d.coords.clone()).collect()
    }

    pub fn deployment_classpath(&self) -> Vec<ArtifactCoords> {
        self.resolved.deployment().map(|d| d.coords.clone()).collect()
    }
}

/// Resolves declarations into an [`ApplicationModel`]
///
/// Uses the curated dependencies when a [`CurationOutcome`] was pushed
/// earlier, the declared ones otherwise.
pub struct ResolutionPhase {
    declared: Vec<Dependency>,
    settings: ResolutionSettings,
}

impl ResolutionPhase {
    pub fn new(declared: Vec<Dependency>, settings: ResolutionSettings) -> Self {
        Self { declared, settings }
    }
}

impl AppCreationPhase for ResolutionPhase {
    fn name(&self) -> &str {
        "resolution"
    }

    fn process(&mut self, ctx: &mut AppCreationContext<'_>) -> Result<()> {
        let (dependencies, curated) = if ctx.has_outcome::<CurationOutcome>() {
            let outcome = ctx.outcome::<CurationOutcome>()?;
            (outcome.dependencies.clone(), outcome.curated.clone())
        } else {
            (self.declared.clone(), HashMap::new())
        };

        let enabler =
            ConditionalDependencyEnabler::from_settings(ctx.repository(), &self.settings, curated);
        let enabled = enabler.enable(&dependencies)?;
        info!(
            "Resolved {} runtime artifacts and {} extensions",
            enabled.resolved.runtime().count(),
            enabled.extensions.len()
        );

        ctx.push_outcome(ApplicationModel {
            resolved: enabled.resolved,
            extensions: enabled.extensions,
            activated: enabled.activated,
            rounds: enabled.rounds,
        })
    }
}

/// Classpath files written for an [`ApplicationModel`]
///
/// Without an output directory the files live in the work directory. An
/// owned work directory is removed when [`AppCreator::run`] returns, so the
/// paths then outlive the files; the listings stay available in `runtime`
/// and `deployment`.
///
/// [`AppCreator::run`]: super::AppCreator::run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClasspathManifest {
    pub runtime_path: PathBuf,
    pub deployment_path: PathBuf,
    pub runtime: Vec<ArtifactCoords>,
    pub deployment: Vec<ArtifactCoords>,
}

/// Writes classpath listings, one coordinate per line
///
/// Files go to the configured output directory, or to a `classpath`
/// directory inside the work directory. Set an output directory, or give
/// the creator a work directory of its own, to keep the files after the
/// invocation.
#[derive(Default)]
pub struct ClasspathManifestPhase {
    output_dir: Option<PathBuf>,
}

impl ClasspathManifestPhase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }
}

impl AppCreationPhase for ClasspathManifestPhase {
    fn name(&self) -> &str {
        "classpath-manifest"
    }

    fn process(&mut self, ctx: &mut AppCreationContext<'_>) -> Result<()> {
        let (runtime, deployment) = {
            let model = ctx.outcome::<ApplicationModel>()?;
            (model.runtime_classpath(), model.deployment_classpath())
        };

        let dir = match &self.output_dir {
            Some(dir) => {
                fs::create_dir_all(dir)?;
                dir.clone()
            }
            None => ctx.create_work_dir("classpath")?,
        };
        let runtime_path = dir.join(RUNTIME_CLASSPATH_FILE);
        let deployment_path = dir.join(DEPLOYMENT_CLASSPATH_FILE);
        fs::write(&runtime_path, listing(&runtime))?;
        fs::write(&deployment_path, listing(&deployment))?;
        info!("Wrote classpath manifests to {}", dir.display());

        ctx.push_outcome(ClasspathManifest {
            runtime_path,
            deployment_path,
            runtime,
            deployment,
        })
    }
}

fn listing(entries: &[ArtifactCoords]) -> String {
    entries.iter().map(|c| format!("{c}\n")).collect()
}
