// src/creator/mod.rs

//! Ordered build phases
//!
//! An [`AppCreator`] runs its phases strictly in registration order against
//! one [`AppCreationContext`]. Phases hand results to later phases through
//! the context's write-once [`PhaseOutcomeRegistry`]. The first failing
//! phase aborts the invocation; the owned work directory is still removed.

mod context;
mod phases;
mod registry;

pub use context::{AppCreationContext, WorkDir, WORK_DIR_PREFIX};
pub use phases::{
    ApplicationModel, ClasspathManifest, ClasspathManifestPhase, CurationPhase, ResolutionPhase,
    DEPLOYMENT_CLASSPATH_FILE, RUNTIME_CLASSPATH_FILE,
};
pub use registry::PhaseOutcomeRegistry;

use crate::error::{Error, Result};
use crate::repository::ArtifactRepository;
use std::path::PathBuf;
use tracing::{debug, info};

/// A single build phase
pub trait AppCreationPhase {
    /// Name used in logs and errors
    fn name(&self) -> &str;

    /// Run the phase, reading and pushing outcomes through `ctx`
    fn process(&mut self, ctx: &mut AppCreationContext<'_>) -> Result<()>;
}

/// Runs build phases in order
pub struct AppCreator<'a> {
    repository: &'a dyn ArtifactRepository,
    work_dir: Option<PathBuf>,
    phases: Vec<Box<dyn AppCreationPhase + 'a>>,
}

impl<'a> AppCreator<'a> {
    pub fn new(repository: &'a dyn ArtifactRepository) -> Self {
        Self {
            repository,
            work_dir: None,
            phases: Vec::new(),
        }
    }

    /// Use a caller-supplied work directory; it is never deleted
    pub fn with_work_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(path.into());
        self
    }

    pub fn add_phase(mut self, phase: impl AppCreationPhase + 'a) -> Self {
        self.phases.push(Box::new(phase));
        self
    }

    pub fn phase_count(&self) -> usize {
        self.phases.len()
    }

    /// Run every phase and return their outcomes
    pub fn run(mut self) -> Result<PhaseOutcomeRegistry> {
        let work_dir = match self.work_dir.take() {
            Some(path) => WorkDir::provided(path),
            None => WorkDir::owned(),
        };
        let mut ctx = AppCreationContext::new(self.repository, work_dir);

        for phase in &mut self.phases {
            let name = phase.name().to_string();
            info!("Running phase {}", name);
            phase.process(&mut ctx).map_err(|e| Error::Phase {
                phase: name.clone(),
                source: Box::new(e),
            })?;
            debug!("Phase {} finished", name);
        }

        ctx.close()
    }
}
