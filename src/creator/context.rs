// src/creator/context.rs

//! Per-invocation creation context
//!
//! The context owns the outcome registry and the work directory for one
//! build invocation. An owned work directory is created lazily and removed
//! exactly once: on [`AppCreationContext::close`], or on drop when a phase
//! failed before the context could be closed. A caller-supplied directory
//! is never removed.

use super::registry::PhaseOutcomeRegistry;
use crate::error::Result;
use crate::repository::ArtifactRepository;
use std::any::Any;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tracing::{debug, info, warn};

/// Prefix of owned temporary work directories
pub const WORK_DIR_PREFIX: &str = "curator-";

/// Work directory of a build invocation
#[derive(Debug)]
pub enum WorkDir {
    /// Temporary directory owned by the context, created on first use
    Owned(Option<TempDir>),
    /// Directory supplied by the caller, never deleted
    Provided(PathBuf),
}

impl WorkDir {
    pub fn owned() -> Self {
        Self::Owned(None)
    }

    pub fn provided(path: impl Into<PathBuf>) -> Self {
        Self::Provided(path.into())
    }

    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }

    /// Path of the work directory, creating it if needed
    pub fn path(&mut self) -> Result<&Path> {
        match self {
            Self::Owned(dir) => {
                let created = match dir.take() {
                    Some(created) => created,
                    None => {
                        let created = tempfile::Builder::new()
                            .prefix(WORK_DIR_PREFIX)
                            .tempdir()?;
                        debug!("Created work directory {}", created.path().display());
                        created
                    }
                };
                Ok(dir.insert(created).path())
            }
            Self::Provided(path) => {
                if !path.exists() {
                    fs::create_dir_all(&*path)?;
                    debug!("Created provided work directory {}", path.display());
                }
                Ok(path.as_path())
            }
        }
    }

    /// Path of the work directory if it exists already
    pub fn existing_path(&self) -> Option<&Path> {
        match self {
            Self::Owned(dir) => dir.as_ref().map(TempDir::path),
            Self::Provided(path) => Some(path.as_path()),
        }
    }

    /// Remove an owned work directory; provided directories are kept
    pub fn cleanup(&mut self) -> Result<()> {
        match self {
            Self::Owned(dir) => {
                if let Some(created) = dir.take() {
                    let path = created.path().to_path_buf();
                    created.close()?;
                    info!("Removed work directory {}", path.display());
                }
            }
            Self::Provided(path) => {
                debug!("Keeping provided work directory {}", path.display());
            }
        }
        Ok(())
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        if let Self::Owned(dir) = self {
            if let Some(created) = dir.take() {
                let path = created.path().to_path_buf();
                match created.close() {
                    Ok(()) => info!("Removed work directory {}", path.display()),
                    Err(e) => warn!("Failed to remove work directory {}: {}", path.display(), e),
                }
            }
        }
    }
}

/// State shared by the phases of one build invocation
pub struct AppCreationContext<'a> {
    repository: &'a dyn ArtifactRepository,
    outcomes: PhaseOutcomeRegistry,
    work_dir: WorkDir,
}

impl<'a> AppCreationContext<'a> {
    pub fn new(repository: &'a dyn ArtifactRepository, work_dir: WorkDir) -> Self {
        Self {
            repository,
            outcomes: PhaseOutcomeRegistry::new(),
            work_dir,
        }
    }

    pub fn repository(&self) -> &'a dyn ArtifactRepository {
        self.repository
    }

    /// Work directory path, created on first access
    pub fn work_path(&mut self) -> Result<PathBuf> {
        Ok(self.work_dir.path()?.to_path_buf())
    }

    /// Create a named sub-directory of the work directory
    pub fn create_work_dir(&mut self, name: &str) -> Result<PathBuf> {
        let dir = self.work_dir.path()?.join(name);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    pub fn is_work_dir_owned(&self) -> bool {
        self.work_dir.is_owned()
    }

    pub fn work_dir(&self) -> &WorkDir {
        &self.work_dir
    }

    pub fn push_outcome<T: Any>(&mut self, outcome: T) -> Result<()> {
        self.outcomes.push(outcome)
    }

    pub fn outcome<T: Any>(&self) -> Result<&T> {
        self.outcomes.get::<T>()
    }

    pub fn has_outcome<T: Any>(&self) -> bool {
        self.outcomes.has::<T>()
    }

    pub fn outcomes(&self) -> &PhaseOutcomeRegistry {
        &self.outcomes
    }

    /// Tear down the work directory and hand back the outcomes
    pub fn close(mut self) -> Result<PhaseOutcomeRegistry> {
        self.work_dir.cleanup()?;
        Ok(std::mem::take(&mut self.outcomes))
    }
}
