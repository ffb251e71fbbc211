// src/repository/mod.rs

//! Artifact repository abstraction
//!
//! The resolver never talks to a build tool or a remote repository directly.
//! Everything it needs to know about an artifact (its own dependencies,
//! whether it is an extension, which versions exist) comes through
//! [`ArtifactRepository`]. The crate ships one implementation,
//! [`CatalogRepository`], backed by a TOML catalog file.

mod catalog;

pub use catalog::{CatalogRepository, CATALOG_VERSION};

use crate::artifact::{ArtifactCoords, ArtifactKey, Dependency};
use crate::error::Result;
use crate::extension::ExtensionDependency;
use crate::version::ArtifactVersion;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Source of artifact metadata for resolution and curation
pub trait ArtifactRepository {
    /// Check if the repository knows this exact artifact
    fn contains(&self, coords: &ArtifactCoords) -> bool;

    /// Direct dependencies declared by an artifact
    ///
    /// Fails with `UnknownArtifact` when the artifact is not known.
    fn dependencies(&self, coords: &ArtifactCoords) -> Result<Vec<Dependency>>;

    /// Extension metadata, `None` for plain libraries
    fn extension(&self, coords: &ArtifactCoords) -> Option<Arc<ExtensionDependency>>;

    /// Every known version of an artifact, ascending
    fn available_versions(&self, key: &ArtifactKey) -> BTreeSet<ArtifactVersion>;

    /// Number of distinct extensions the repository knows about
    fn extension_count(&self) -> usize;
}
