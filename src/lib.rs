// src/lib.rs

//! curator: dependency curation engine for extension-based applications
//!
//! Given a declared list of direct dependencies, some of which are
//! extensions carrying conditional sub-dependencies, curator computes the
//! application's runtime and deployment classpaths.
//!
//! # Architecture
//!
//! - Curation: an update policy rewrites declared versions, persisted in a
//!   lock so later builds start from the last update
//! - Resolution: transitive expansion plus the deployment module of every
//!   extension on the runtime classpath
//! - Conditional activation: bounded fixed-point rounds that activate
//!   conditional dependencies once their conditions are present
//! - Phases: ordered build phases exchanging typed, write-once outcomes
//!
//! All artifact metadata comes through the [`repository::ArtifactRepository`]
//! trait; [`repository::CatalogRepository`] reads it from a TOML catalog.

pub mod artifact;
pub mod conditional;
pub mod config;
pub mod creator;
pub mod curation;
mod error;
pub mod extension;
pub mod repository;
pub mod resolver;
pub mod version;

pub use artifact::{ArtifactCoords, ArtifactKey, Dependency, DependencyFlags, ExclusionRule, Scope};
pub use conditional::{ConditionalDependencyEnabler, EnabledExtensions, ResolutionSettings};
pub use config::BuildConfig;
pub use creator::{AppCreationContext, AppCreationPhase, AppCreator, PhaseOutcomeRegistry, WorkDir};
pub use curation::{
    select, CurationLock, CurationOutcome, CurationSettings, DependenciesOrigin, UpdatePolicy,
    UpdateReport, VersionCurator,
};
pub use error::{Error, Result};
pub use extension::{ActivatedExtension, ExtensionDependency, LaunchMode};
pub use repository::{ArtifactRepository, CatalogRepository};
pub use resolver::{DependencyGraphResolver, ResolvedArtifactSet, ResolvedDependency};
pub use version::{ArtifactVersion, UpdateNumber};
