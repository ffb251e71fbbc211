// src/resolver/mod.rs

//! Dependency resolution
//!
//! Expands a declared dependency list into the runtime classpath of the
//! application and the deployment classpath used at build time. Extensions
//! found on the runtime classpath contribute their deployment modules to the
//! deployment classpath only.

mod conflict;
mod engine;
mod graph;

pub use conflict::{detect_direct_conflicts, VersionConflict};
pub use engine::DependencyGraphResolver;
pub use graph::{ResolvedArtifactSet, ResolvedDependency};
