// src/resolver/graph.rs

//! Resolved artifact set
//!
//! An ordered, key-deduplicated collection of resolved artifacts. Entries
//! are only ever added or gain flags; nothing is removed, so a set grows
//! monotonically over the lifetime of a resolution.

use crate::artifact::{ArtifactCoords, ArtifactKey, DependencyFlags, Scope};
use crate::extension::ExtensionDependency;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// A single resolved artifact
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDependency {
    pub coords: ArtifactCoords,
    pub scope: Scope,
    pub flags: DependencyFlags,
}

impl ResolvedDependency {
    pub fn new(coords: ArtifactCoords, scope: Scope, flags: DependencyFlags) -> Self {
        Self {
            coords,
            scope,
            flags,
        }
    }

    pub fn key(&self) -> &ArtifactKey {
        &self.coords.key
    }

    pub fn is_runtime(&self) -> bool {
        self.flags.contains(DependencyFlags::RUNTIME_CP)
    }

    pub fn is_deployment(&self) -> bool {
        self.flags.contains(DependencyFlags::DEPLOYMENT_CP)
    }
}

/// Ordered set of resolved artifacts, one entry per key
#[derive(Debug, Clone, Default)]
pub struct ResolvedArtifactSet {
    entries: Vec<ResolvedDependency>,
    index: HashMap<ArtifactKey, usize>,
    extensions: Vec<Arc<ExtensionDependency>>,
}

impl ResolvedArtifactSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an artifact
    ///
    /// If the key is already present the existing entry wins: its coordinates
    /// and scope are kept, only the flags are merged. Returns true when a new
    /// entry was created.
    pub fn insert(&mut self, dependency: ResolvedDependency) -> bool {
        if let Some(&i) = self.index.get(dependency.key()) {
            self.entries[i].flags |= dependency.flags;
            return false;
        }
        self.index.insert(dependency.key().clone(), self.entries.len());
        self.entries.push(dependency);
        true
    }

    /// Merge flags into an existing entry; false if the key is unknown
    pub fn add_flags(&mut self, key: &ArtifactKey, flags: DependencyFlags) -> bool {
        match self.index.get(key) {
            Some(&i) => {
                self.entries[i].flags |= flags;
                true
            }
            None => false,
        }
    }

    pub(crate) fn push_extension(&mut self, extension: Arc<ExtensionDependency>) {
        if !self.extensions.iter().any(|e| e.key() == extension.key()) {
            self.extensions.push(extension);
        }
    }

    pub fn get(&self, key: &ArtifactKey) -> Option<&ResolvedDependency> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.index.contains_key(key)
    }

    /// True when the key is on the runtime classpath
    pub fn contains_runtime(&self, key: &ArtifactKey) -> bool {
        self.get(key).is_some_and(ResolvedDependency::is_runtime)
    }

    /// All entries in resolution order
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.entries.iter()
    }

    /// Runtime classpath entries in resolution order
    pub fn runtime(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.entries.iter().filter(|d| d.is_runtime())
    }

    /// Deployment classpath entries in resolution order
    ///
    /// Runtime entries are part of the deployment classpath too.
    pub fn deployment(&self) -> impl Iterator<Item = &ResolvedDependency> {
        self.entries.iter().filter(|d| d.is_deployment())
    }

    /// Extensions found on the runtime classpath, in resolution order
    pub fn extensions(&self) -> &[Arc<ExtensionDependency>] {
        &self.extensions
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
