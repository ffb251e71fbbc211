// src/resolver/engine.rs

//! Dependency graph resolver
//!
//! Resolution runs in four passes over a breadth-first walk:
//!
//! 1. top-level dependencies, in declaration order
//! 2. their transitive closure (nearest declaration wins)
//! 3. deployment modules of every extension found on the runtime classpath,
//!    in the order the extensions were found
//! 4. the transitive closure of those deployment modules
//!
//! Runtime entries land on both classpaths. Everything added in passes 3
//! and 4 that is not already on the runtime classpath is deployment only.

use crate::artifact::{
    is_excluded, ArtifactCoords, ArtifactKey, Dependency, DependencyFlags, ExclusionRule, Scope,
};
use crate::error::{Error, Result};
use crate::repository::ArtifactRepository;
use crate::version::ArtifactVersion;
use std::collections::{HashMap, VecDeque};
use tracing::debug;

use super::conflict::detect_direct_conflicts;
use super::graph::{ResolvedArtifactSet, ResolvedDependency};

const RUNTIME: DependencyFlags = DependencyFlags::RUNTIME_CP.union(DependencyFlags::DEPLOYMENT_CP);

/// Resolves a dependency list against an [`ArtifactRepository`]
pub struct DependencyGraphResolver<'a> {
    repository: &'a dyn ArtifactRepository,
    exclusions: Vec<ExclusionRule>,
    curated_versions: HashMap<ArtifactKey, ArtifactVersion>,
}

impl<'a> DependencyGraphResolver<'a> {
    pub fn new(repository: &'a dyn ArtifactRepository) -> Self {
        Self {
            repository,
            exclusions: Vec::new(),
            curated_versions: HashMap::new(),
        }
    }

    /// Exclusion rules applied to transitive dependencies
    pub fn with_exclusions(mut self, exclusions: Vec<ExclusionRule>) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Versions chosen by curation
    ///
    /// A curated key always resolves at its curated version, and direct
    /// declarations of it at other versions are not a conflict.
    pub fn with_curated_versions(mut self, curated: HashMap<ArtifactKey, ArtifactVersion>) -> Self {
        self.curated_versions = curated;
        self
    }

    pub fn repository(&self) -> &'a dyn ArtifactRepository {
        self.repository
    }

    pub fn exclusions(&self) -> &[ExclusionRule] {
        &self.exclusions
    }

    /// Resolve runtime and deployment classpaths for a dependency list
    ///
    /// Fails with `DependencyConflict` when a key is declared directly at
    /// two versions and has no curated version, and with `UnknownArtifact`
    /// when the repository lacks an artifact or deployment module.
    pub fn resolve(&self, dependencies: &[Dependency]) -> Result<ResolvedArtifactSet> {
        if let Some(conflict) = detect_direct_conflicts(dependencies, &self.curated_versions)
            .into_iter()
            .next()
        {
            return Err(conflict.into_error());
        }

        let mut set = ResolvedArtifactSet::new();
        let mut queue = VecDeque::new();

        for dep in dependencies {
            let coords = self.select_version(&dep.coords);
            if set.insert(ResolvedDependency::new(coords.clone(), dep.scope, dep.flags | RUNTIME)) {
                queue.push_back(coords);
            }
        }
        self.expand(&mut set, queue, Scope::Compile, RUNTIME)?;

        let runtime: Vec<ArtifactCoords> = set.runtime().map(|d| d.coords.clone()).collect();
        let mut deployment = VecDeque::new();
        for coords in &runtime {
            let Some(extension) = self.repository.extension(coords) else {
                continue;
            };
            set.add_flags(&coords.key, DependencyFlags::RUNTIME_EXTENSION_ARTIFACT);

            let module = &extension.deployment_module;
            if !self.repository.contains(module) {
                return Err(Error::UnknownArtifact(format!(
                    "deployment module {} of extension {}",
                    module, coords
                )));
            }
            let module = self.select_version(module);
            let entry = ResolvedDependency::new(
                module.clone(),
                Scope::DeploymentOnly,
                DependencyFlags::DEPLOYMENT_CP,
            );
            if set.insert(entry) {
                deployment.push_back(module);
            }
            set.push_extension(extension);
        }
        self.expand(
            &mut set,
            deployment,
            Scope::DeploymentOnly,
            DependencyFlags::DEPLOYMENT_CP,
        )?;

        debug!(
            "Resolved {} dependencies: {} runtime, {} deployment, {} extensions",
            dependencies.len(),
            set.runtime().count(),
            set.deployment().count(),
            set.extensions().len()
        );
        Ok(set)
    }

    /// Keys on the runtime closure of a single dependency, itself included
    ///
    /// Exclusions and curated versions apply as in [`Self::resolve`];
    /// deployment modules are not part of the closure.
    pub fn runtime_closure(&self, dependency: &Dependency) -> Result<Vec<ArtifactKey>> {
        let mut set = ResolvedArtifactSet::new();
        let coords = self.select_version(&dependency.coords);
        set.insert(ResolvedDependency::new(coords.clone(), dependency.scope, RUNTIME));
        self.expand(&mut set, VecDeque::from([coords]), Scope::Compile, RUNTIME)?;
        Ok(set.iter().map(|d| d.key().clone()).collect())
    }

    /// Breadth-first expansion of everything reachable from `queue`
    fn expand(
        &self,
        set: &mut ResolvedArtifactSet,
        mut queue: VecDeque<ArtifactCoords>,
        scope: Scope,
        flags: DependencyFlags,
    ) -> Result<()> {
        while let Some(coords) = queue.pop_front() {
            for dep in self.repository.dependencies(&coords)? {
                if set.contains(dep.key()) {
                    continue;
                }
                if is_excluded(&self.exclusions, dep.key()) {
                    debug!("Excluding {} required by {}", dep.coords, coords);
                    continue;
                }
                let child = self.select_version(&dep.coords);
                let child_scope = if scope == Scope::DeploymentOnly {
                    scope
                } else {
                    dep.scope
                };
                set.insert(ResolvedDependency::new(child.clone(), child_scope, flags));
                queue.push_back(child);
            }
        }
        Ok(())
    }

    fn select_version(&self, coords: &ArtifactCoords) -> ArtifactCoords {
        match self.curated_versions.get(&coords.key) {
            Some(version) if *version != coords.version => coords.with_version(version.clone()),
            _ => coords.clone(),
        }
    }
}
