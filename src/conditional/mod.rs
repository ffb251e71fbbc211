// src/conditional/mod.rs

//! Conditional dependency activation
//!
//! Extensions may declare conditional dependencies that join the application
//! only once every artifact in their dependency condition is on the runtime
//! classpath. Activating one conditional dependency can satisfy the condition
//! of another, so activation runs in rounds until nothing new is activated.
//!
//! Each round:
//!
//! 1. collects the candidates: active extensions with at least one applicable
//!    conditional dependency that is not on the runtime classpath yet
//! 2. pairs every pending conditional dependency with the extension that
//!    declares it
//! 3. resolves a detached configuration made of the current configuration,
//!    the candidates and every pending conditional dependency
//! 4. activates pending dependencies whose conditions hold against the
//!    current runtime classpath plus the runtime closure of whatever this
//!    round already activated
//! 5. adds the activated dependencies to the configuration and re-resolves
//!
//! Extension descriptors are never mutated; conditionally activated ones are
//! recorded as [`ActivatedExtension`] copies.

use crate::artifact::{is_excluded, ArtifactKey, Dependency, ExclusionRule, Scope};
use crate::error::{Error, Result};
use crate::extension::{ActivatedExtension, ExtensionDependency, LaunchMode};
use crate::repository::ArtifactRepository;
use crate::resolver::{DependencyGraphResolver, ResolvedArtifactSet};
use crate::version::ArtifactVersion;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Settings shared by resolution and activation
#[derive(Debug, Clone, Default)]
pub struct ResolutionSettings {
    pub launch_mode: LaunchMode,
    pub exclusions: Vec<ExclusionRule>,
    /// Platform-enforced versions for conditional dependencies
    pub constraints: HashMap<ArtifactKey, ArtifactVersion>,
    /// Overrides the default bound of one round per known extension plus one
    pub round_limit: Option<usize>,
}

/// Result of conditional activation
#[derive(Debug, Clone, Default)]
pub struct EnabledExtensions {
    /// Every active extension: base extensions first, then activated ones
    /// in activation order
    pub extensions: Vec<ActivatedExtension>,
    /// Conditional dependencies that were activated, in activation order
    pub activated: Vec<Dependency>,
    /// Base configuration plus activated conditional dependencies
    pub configuration: Vec<Dependency>,
    /// Resolution of the final configuration
    pub resolved: ResolvedArtifactSet,
    /// Rounds that ran a detached resolution
    pub rounds: usize,
}

impl EnabledExtensions {
    pub fn contains(&self, key: &ArtifactKey) -> bool {
        self.extensions.iter().any(|e| e.key() == key)
    }

    /// Extensions that joined through a satisfied condition
    pub fn conditionally_activated(&self) -> impl Iterator<Item = &ActivatedExtension> {
        self.extensions.iter().filter(|e| e.conditionally_activated)
    }
}

/// A conditional dependency awaiting activation
struct PendingDependency {
    dependency: Dependency,
    /// Extension declaring the dependency
    owner: Arc<ExtensionDependency>,
}

/// Runs conditional activation to a fixed point
pub struct ConditionalDependencyEnabler<'a> {
    resolver: DependencyGraphResolver<'a>,
    launch_mode: LaunchMode,
    constraints: HashMap<ArtifactKey, ArtifactVersion>,
    round_limit: usize,
}

impl<'a> ConditionalDependencyEnabler<'a> {
    pub fn new(resolver: DependencyGraphResolver<'a>) -> Self {
        let round_limit = resolver.repository().extension_count() + 1;
        Self {
            resolver,
            launch_mode: LaunchMode::default(),
            constraints: HashMap::new(),
            round_limit,
        }
    }

    /// Build a resolver and enabler from settings
    pub fn from_settings(
        repository: &'a dyn ArtifactRepository,
        settings: &ResolutionSettings,
        curated: HashMap<ArtifactKey, ArtifactVersion>,
    ) -> Self {
        let resolver = DependencyGraphResolver::new(repository)
            .with_exclusions(settings.exclusions.clone())
            .with_curated_versions(curated);
        let enabler = Self::new(resolver)
            .with_launch_mode(settings.launch_mode)
            .with_constraints(settings.constraints.clone());
        match settings.round_limit {
            Some(limit) => enabler.with_round_limit(limit),
            None => enabler,
        }
    }

    pub fn with_launch_mode(mut self, mode: LaunchMode) -> Self {
        self.launch_mode = mode;
        self
    }

    pub fn with_constraints(mut self, constraints: HashMap<ArtifactKey, ArtifactVersion>) -> Self {
        self.constraints = constraints;
        self
    }

    pub fn with_round_limit(mut self, limit: usize) -> Self {
        self.round_limit = limit;
        self
    }

    pub fn round_limit(&self) -> usize {
        self.round_limit
    }

    /// Activate conditional dependencies reachable from `base`
    ///
    /// An empty base configuration yields an empty result without resolving
    /// anything.
    pub fn enable(&self, base: &[Dependency]) -> Result<EnabledExtensions> {
        if base.is_empty() {
            return Ok(EnabledExtensions::default());
        }

        let mut configuration = base.to_vec();
        let mut resolved = self.resolver.resolve(&configuration)?;
        let mut extensions: Vec<ActivatedExtension> = resolved
            .extensions()
            .iter()
            .cloned()
            .map(ActivatedExtension::declared)
            .collect();
        let mut activated = Vec::new();
        let mut rounds = 0;

        loop {
            let candidates: Vec<Arc<ExtensionDependency>> = extensions
                .iter()
                .map(|e| Arc::clone(&e.extension))
                .filter(|ext| {
                    ext.needs_resolution(self.launch_mode, |key| resolved.contains_runtime(key))
                })
                .collect();
            if candidates.is_empty() {
                break;
            }
            if rounds == self.round_limit {
                return Err(Error::ResolutionDidNotConverge { rounds });
            }
            rounds += 1;
            debug!(
                "Conditional dependency round {} with {} candidate extensions",
                rounds,
                candidates.len()
            );

            let pending = self.pending_dependencies(&candidates, &resolved)?;
            if pending.is_empty() {
                break;
            }

            let detached = self.detached_resolution(&configuration, &candidates, &pending)?;
            let newly = self.activate(pending, &detached, &resolved)?;
            if newly.is_empty() {
                debug!("Round {} activated nothing", rounds);
                break;
            }

            for (dep, extension) in newly {
                if let Some(ext) = extension {
                    extensions.push(ActivatedExtension::declared(ext).activated());
                }
                configuration.push(dep.clone());
                activated.push(dep);
            }

            resolved = self.resolver.resolve(&configuration)?;
            for ext in resolved.extensions() {
                if !extensions.iter().any(|e| e.key() == ext.key()) {
                    debug!("Found extension {} through activated dependencies", ext.extension_id);
                    extensions.push(ActivatedExtension::declared(Arc::clone(ext)));
                }
            }
        }

        info!(
            "Activated {} conditional dependencies in {} rounds",
            activated.len(),
            rounds
        );
        Ok(EnabledExtensions {
            extensions,
            activated,
            configuration,
            resolved,
            rounds,
        })
    }

    /// Conditional dependencies of the candidates that still need activation
    ///
    /// A dependency declared by several candidates is kept once, owned by the
    /// first candidate that declares it.
    fn pending_dependencies(
        &self,
        candidates: &[Arc<ExtensionDependency>],
        resolved: &ResolvedArtifactSet,
    ) -> Result<Vec<PendingDependency>> {
        let repository = self.resolver.repository();
        let mut pending: Vec<PendingDependency> = Vec::new();

        for owner in candidates {
            for dep in owner.conditional_dependencies_for(self.launch_mode) {
                if resolved.contains_runtime(dep.key()) {
                    continue;
                }
                if is_excluded(self.resolver.exclusions(), dep.key()) {
                    info!(
                        "Ignoring conditional dependency {} of {}: excluded",
                        dep.coords, owner.extension_id
                    );
                    continue;
                }
                let dep = self.constrain(dep);
                if !repository.contains(&dep.coords) {
                    return Err(Error::MissingCapability {
                        feature: dep.key().feature_name().to_string(),
                        required_by: owner.extension_id.to_string(),
                    });
                }
                if !pending.iter().any(|p| p.dependency.key() == dep.key()) {
                    pending.push(PendingDependency {
                        dependency: dep,
                        owner: Arc::clone(owner),
                    });
                }
            }
        }
        Ok(pending)
    }

    fn detached_resolution(
        &self,
        configuration: &[Dependency],
        candidates: &[Arc<ExtensionDependency>],
        pending: &[PendingDependency],
    ) -> Result<ResolvedArtifactSet> {
        let mut detached = configuration.to_vec();
        detached.extend(
            candidates
                .iter()
                .map(|ext| Dependency::new(ext.extension_id.clone(), Scope::Runtime)),
        );
        detached.extend(pending.iter().map(|p| p.dependency.clone()));
        self.resolver.resolve(&detached)
    }

    /// Activate pending dependencies until no further condition is met
    ///
    /// Conditions are checked against the current runtime classpath plus the
    /// runtime closure of every dependency activated earlier in this round.
    fn activate(
        &self,
        mut remaining: Vec<PendingDependency>,
        detached: &ResolvedArtifactSet,
        resolved: &ResolvedArtifactSet,
    ) -> Result<Vec<(Dependency, Option<Arc<ExtensionDependency>>)>> {
        let mut newly = Vec::new();
        let mut activated_keys: HashSet<ArtifactKey> = HashSet::new();

        loop {
            let mut waiting = Vec::new();
            let before = newly.len();

            for pending in remaining {
                let extension = detached
                    .extensions()
                    .iter()
                    .find(|ext| ext.key() == pending.dependency.key())
                    .cloned();
                let satisfied = extension.as_ref().is_none_or(|ext| {
                    ext.conditions_satisfied(|key| {
                        resolved.contains_runtime(key) || activated_keys.contains(key)
                    })
                });
                if !satisfied {
                    waiting.push(pending);
                    continue;
                }

                info!(
                    "Activating conditional dependency {} of {}",
                    pending.dependency.coords, pending.owner.extension_id
                );
                activated_keys.extend(self.resolver.runtime_closure(&pending.dependency)?);
                newly.push((pending.dependency, extension));
            }

            remaining = waiting;
            if newly.len() == before || remaining.is_empty() {
                break;
            }
        }

        for pending in &remaining {
            debug!("Conditions of {} not satisfied yet", pending.dependency.coords);
        }
        Ok(newly)
    }

    fn constrain(&self, dep: &Dependency) -> Dependency {
        let mut dep = dep.clone();
        if let Some(version) = self.constraints.get(dep.key()) {
            if *version != dep.coords.version {
                debug!("Constraining {} to {}", dep.coords, version);
                dep.coords = dep.coords.with_version(version.clone());
            }
        }
        dep
    }
}
