// src/extension/mod.rs

//! Extension metadata
//!
//! An extension is an artifact that contributes a runtime module and a
//! build-time-only deployment module. Extensions may also declare
//! conditional dependencies: optional artifacts that only join the
//! application once every artifact named in their dependency condition is
//! on the runtime classpath.
//!
//! Extension descriptors are immutable and shared between resolution rounds.
//! Activation state lives in [`ActivatedExtension`], a small wrapper that is
//! copied rather than mutated.

use crate::artifact::{ArtifactCoords, ArtifactKey, Dependency, DependencyFlags, FeatureName, Scope};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use strum_macros::{Display, EnumString};

/// Launch mode of the build invocation
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum LaunchMode {
    #[default]
    Normal,
    Development,
    Test,
}

/// Extension descriptor
#[derive(Debug, Clone)]
pub struct ExtensionDependency {
    /// Runtime artifact of the extension
    pub extension_id: ArtifactCoords,
    /// Build-time companion, resolvable whenever the extension is present
    pub deployment_module: ArtifactCoords,
    /// Optional dependencies, in declaration order
    pub conditional_dependencies: Vec<Dependency>,
    /// Optional dependencies only considered in development mode
    pub conditional_dev_dependencies: Vec<Dependency>,
    /// Artifacts that must all be present before this extension may be
    /// activated as someone else's conditional dependency
    pub dependency_conditions: BTreeSet<ArtifactKey>,
}

impl ExtensionDependency {
    pub fn new(extension_id: ArtifactCoords, deployment_module: ArtifactCoords) -> Self {
        Self {
            extension_id,
            deployment_module,
            conditional_dependencies: Vec::new(),
            conditional_dev_dependencies: Vec::new(),
            dependency_conditions: BTreeSet::new(),
        }
    }

    /// Builder: add a conditional dependency
    pub fn with_conditional(mut self, coords: ArtifactCoords) -> Self {
        self.conditional_dependencies.push(conditional(coords));
        self
    }

    /// Builder: add a development-mode conditional dependency
    pub fn with_conditional_dev(mut self, coords: ArtifactCoords) -> Self {
        self.conditional_dev_dependencies.push(conditional(coords));
        self
    }

    /// Builder: add a dependency condition
    pub fn with_condition(mut self, key: ArtifactKey) -> Self {
        self.dependency_conditions.insert(key);
        self
    }

    pub fn key(&self) -> &ArtifactKey {
        &self.extension_id.key
    }

    pub fn feature_name(&self) -> FeatureName {
        self.extension_id.key.feature_name()
    }

    /// Conditional dependencies that apply in the given launch mode
    pub fn conditional_dependencies_for(
        &self,
        mode: LaunchMode,
    ) -> impl Iterator<Item = &Dependency> + '_ {
        let dev: &[Dependency] = if mode == LaunchMode::Development {
            &self.conditional_dev_dependencies
        } else {
            &[]
        };
        self.conditional_dependencies.iter().chain(dev.iter())
    }

    pub fn has_conditional_dependencies(&self, mode: LaunchMode) -> bool {
        self.conditional_dependencies_for(mode).next().is_some()
    }

    /// True when at least one applicable conditional dependency is not yet present
    pub fn needs_resolution(
        &self,
        mode: LaunchMode,
        is_present: impl Fn(&ArtifactKey) -> bool,
    ) -> bool {
        self.conditional_dependencies_for(mode)
            .any(|dep| !is_present(dep.key()))
    }

    /// True when every dependency condition is present
    pub fn conditions_satisfied(&self, is_present: impl Fn(&ArtifactKey) -> bool) -> bool {
        self.dependency_conditions.iter().all(is_present)
    }
}

fn conditional(coords: ArtifactCoords) -> Dependency {
    Dependency::new(coords, Scope::Runtime).with_flags(DependencyFlags::CONDITIONAL)
}

impl PartialEq for ExtensionDependency {
    fn eq(&self, other: &Self) -> bool {
        self.extension_id == other.extension_id
            && self.conditional_dependencies == other.conditional_dependencies
            && self.dependency_conditions == other.dependency_conditions
    }
}

impl Eq for ExtensionDependency {}

impl Hash for ExtensionDependency {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.extension_id.hash(state);
        self.conditional_dependencies.hash(state);
        self.dependency_conditions.hash(state);
    }
}

/// An extension together with the way it became active
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActivatedExtension {
    pub extension: Arc<ExtensionDependency>,
    /// True when the extension joined as a satisfied conditional dependency
    pub conditionally_activated: bool,
}

impl ActivatedExtension {
    /// An extension that is part of the base resolution
    pub fn declared(extension: Arc<ExtensionDependency>) -> Self {
        Self {
            extension,
            conditionally_activated: false,
        }
    }

    /// Copy of this entry marked as conditionally activated
    pub fn activated(&self) -> Self {
        Self {
            extension: Arc::clone(&self.extension),
            conditionally_activated: true,
        }
    }

    pub fn key(&self) -> &ArtifactKey {
        self.extension.key()
    }
}
