// src/resolver/conflict.rs

//! Version conflicts between direct declarations
//!
//! Only artifacts the user declared directly can conflict. Transitive
//! requests for another version of an already selected key are settled by
//! nearest-wins and never reported.

use crate::artifact::{ArtifactKey, Dependency};
use crate::error::Error;
use crate::version::ArtifactVersion;
use std::collections::HashMap;
use std::fmt;

/// The same key requested directly at more than one version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionConflict {
    pub key: ArtifactKey,
    /// Requested versions in declaration order, without repeats
    pub versions: Vec<ArtifactVersion>,
}

impl VersionConflict {
    /// Turn the conflict into the fatal resolution error
    pub fn into_error(self) -> Error {
        let mut versions = self.versions.into_iter();
        let first = versions.next().map(|v| v.to_string()).unwrap_or_default();
        let second = versions.next().map(|v| v.to_string()).unwrap_or_default();
        Error::DependencyConflict {
            key: self.key.to_string(),
            first,
            second,
        }
    }
}

impl fmt::Display for VersionConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let versions: Vec<String> = self.versions.iter().map(|v| v.to_string()).collect();
        write!(
            f,
            "{} is declared at conflicting versions {}",
            self.key,
            versions.join(", ")
        )
    }
}

/// Find keys declared directly at different versions
///
/// Keys present in `curated` are never in conflict: every declaration of a
/// curated key is rewritten to the curated version before resolution.
/// Conflicts are returned in order of first declaration.
pub fn detect_direct_conflicts(
    dependencies: &[Dependency],
    curated: &HashMap<ArtifactKey, ArtifactVersion>,
) -> Vec<VersionConflict> {
    let mut requested: Vec<VersionConflict> = Vec::new();
    let mut index: HashMap<&ArtifactKey, usize> = HashMap::new();

    for dep in dependencies.iter().filter(|d| d.is_direct()) {
        if curated.contains_key(dep.key()) {
            continue;
        }
        match index.get(dep.key()) {
            Some(&i) => {
                let entry = &mut requested[i];
                if !entry.versions.contains(&dep.coords.version) {
                    entry.versions.push(dep.coords.version.clone());
                }
            }
            None => {
                index.insert(dep.key(), requested.len());
                requested.push(VersionConflict {
                    key: dep.key().clone(),
                    versions: vec![dep.coords.version.clone()],
                });
            }
        }
    }

    requested.retain(|entry| entry.versions.len() > 1);
    requested
}
