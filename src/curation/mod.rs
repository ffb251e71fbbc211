// src/curation/mod.rs

//! Version curation
//!
//! Curation rewrites declared dependency versions according to an update
//! policy before resolution. Every substitution is recorded in an
//! [`UpdateReport`], and the chosen versions can be persisted in a
//! [`CurationLock`] so that the next build starts from them instead of the
//! declared versions.

mod curator;
mod lock;

pub use curator::{CurationOutcome, CurationSettings, VersionCurator};
pub use lock::{declared_hash, CurationLock, LockMetadata, LockedArtifact, LOCK_NAME, LOCK_VERSION};

use crate::artifact::ArtifactKey;
use crate::version::{ArtifactVersion, UpdateNumber};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use strum_macros::{Display, EnumString};

/// How far a declared version may be moved
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum UpdatePolicy {
    /// Keep declared versions
    #[default]
    None,
    /// Newer micro releases of the same major.minor
    NextMicro,
    /// Newer minor releases of the same major
    NextMinor,
    /// Any newer release
    NextMajor,
}

impl UpdatePolicy {
    pub fn update_number(self) -> Option<UpdateNumber> {
        match self {
            Self::None => None,
            Self::NextMicro => Some(UpdateNumber::Micro),
            Self::NextMinor => Some(UpdateNumber::Minor),
            Self::NextMajor => Some(UpdateNumber::Major),
        }
    }

    pub fn is_active(self) -> bool {
        self != Self::None
    }
}

/// Where curation starts from
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum DependenciesOrigin {
    /// The versions written in the build configuration
    #[default]
    Declared,
    /// The versions persisted by the previous curation
    LastUpdate,
}

/// Pick the version a policy moves `requested` to
///
/// Returns the highest candidate above `requested` that stays within the
/// policy's update number, or `requested` itself when there is none.
pub fn select(
    requested: &ArtifactVersion,
    candidates: &BTreeSet<ArtifactVersion>,
    policy: UpdatePolicy,
) -> ArtifactVersion {
    let Some(update) = policy.update_number() else {
        return requested.clone();
    };
    candidates
        .iter()
        .rev()
        .find(|candidate| *candidate > requested && requested.within_update(candidate, update))
        .unwrap_or(requested)
        .clone()
}

/// A single version substitution
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionUpdate {
    pub key: ArtifactKey,
    pub from: ArtifactVersion,
    pub to: ArtifactVersion,
}

/// Substitutions made by one curation pass, in first-encountered order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct UpdateReport {
    updates: Vec<VersionUpdate>,
}

impl UpdateReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a substitution
    ///
    /// Ignored when nothing changed or the key was already recorded.
    pub fn record(&mut self, key: &ArtifactKey, from: &ArtifactVersion, to: &ArtifactVersion) -> bool {
        if from == to || self.updates.iter().any(|u| u.key == *key) {
            return false;
        }
        self.updates.push(VersionUpdate {
            key: key.clone(),
            from: from.clone(),
            to: to.clone(),
        });
        true
    }

    pub fn iter(&self) -> impl Iterator<Item = &VersionUpdate> {
        self.updates.iter()
    }

    pub fn len(&self) -> usize {
        self.updates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updates.is_empty()
    }
}
