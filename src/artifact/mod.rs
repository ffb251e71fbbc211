// src/artifact/mod.rs

//! Artifact identity, dependency declarations and dependency flags
//!
//! Two identities are used throughout the crate and they are never mixed:
//!
//! - [`ArtifactKey`] (`group:artifact[:classifier[:type]]`) is version
//!   independent. Conflict detection, deduplication, dependency conditions,
//!   exclusions, curation state and update reports are keyed by it.
//! - [`ArtifactCoords`] (key + version) is the full identity. Repository
//!   lookups, extension identity and reported classpath entries use it.

mod flags;

pub use flags::DependencyFlags;

use crate::error::{Error, Result};
use crate::version::ArtifactVersion;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Default artifact type
pub const TYPE_JAR: &str = "jar";

/// Version-independent artifact identity
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtifactKey {
    pub group_id: String,
    pub artifact_id: String,
    /// Empty when the artifact has no classifier
    pub classifier: String,
    pub artifact_type: String,
}

impl ArtifactKey {
    /// Create a key for a plain jar artifact
    pub fn new(group_id: impl Into<String>, artifact_id: impl Into<String>) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            classifier: String::new(),
            artifact_type: TYPE_JAR.to_string(),
        }
    }

    pub fn with_classifier(mut self, classifier: impl Into<String>) -> Self {
        self.classifier = classifier.into();
        self
    }

    pub fn with_type(mut self, artifact_type: impl Into<String>) -> Self {
        self.artifact_type = artifact_type.into();
        self
    }

    /// Parse `group:artifact[:classifier[:type]]`
    pub fn parse(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.trim().split(':').collect();
        let key = match parts.as_slice() {
            [g, a] => Self::new(*g, *a),
            [g, a, c] => Self::new(*g, *a).with_classifier(*c),
            [g, a, c, t] => Self::new(*g, *a).with_classifier(*c).with_type(*t),
            _ => {
                return Err(Error::InvalidCoordinates(format!(
                    "'{}' is not group:artifact[:classifier[:type]]",
                    s
                )));
            }
        };
        key.validate(s)?;
        Ok(key)
    }

    fn validate(&self, source: &str) -> Result<()> {
        if self.group_id.is_empty() || self.artifact_id.is_empty() || self.artifact_type.is_empty() {
            return Err(Error::InvalidCoordinates(format!(
                "'{}' has an empty group, artifact or type",
                source
            )));
        }
        Ok(())
    }

    /// The `(group, artifact)` feature name of this key
    pub fn feature_name(&self) -> FeatureName {
        FeatureName {
            group: self.group_id.clone(),
            artifact: self.artifact_id.clone(),
        }
    }

    /// Module id, `group:artifact`
    pub fn module_id(&self) -> String {
        format!("{}:{}", self.group_id, self.artifact_id)
    }
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group_id, self.artifact_id)?;
        if !self.classifier.is_empty() || self.artifact_type != TYPE_JAR {
            write!(f, ":{}:{}", self.classifier, self.artifact_type)?;
        }
        Ok(())
    }
}

impl FromStr for ArtifactKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Full artifact identity including the version
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactCoords {
    pub key: ArtifactKey,
    pub version: ArtifactVersion,
}

impl ArtifactCoords {
    pub fn new(key: ArtifactKey, version: ArtifactVersion) -> Self {
        Self { key, version }
    }

    /// Parse `group:artifact[:classifier[:type]]:version`
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let (key, version) = trimmed.rsplit_once(':').ok_or_else(|| {
            Error::InvalidCoordinates(format!(
                "'{}' is not group:artifact[:classifier[:type]]:version",
                s
            ))
        })?;
        if !key.contains(':') {
            return Err(Error::InvalidCoordinates(format!(
                "'{}' is missing a group or artifact id",
                s
            )));
        }
        Ok(Self {
            key: ArtifactKey::parse(key)?,
            version: ArtifactVersion::parse(version)?,
        })
    }

    /// Same artifact at a different version
    pub fn with_version(&self, version: ArtifactVersion) -> Self {
        Self {
            key: self.key.clone(),
            version,
        }
    }
}

impl fmt::Display for ArtifactCoords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key, self.version)
    }
}

impl FromStr for ArtifactCoords {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

macro_rules! string_serde {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                <$ty>::parse(&s).map_err(serde::de::Error::custom)
            }
        }
    };
}

string_serde!(ArtifactKey);
string_serde!(ArtifactCoords);

/// Feature name: the `(group, artifact)` pair that identifies an optional capability
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FeatureName {
    pub group: String,
    pub artifact: String,
}

impl fmt::Display for FeatureName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.artifact)
    }
}

/// Dependency scope
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Scope {
    #[default]
    Compile,
    Runtime,
    Provided,
    Test,
    /// Only needed while building, never shipped with the application
    DeploymentOnly,
}

/// A dependency declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dependency {
    pub coords: ArtifactCoords,
    pub scope: Scope,
    pub flags: DependencyFlags,
}

impl Dependency {
    pub fn new(coords: ArtifactCoords, scope: Scope) -> Self {
        Self {
            coords,
            scope,
            flags: DependencyFlags::empty(),
        }
    }

    /// A dependency declared directly by the user
    pub fn direct(coords: ArtifactCoords) -> Self {
        Self {
            coords,
            scope: Scope::Compile,
            flags: DependencyFlags::DIRECT,
        }
    }

    /// Parse coordinates into a direct compile dependency
    pub fn parse_direct(s: &str) -> Result<Self> {
        Ok(Self::direct(ArtifactCoords::parse(s)?))
    }

    pub fn with_flags(mut self, flags: DependencyFlags) -> Self {
        self.flags |= flags;
        self
    }

    pub fn key(&self) -> &ArtifactKey {
        &self.coords.key
    }

    pub fn is_direct(&self) -> bool {
        self.flags.contains(DependencyFlags::DIRECT)
    }
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.coords, self.scope)
    }
}

/// Exclusion rule matching a whole group or a single module in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExclusionRule {
    pub group: String,
    #[serde(default)]
    pub module: Option<String>,
}

impl ExclusionRule {
    pub fn group(group: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: None,
        }
    }

    pub fn module(group: impl Into<String>, module: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            module: Some(module.into()),
        }
    }

    /// Check whether this rule excludes the artifact
    pub fn matches(&self, key: &ArtifactKey) -> bool {
        if self.group != "*" && self.group != key.group_id {
            return false;
        }
        self.module
            .as_ref()
            .is_none_or(|module| module == "*" || *module == key.artifact_id)
    }
}

/// Check an artifact against a list of exclusion rules
pub fn is_excluded(rules: &[ExclusionRule], key: &ArtifactKey) -> bool {
    rules.iter().any(|rule| rule.matches(key))
}
