// src/config.rs

//! Build configuration file
//!
//! ```toml
//! [build]
//! catalog = "catalog.toml"
//! launch-mode = "normal"
//! dependencies = ["io.acme:acme-rest:1.0.0", "io.acme:acme-jackson:1.0.0"]
//!
//! [curation]
//! policy = "next-minor"
//! origin = "last-update"
//! state = "curator.lock"
//!
//! [platform]
//! constraints = { "io.acme:acme-rest-jackson" = "1.0.2" }
//! exclusions = [{ group = "io.legacy" }]
//! ```
//!
//! Relative paths are resolved against the directory of the file.

use crate::artifact::{ArtifactCoords, ArtifactKey, Dependency, ExclusionRule};
use crate::conditional::ResolutionSettings;
use crate::curation::{CurationSettings, DependenciesOrigin, UpdatePolicy, LOCK_NAME};
use crate::error::{Error, Result};
use crate::extension::LaunchMode;
use crate::version::ArtifactVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Current configuration file version
pub const CONFIG_VERSION: u32 = 1;

/// Default configuration file name
pub const CONFIG_NAME: &str = "build.toml";

/// Classpath manifest directory when `output-dir` is unset
pub const DEFAULT_OUTPUT_DIR: &str = "target/curator";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    pub build: BuildSection,

    #[serde(default)]
    pub curation: CurationSection,

    #[serde(default)]
    pub platform: PlatformSection,

    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct BuildSection {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Artifact catalog
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,

    #[serde(default)]
    pub launch_mode: LaunchMode,

    /// Caller-supplied work directory, kept after the build
    #[serde(default)]
    pub work_dir: Option<PathBuf>,

    /// Where classpath manifests are written
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Direct dependencies, in declaration order
    #[serde(default)]
    pub dependencies: Vec<ArtifactCoords>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_catalog() -> PathBuf {
    PathBuf::from("catalog.toml")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CurationSection {
    #[serde(default)]
    pub policy: UpdatePolicy,

    #[serde(default)]
    pub origin: DependenciesOrigin,

    /// Curation lock, `curator.lock` next to the config when unset
    #[serde(default)]
    pub state: Option<PathBuf>,

    #[serde(default)]
    pub allow_prereleases: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct PlatformSection {
    /// Enforced versions for conditional dependencies
    #[serde(default)]
    pub constraints: BTreeMap<ArtifactKey, ArtifactVersion>,

    #[serde(default)]
    pub exclusions: Vec<ExclusionRule>,
}

impl BuildConfig {
    /// Load and validate a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&content)?;
        config.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        debug!(
            "Loaded build config {} with {} dependencies",
            path.display(),
            config.build.dependencies.len()
        );
        Ok(config)
    }

    /// Parse and validate a configuration string
    pub fn parse(content: &str) -> Result<Self> {
        let config: BuildConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.build.version > CONFIG_VERSION {
            return Err(Error::Config(format!(
                "config version {} is newer than supported version {}",
                self.build.version, CONFIG_VERSION
            )));
        }
        if self.build.catalog.as_os_str().is_empty() {
            return Err(Error::Config("build.catalog must not be empty".to_string()));
        }
        if let Some(rule) = self.platform.exclusions.iter().find(|r| r.group.is_empty()) {
            return Err(Error::Config(format!(
                "exclusion rule {:?} has an empty group",
                rule
            )));
        }
        if self.curation.origin == DependenciesOrigin::LastUpdate && !self.curation.policy.is_active() {
            return Err(Error::Config(
                "curation.origin = \"last-update\" needs an update policy".to_string(),
            ));
        }
        Ok(())
    }

    /// Declared dependencies as direct dependencies
    pub fn declared_dependencies(&self) -> Vec<Dependency> {
        self.build
            .dependencies
            .iter()
            .cloned()
            .map(Dependency::direct)
            .collect()
    }

    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.resolve_path(&self.build.catalog)
    }

    pub fn work_dir(&self) -> Option<PathBuf> {
        self.build.work_dir.as_deref().map(|p| self.resolve_path(p))
    }

    pub fn output_dir(&self) -> Option<PathBuf> {
        self.build.output_dir.as_deref().map(|p| self.resolve_path(p))
    }

    /// Output directory, or `target/curator` next to the config
    pub fn manifest_dir(&self) -> PathBuf {
        self.output_dir()
            .unwrap_or_else(|| self.resolve_path(Path::new(DEFAULT_OUTPUT_DIR)))
    }

    pub fn state_path(&self) -> PathBuf {
        let state = self
            .curation
            .state
            .clone()
            .unwrap_or_else(|| PathBuf::from(LOCK_NAME));
        self.resolve_path(&state)
    }

    pub fn curation_settings(&self) -> CurationSettings {
        CurationSettings::new(self.curation.policy)
            .with_origin(self.curation.origin)
            .with_state_path(self.state_path())
            .with_prereleases(self.curation.allow_prereleases)
    }

    pub fn resolution_settings(&self) -> ResolutionSettings {
        ResolutionSettings {
            launch_mode: self.build.launch_mode,
            exclusions: self.platform.exclusions.clone(),
            constraints: self
                .platform
                .constraints
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            round_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
[build]
catalog = "catalog.toml"
launch-mode = "development"
work-dir = "target/curator"
dependencies = ["io.acme:acme-rest:1.0.0", "io.acme:acme-jackson:1.0.0"]

[curation]
policy = "next-minor"
origin = "last-update"
state = "state/curator.lock"
allow-prereleases = true

[platform]
constraints = { "io.acme:acme-rest-jackson" = "1.0.2" }
exclusions = [{ group = "io.legacy" }, { group = "io.acme", module = "acme-old" }]
"#;

    #[test]
    fn test_parse_config() {
        let config = BuildConfig::parse(CONFIG).unwrap();
        assert_eq!(config.build.launch_mode, LaunchMode::Development);
        assert_eq!(config.build.dependencies.len(), 2);
        assert_eq!(config.curation.policy, UpdatePolicy::NextMinor);
        assert_eq!(config.curation.origin, DependenciesOrigin::LastUpdate);
        assert!(config.curation.allow_prereleases);
        assert_eq!(config.platform.exclusions[1], ExclusionRule::module("io.acme", "acme-old"));

        let settings = config.resolution_settings();
        let key = ArtifactKey::new("io.acme", "acme-rest-jackson");
        assert_eq!(settings.constraints[&key].to_string(), "1.0.2");

        let declared = config.declared_dependencies();
        assert!(declared.iter().all(Dependency::is_direct));
    }

    #[test]
    fn test_minimal_config_defaults() {
        let config = BuildConfig::parse("[build]\ndependencies = []\n").unwrap();
        assert_eq!(config.build.catalog, PathBuf::from("catalog.toml"));
        assert_eq!(config.build.launch_mode, LaunchMode::Normal);
        assert_eq!(config.curation.policy, UpdatePolicy::None);
        assert_eq!(config.state_path(), PathBuf::from(LOCK_NAME));
        assert!(config.work_dir().is_none());
    }

    #[test]
    fn test_paths_resolve_against_base_dir() {
        let mut config = BuildConfig::parse(CONFIG).unwrap();
        config.base_dir = PathBuf::from("/srv/app");
        assert_eq!(config.catalog_path(), PathBuf::from("/srv/app/catalog.toml"));
        assert_eq!(config.work_dir(), Some(PathBuf::from("/srv/app/target/curator")));
        assert_eq!(config.state_path(), PathBuf::from("/srv/app/state/curator.lock"));
    }

    #[test]
    fn test_last_update_needs_policy() {
        let content = "[build]\n[curation]\norigin = \"last-update\"\n";
        assert!(matches!(BuildConfig::parse(content), Err(Error::Config(_))));
    }

    #[test]
    fn test_invalid_coordinates_rejected() {
        let content = "[build]\ndependencies = [\"not-a-coordinate\"]\n";
        assert!(matches!(BuildConfig::parse(content), Err(Error::TomlParse(_))));
    }

    #[test]
    fn test_newer_version_rejected() {
        let content = "[build]\nversion = 7\n";
        assert!(matches!(BuildConfig::parse(content), Err(Error::Config(_))));
    }
}
