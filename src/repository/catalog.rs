// src/repository/catalog.rs

//! TOML-backed artifact catalog
//!
//! # Format
//!
//! ```toml
//! version = 1
//!
//! [[artifact]]
//! coords = "io.acme:acme-rest:1.0.0"
//! dependencies = ["io.acme:acme-core:1.0.0"]
//!
//! [artifact.extension]
//! deployment = "io.acme:acme-rest-deployment:1.0.0"
//! conditional-dependencies = ["io.acme:acme-rest-jackson:1.0.0"]
//! conditional-dev-dependencies = ["io.acme:acme-rest-devui:1.0.0"]
//! dependency-condition = ["io.acme:acme-jackson"]
//!
//! [[artifact]]
//! coords = "io.acme:acme-rest-deployment:1.0.0"
//! ```
//!
//! Every artifact that takes part in a resolution has to be listed, including
//! deployment modules and conditional dependencies. Available versions for
//! curation are all entries that share a key.

use super::ArtifactRepository;
use crate::artifact::{ArtifactCoords, ArtifactKey, Dependency, Scope};
use crate::error::{Error, Result};
use crate::extension::ExtensionDependency;
use crate::version::ArtifactVersion;
use serde::Deserialize;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Current catalog format version
pub const CATALOG_VERSION: u32 = 1;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CatalogFile {
    #[serde(default = "default_version")]
    version: u32,
    #[serde(default, rename = "artifact")]
    artifacts: Vec<CatalogArtifact>,
}

fn default_version() -> u32 {
    CATALOG_VERSION
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CatalogArtifact {
    coords: ArtifactCoords,
    #[serde(default)]
    dependencies: Vec<ArtifactCoords>,
    #[serde(default)]
    extension: Option<CatalogExtension>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct CatalogExtension {
    deployment: ArtifactCoords,
    #[serde(default)]
    conditional_dependencies: Vec<ArtifactCoords>,
    #[serde(default)]
    conditional_dev_dependencies: Vec<ArtifactCoords>,
    #[serde(default)]
    dependency_condition: Vec<ArtifactKey>,
}

#[derive(Debug, Clone)]
struct CatalogEntry {
    dependencies: Vec<Dependency>,
    extension: Option<Arc<ExtensionDependency>>,
}

/// In-memory artifact repository
#[derive(Debug, Clone, Default)]
pub struct CatalogRepository {
    entries: HashMap<ArtifactCoords, CatalogEntry>,
    versions: HashMap<ArtifactKey, BTreeSet<ArtifactVersion>>,
}

impl CatalogRepository {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::parse(&content)?;
        debug!(
            "Loaded catalog {} with {} artifacts",
            path.display(),
            catalog.entries.len()
        );
        Ok(catalog)
    }

    /// Parse a catalog from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)?;
        if file.version > CATALOG_VERSION {
            return Err(Error::Config(format!(
                "catalog version {} is newer than supported version {}",
                file.version, CATALOG_VERSION
            )));
        }

        let mut catalog = Self::new();
        for artifact in file.artifacts {
            if catalog.contains(&artifact.coords) {
                return Err(Error::Config(format!(
                    "artifact {} is listed twice in the catalog",
                    artifact.coords
                )));
            }
            match artifact.extension {
                Some(ext) => {
                    let mut extension =
                        ExtensionDependency::new(artifact.coords, ext.deployment);
                    for coords in ext.conditional_dependencies {
                        extension = extension.with_conditional(coords);
                    }
                    for coords in ext.conditional_dev_dependencies {
                        extension = extension.with_conditional_dev(coords);
                    }
                    for key in ext.dependency_condition {
                        extension = extension.with_condition(key);
                    }
                    catalog.insert_extension(extension, artifact.dependencies);
                }
                None => {
                    catalog.insert(artifact.coords, artifact.dependencies);
                }
            }
        }
        Ok(catalog)
    }

    /// Add a plain artifact with its direct dependencies
    pub fn insert(&mut self, coords: ArtifactCoords, dependencies: Vec<ArtifactCoords>) -> &mut Self {
        self.insert_entry(coords, dependencies, None)
    }

    /// Add an extension artifact with its direct dependencies
    ///
    /// The deployment module and conditional dependencies are not added;
    /// they must be listed as artifacts of their own.
    pub fn insert_extension(
        &mut self,
        extension: ExtensionDependency,
        dependencies: Vec<ArtifactCoords>,
    ) -> &mut Self {
        let coords = extension.extension_id.clone();
        self.insert_entry(coords, dependencies, Some(Arc::new(extension)))
    }

    fn insert_entry(
        &mut self,
        coords: ArtifactCoords,
        dependencies: Vec<ArtifactCoords>,
        extension: Option<Arc<ExtensionDependency>>,
    ) -> &mut Self {
        self.versions
            .entry(coords.key.clone())
            .or_default()
            .insert(coords.version.clone());
        let dependencies = dependencies
            .into_iter()
            .map(|dep| Dependency::new(dep, Scope::Compile))
            .collect();
        self.entries.insert(
            coords,
            CatalogEntry {
                dependencies,
                extension,
            },
        );
        self
    }

    /// Number of artifacts in the catalog
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check catalog consistency
    ///
    /// Returns one message per dangling reference: dependencies, deployment
    /// modules or conditional dependencies that are not listed themselves.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        let mut coords: Vec<&ArtifactCoords> = self.entries.keys().collect();
        coords.sort_by_key(|c| c.to_string());

        for owner in coords {
            let entry = &self.entries[owner];
            for dep in &entry.dependencies {
                if !self.contains(&dep.coords) {
                    problems.push(format!("{} depends on unknown artifact {}", owner, dep.coords));
                }
            }
            if let Some(ext) = &entry.extension {
                if !self.contains(&ext.deployment_module) {
                    problems.push(format!(
                        "deployment module {} of extension {} is not in the catalog",
                        ext.deployment_module, owner
                    ));
                }
                let conditionals = ext
                    .conditional_dependencies
                    .iter()
                    .chain(ext.conditional_dev_dependencies.iter());
                for dep in conditionals {
                    if !self.contains(&dep.coords) {
                        problems.push(format!(
                            "conditional dependency {} of extension {} is not in the catalog",
                            dep.coords, owner
                        ));
                    }
                }
            }
        }
        problems
    }
}

impl ArtifactRepository for CatalogRepository {
    fn contains(&self, coords: &ArtifactCoords) -> bool {
        self.entries.contains_key(coords)
    }

    fn dependencies(&self, coords: &ArtifactCoords) -> Result<Vec<Dependency>> {
        self.entries
            .get(coords)
            .map(|entry| entry.dependencies.clone())
            .ok_or_else(|| Error::UnknownArtifact(coords.to_string()))
    }

    fn extension(&self, coords: &ArtifactCoords) -> Option<Arc<ExtensionDependency>> {
        self.entries
            .get(coords)
            .and_then(|entry| entry.extension.clone())
    }

    fn available_versions(&self, key: &ArtifactKey) -> BTreeSet<ArtifactVersion> {
        self.versions.get(key).cloned().unwrap_or_default()
    }

    fn extension_count(&self) -> usize {
        self.entries
            .values()
            .filter_map(|entry| entry.extension.as_ref())
            .map(|ext| ext.key())
            .collect::<BTreeSet<_>>()
            .len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"
version = 1

[[artifact]]
coords = "io.acme:acme-rest:1.0.0"
dependencies = ["io.acme:acme-core:1.0.0"]

[artifact.extension]
deployment = "io.acme:acme-rest-deployment:1.0.0"
conditional-dependencies = ["io.acme:acme-rest-jackson:1.0.0"]
dependency-condition = ["io.acme:acme-jackson"]

[[artifact]]
coords = "io.acme:acme-rest:1.1.0"

[artifact.extension]
deployment = "io.acme:acme-rest-deployment:1.1.0"

[[artifact]]
coords = "io.acme:acme-rest-deployment:1.0.0"

[[artifact]]
coords = "io.acme:acme-core:1.0.0"
"#;

    fn coords(s: &str) -> ArtifactCoords {
        ArtifactCoords::parse(s).unwrap()
    }

    #[test]
    fn test_parse_catalog() {
        let catalog = CatalogRepository::parse(CATALOG).unwrap();
        assert_eq!(catalog.len(), 4);

        let rest = coords("io.acme:acme-rest:1.0.0");
        let deps = catalog.dependencies(&rest).unwrap();
        assert_eq!(deps.len(), 1);
        assert_eq!(deps[0].coords, coords("io.acme:acme-core:1.0.0"));

        let ext = catalog.extension(&rest).unwrap();
        assert_eq!(ext.deployment_module, coords("io.acme:acme-rest-deployment:1.0.0"));
        assert_eq!(ext.conditional_dependencies.len(), 1);
        assert!(ext
            .dependency_conditions
            .contains(&ArtifactKey::new("io.acme", "acme-jackson")));

        assert!(catalog.extension(&coords("io.acme:acme-core:1.0.0")).is_none());
    }

    #[test]
    fn test_available_versions_sorted() {
        let catalog = CatalogRepository::parse(CATALOG).unwrap();
        let versions: Vec<String> = catalog
            .available_versions(&ArtifactKey::new("io.acme", "acme-rest"))
            .iter()
            .map(|v| v.to_string())
            .collect();
        assert_eq!(versions, vec!["1.0.0", "1.1.0"]);
        assert!(catalog
            .available_versions(&ArtifactKey::new("io.acme", "missing"))
            .is_empty());
    }

    #[test]
    fn test_extension_count_is_by_key() {
        let catalog = CatalogRepository::parse(CATALOG).unwrap();
        assert_eq!(catalog.extension_count(), 1);
    }

    #[test]
    fn test_unknown_artifact() {
        let catalog = CatalogRepository::parse(CATALOG).unwrap();
        let result = catalog.dependencies(&coords("io.acme:missing:1.0.0"));
        assert!(matches!(result, Err(Error::UnknownArtifact(_))));
    }

    #[test]
    fn test_validate_reports_dangling_references() {
        let catalog = CatalogRepository::parse(CATALOG).unwrap();
        let problems = catalog.validate();
        assert_eq!(problems.len(), 2);
        assert!(problems.iter().any(|p| p.contains("acme-rest-deployment:1.1.0")));
        assert!(problems.iter().any(|p| p.contains("acme-rest-jackson:1.0.0")));
    }

    #[test]
    fn test_duplicate_entries_rejected() {
        let toml = r#"
[[artifact]]
coords = "io.acme:acme-core:1.0.0"

[[artifact]]
coords = "io.acme:acme-core:1.0.0"
"#;
        assert!(matches!(CatalogRepository::parse(toml), Err(Error::Config(_))));
    }
}
