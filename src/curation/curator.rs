// src/curation/curator.rs

//! Curation of declared dependencies against a repository

use super::lock::{declared_hash, CurationLock};
use super::{select, DependenciesOrigin, UpdatePolicy, UpdateReport};
use crate::artifact::{ArtifactKey, Dependency};
use crate::error::{Error, Result};
use crate::repository::ArtifactRepository;
use crate::version::ArtifactVersion;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Curation settings for one build invocation
#[derive(Debug, Clone, Default)]
pub struct CurationSettings {
    pub policy: UpdatePolicy,
    pub origin: DependenciesOrigin,
    /// Lock file holding persisted curation state
    pub state_path: Option<PathBuf>,
    /// Consider pre-release candidates even for release versions
    pub allow_prereleases: bool,
}

impl CurationSettings {
    pub fn new(policy: UpdatePolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    pub fn with_origin(mut self, origin: DependenciesOrigin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_state_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_path = Some(path.into());
        self
    }

    pub fn with_prereleases(mut self, allow: bool) -> Self {
        self.allow_prereleases = allow;
        self
    }
}

/// Result of a curation pass
#[derive(Debug, Clone, Default)]
pub struct CurationOutcome {
    pub policy: UpdatePolicy,
    /// Declared dependencies with curated versions applied
    pub dependencies: Vec<Dependency>,
    /// Curated version of every declared key, empty when no policy is active
    pub curated: HashMap<ArtifactKey, ArtifactVersion>,
    pub report: UpdateReport,
    /// Hash of the declarations this outcome was computed from
    pub declared_hash: String,
}

/// Applies an update policy to declared dependencies
pub struct VersionCurator<'a> {
    repository: &'a dyn ArtifactRepository,
    settings: CurationSettings,
}

impl<'a> VersionCurator<'a> {
    pub fn new(repository: &'a dyn ArtifactRepository, settings: CurationSettings) -> Self {
        Self {
            repository,
            settings,
        }
    }

    pub fn settings(&self) -> &CurationSettings {
        &self.settings
    }

    /// Curate declared dependencies
    ///
    /// With [`DependenciesOrigin::LastUpdate`] each key starts from its
    /// persisted version when the lock has one. Otherwise it starts from the
    /// highest declared version of that key.
    pub fn curate(&self, declared: &[Dependency]) -> Result<CurationOutcome> {
        let hash = declared_hash(declared);
        let policy = self.settings.policy;
        if !policy.is_active() {
            debug!("No update policy, keeping declared versions");
            return Ok(CurationOutcome {
                policy,
                dependencies: declared.to_vec(),
                declared_hash: hash,
                ..Default::default()
            });
        }

        let lock = self.load_state(&hash)?;
        let mut order: Vec<&ArtifactKey> = Vec::new();
        let mut highest: HashMap<&ArtifactKey, &ArtifactVersion> = HashMap::new();
        for dep in declared {
            match highest.get_mut(dep.key()) {
                Some(current) => {
                    if dep.coords.version > **current {
                        *current = &dep.coords.version;
                    }
                }
                None => {
                    order.push(dep.key());
                    highest.insert(dep.key(), &dep.coords.version);
                }
            }
        }

        let mut curated = HashMap::new();
        let mut report = UpdateReport::new();
        for key in order {
            let start = lock
                .as_ref()
                .and_then(|lock| lock.version_of(key))
                .or_else(|| highest.get(key).copied())
                .ok_or_else(|| Error::UnknownArtifact(key.to_string()))?;
            let candidates = self.candidates(key, start);
            let chosen = select(start, &candidates, policy);
            if report.record(key, start, &chosen) {
                info!("Updating {} from {} to {}", key, start, chosen);
            }
            curated.insert(key.clone(), chosen);
        }

        let dependencies = declared
            .iter()
            .map(|dep| match curated.get(dep.key()) {
                Some(version) if *version != dep.coords.version => {
                    let mut dep = dep.clone();
                    dep.coords = dep.coords.with_version(version.clone());
                    dep
                }
                _ => dep.clone(),
            })
            .collect();

        info!(
            "Curated {} artifacts with policy {}, {} updated",
            curated.len(),
            policy,
            report.len()
        );
        Ok(CurationOutcome {
            policy,
            dependencies,
            curated,
            report,
            declared_hash: hash,
        })
    }

    /// Persist curated versions to the configured lock file
    ///
    /// Returns the path written, or `None` when there is no state path or no
    /// active policy.
    pub fn persist(&self, outcome: &CurationOutcome) -> Result<Option<PathBuf>> {
        let Some(path) = &self.settings.state_path else {
            return Ok(None);
        };
        if !outcome.policy.is_active() {
            return Ok(None);
        }

        let mut lock = CurationLock::new(outcome.policy);
        lock.set_declared_hash(&outcome.declared_hash);
        for (key, version) in &outcome.curated {
            lock.set_version(key.clone(), version.clone());
        }
        lock.write_to_file(path)?;
        info!("Wrote curation state for {} artifacts to {}", lock.len(), path.display());
        Ok(Some(path.clone()))
    }

    fn load_state(&self, hash: &str) -> Result<Option<CurationLock>> {
        if self.settings.origin != DependenciesOrigin::LastUpdate {
            return Ok(None);
        }
        let Some(path) = &self.settings.state_path else {
            return Ok(None);
        };
        let lock = load_lock(path)?;
        if let Some(lock) = &lock {
            if lock.needs_update(hash) {
                info!("Declared dependencies changed since the last update");
            }
        }
        Ok(lock)
    }

    fn candidates(&self, key: &ArtifactKey, start: &ArtifactVersion) -> BTreeSet<ArtifactVersion> {
        let allow_prereleases = self.settings.allow_prereleases || start.is_prerelease();
        self.repository
            .available_versions(key)
            .into_iter()
            .filter(|v| allow_prereleases || !v.is_prerelease())
            .collect()
    }
}

fn load_lock(path: &Path) -> Result<Option<CurationLock>> {
    let lock = CurationLock::load_if_exists(path)?;
    match &lock {
        Some(lock) => debug!("Loaded curation state for {} artifacts", lock.len()),
        None => debug!("No curation state at {}", path.display()),
    }
    Ok(lock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifact::ArtifactCoords;
    use crate::repository::CatalogRepository;
    use tempfile::TempDir;

    fn catalog(versions: &[&str]) -> CatalogRepository {
        let mut catalog = CatalogRepository::new();
        for version in versions {
            catalog.insert(
                ArtifactCoords::parse(&format!("io.acme:acme-core:{version}")).unwrap(),
                vec![],
            );
        }
        catalog
    }

    fn direct(s: &str) -> Dependency {
        Dependency::parse_direct(s).unwrap()
    }

    fn key() -> ArtifactKey {
        ArtifactKey::new("io.acme", "acme-core")
    }

    #[test]
    fn test_none_policy_keeps_versions() {
        let catalog = catalog(&["1.0.0", "1.1.0"]);
        let curator = VersionCurator::new(&catalog, CurationSettings::default());
        let declared = vec![direct("io.acme:acme-core:1.0.0")];

        let outcome = curator.curate(&declared).unwrap();
        assert_eq!(outcome.dependencies, declared);
        assert!(outcome.report.is_empty());
        assert!(outcome.curated.is_empty());
        assert!(curator.persist(&outcome).unwrap().is_none());
    }

    #[test]
    fn test_next_minor_rewrites_declaration() {
        let catalog = catalog(&["1.0.0", "1.0.5", "1.2.0", "2.0.0"]);
        let curator = VersionCurator::new(&catalog, CurationSettings::new(UpdatePolicy::NextMinor));

        let outcome = curator.curate(&[direct("io.acme:acme-core:1.0.0")]).unwrap();
        assert_eq!(outcome.dependencies[0].coords.version.to_string(), "1.2.0");
        assert!(outcome.dependencies[0].is_direct());
        assert_eq!(outcome.report.len(), 1);
        assert_eq!(outcome.curated[&key()].to_string(), "1.2.0");
    }

    #[test]
    fn test_prereleases_skipped_by_default() {
        let catalog = catalog(&["1.0.0", "1.1.0", "1.2.0.CR1"]);
        let declared = [direct("io.acme:acme-core:1.0.0")];

        let curator = VersionCurator::new(&catalog, CurationSettings::new(UpdatePolicy::NextMinor));
        assert_eq!(curator.curate(&declared).unwrap().curated[&key()].to_string(), "1.1.0");

        let curator = VersionCurator::new(
            &catalog,
            CurationSettings::new(UpdatePolicy::NextMinor).with_prereleases(true),
        );
        assert_eq!(curator.curate(&declared).unwrap().curated[&key()].to_string(), "1.2.0.CR1");
    }

    #[test]
    fn test_duplicate_declarations_start_from_highest() {
        let catalog = catalog(&["1.0.0", "1.0.2", "1.0.4"]);
        let curator = VersionCurator::new(&catalog, CurationSettings::new(UpdatePolicy::NextMicro));

        let outcome = curator
            .curate(&[
                direct("io.acme:acme-core:1.0.0"),
                direct("io.acme:acme-core:1.0.2"),
            ])
            .unwrap();
        let versions: Vec<String> = outcome
            .dependencies
            .iter()
            .map(|d| d.coords.version.to_string())
            .collect();
        assert_eq!(versions, vec!["1.0.4", "1.0.4"]);
        let update = outcome.report.iter().next().unwrap();
        assert_eq!(update.from.to_string(), "1.0.2");
    }

    #[test]
    fn test_last_update_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let catalog = catalog(&["1.0.0", "1.0.1", "1.1.0"]);
        let settings = CurationSettings::new(UpdatePolicy::NextMinor)
            .with_origin(DependenciesOrigin::LastUpdate)
            .with_state_path(temp.path().join("curator.lock"));
        let curator = VersionCurator::new(&catalog, settings);
        let declared = [direct("io.acme:acme-core:1.0.0")];

        let first = curator.curate(&declared).unwrap();
        assert_eq!(first.report.len(), 1);
        assert!(curator.persist(&first).unwrap().is_some());

        let second = curator.curate(&declared).unwrap();
        assert!(second.report.is_empty());
        assert_eq!(second.dependencies, first.dependencies);
    }

    #[test]
    fn test_declared_origin_ignores_state() {
        let temp = TempDir::new().unwrap();
        let catalog = catalog(&["1.0.0", "1.0.1"]);
        let settings = CurationSettings::new(UpdatePolicy::NextMicro)
            .with_state_path(temp.path().join("curator.lock"));
        let curator = VersionCurator::new(&catalog, settings);
        let declared = [direct("io.acme:acme-core:1.0.0")];

        let first = curator.curate(&declared).unwrap();
        curator.persist(&first).unwrap();
        let second = curator.curate(&declared).unwrap();
        assert_eq!(second.report.len(), 1);
    }
}
