// tests/common/mod.rs

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use curator::{ArtifactCoords, ArtifactKey, CatalogRepository, Dependency, ExtensionDependency};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// A catalog used by the end-to-end tests.
///
/// - `acme-rest` conditionally depends on `acme-rest-jackson` once
///   `acme-jackson` is present
/// - `acme-jackson` and `acme-rest` exist at several versions
/// - `acme-core` is a plain library pulled in transitively
pub const ACME_CATALOG: &str = r#"
version = 1

[[artifact]]
coords = "io.acme:acme-rest:1.0.0"
dependencies = ["io.acme:acme-core:1.0.0"]

[artifact.extension]
deployment = "io.acme:acme-rest-deployment:1.0.0"
conditional-dependencies = ["io.acme:acme-rest-jackson:1.0.0"]

[[artifact]]
coords = "io.acme:acme-rest:1.0.3"
dependencies = ["io.acme:acme-core:1.0.0"]

[artifact.extension]
deployment = "io.acme:acme-rest-deployment:1.0.3"
conditional-dependencies = ["io.acme:acme-rest-jackson:1.0.0"]

[[artifact]]
coords = "io.acme:acme-rest:1.1.0"
dependencies = ["io.acme:acme-core:1.0.0"]

[artifact.extension]
deployment = "io.acme:acme-rest-deployment:1.1.0"
conditional-dependencies = ["io.acme:acme-rest-jackson:1.0.0"]

[[artifact]]
coords = "io.acme:acme-rest:2.0.0.CR1"
dependencies = ["io.acme:acme-core:1.0.0"]

[artifact.extension]
deployment = "io.acme:acme-rest-deployment:1.1.0"

[[artifact]]
coords = "io.acme:acme-rest-deployment:1.0.0"

[[artifact]]
coords = "io.acme:acme-rest-deployment:1.0.3"

[[artifact]]
coords = "io.acme:acme-rest-deployment:1.1.0"

[[artifact]]
coords = "io.acme:acme-jackson:1.0.0"

[artifact.extension]
deployment = "io.acme:acme-jackson-deployment:1.0.0"

[[artifact]]
coords = "io.acme:acme-jackson-deployment:1.0.0"

[[artifact]]
coords = "io.acme:acme-rest-jackson:1.0.0"
dependencies = ["io.acme:acme-core:1.0.0"]

[artifact.extension]
deployment = "io.acme:acme-rest-jackson-deployment:1.0.0"
dependency-condition = ["io.acme:acme-jackson"]

[[artifact]]
coords = "io.acme:acme-rest-jackson-deployment:1.0.0"

[[artifact]]
coords = "io.acme:acme-core:1.0.0"
"#;

pub fn coords(s: &str) -> ArtifactCoords {
    ArtifactCoords::parse(s).unwrap()
}

pub fn key(s: &str) -> ArtifactKey {
    ArtifactKey::parse(s).unwrap()
}

pub fn direct(s: &str) -> Dependency {
    Dependency::parse_direct(s).unwrap()
}

pub fn acme_catalog() -> CatalogRepository {
    CatalogRepository::parse(ACME_CATALOG).unwrap()
}

/// Extension `io.acme:<name>:1.0.0` with a matching deployment module.
pub fn extension(name: &str) -> ExtensionDependency {
    ExtensionDependency::new(
        coords(&format!("io.acme:{name}:1.0.0")),
        coords(&format!("io.acme:{name}-deployment:1.0.0")),
    )
}

/// Add an extension and its deployment module to a catalog.
pub fn add_extension(catalog: &mut CatalogRepository, ext: ExtensionDependency) {
    let deployment = ext.deployment_module.clone();
    catalog.insert_extension(ext, vec![]);
    catalog.insert(deployment, vec![]);
}

/// Write the acme catalog and a build config into a temp directory.
///
/// Returns (TempDir, config_path) - keep the TempDir alive to prevent cleanup.
pub fn setup_project(curation: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("catalog.toml"), ACME_CATALOG).unwrap();

    let config = format!(
        r#"[build]
catalog = "catalog.toml"
dependencies = ["io.acme:acme-rest:1.0.0", "io.acme:acme-jackson:1.0.0"]

{curation}
"#
    );
    let config_path = temp_dir.path().join("build.toml");
    fs::write(&config_path, config).unwrap();
    (temp_dir, config_path)
}
