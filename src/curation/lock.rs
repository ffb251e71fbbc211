// src/curation/lock.rs

//! Persisted curation state
//!
//! The lock (`curator.lock`) records the versions chosen by the last
//! curation so later builds can start from them.
//!
//! # Example
//!
//! ```toml
//! declared_hash = "sha256:9f2c..."
//!
//! [metadata]
//! version = 1
//! generated = "2026-01-15T10:30:00+00:00"
//! generator = "curator 0.1.0"
//! policy = "next-minor"
//!
//! [[artifacts]]
//! key = "io.acme:acme-rest"
//! version = "1.1.0"
//! ```

use super::UpdatePolicy;
use crate::artifact::{ArtifactKey, Dependency};
use crate::error::{Error, Result};
use crate::version::ArtifactVersion;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::Path;

/// Current lock format version
pub const LOCK_VERSION: u32 = 1;

/// Default lock file name
pub const LOCK_NAME: &str = "curator.lock";

/// Lock root structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurationLock {
    /// Hash of the declared dependencies the lock was produced from
    #[serde(default)]
    pub declared_hash: Option<String>,

    pub metadata: LockMetadata,

    /// Curated versions, sorted by key
    #[serde(default)]
    pub artifacts: Vec<LockedArtifact>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockMetadata {
    /// Lock format version
    pub version: u32,

    /// When the lock was written (RFC 3339)
    pub generated: String,

    /// Tool that wrote the lock
    pub generator: String,

    /// Policy the versions were curated with
    #[serde(default)]
    pub policy: UpdatePolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedArtifact {
    pub key: ArtifactKey,
    pub version: ArtifactVersion,
}

impl CurationLock {
    pub fn new(policy: UpdatePolicy) -> Self {
        Self {
            declared_hash: None,
            metadata: LockMetadata {
                version: LOCK_VERSION,
                generated: Utc::now().to_rfc3339(),
                generator: format!("curator {}", env!("CARGO_PKG_VERSION")),
                policy,
            },
            artifacts: Vec::new(),
        }
    }

    /// Load a lock from a path
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Load a lock if the file exists
    pub fn load_if_exists(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Self::from_file(path).map(Some)
    }

    /// Parse a lock from a TOML string
    pub fn parse(content: &str) -> Result<Self> {
        let lock: CurationLock = toml::from_str(content)?;
        if lock.metadata.version > LOCK_VERSION {
            return Err(Error::LockVersionMismatch {
                expected: LOCK_VERSION,
                found: lock.metadata.version,
            });
        }
        Ok(lock)
    }

    /// Write the lock, creating parent directories as needed
    pub fn write_to_file(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let mut file = fs::File::create(path)?;
        file.write_all(content.as_bytes())?;
        Ok(())
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Set the curated version of a key, keeping entries sorted
    pub fn set_version(&mut self, key: ArtifactKey, version: ArtifactVersion) {
        match self.artifacts.binary_search_by(|a| a.key.cmp(&key)) {
            Ok(i) => self.artifacts[i].version = version,
            Err(i) => self.artifacts.insert(i, LockedArtifact { key, version }),
        }
    }

    pub fn version_of(&self, key: &ArtifactKey) -> Option<&ArtifactVersion> {
        self.artifacts
            .iter()
            .find(|a| a.key == *key)
            .map(|a| &a.version)
    }

    /// Check whether the declarations changed since the lock was written
    pub fn needs_update(&self, declared_hash: &str) -> bool {
        self.declared_hash.as_deref() != Some(declared_hash)
    }

    pub fn set_declared_hash(&mut self, hash: &str) {
        self.declared_hash = Some(hash.to_string());
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

/// Hash of a declared dependency list, `sha256:<hex>`
pub fn declared_hash(dependencies: &[Dependency]) -> String {
    let mut hasher = Sha256::new();
    for dep in dependencies {
        hasher.update(dep.coords.to_string().as_bytes());
        hasher.update(b"\n");
    }
    format!("sha256:{}", hex::encode(hasher.finalize()))
}
