// src/version/mod.rs

//! Artifact version parsing and ordering
//!
//! Artifact versions follow the usual JVM repository conventions rather than
//! strict semver: any number of numeric components followed by an optional
//! qualifier, separated by dots or dashes.
//!
//! Examples:
//! - "1.2.3"
//! - "3.8.1.Final" (release qualifier, equal to "3.8.1")
//! - "2.0.0-SNAPSHOT"
//! - "1.0.0.CR1"

use crate::error::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Rank of the release qualifier (no qualifier, Final, GA, RELEASE)
const RELEASE_RANK: u8 = 5;

/// Rank given to qualifiers that are not recognised
const UNKNOWN_RANK: u8 = 7;

/// The most significant version position an update is allowed to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateNumber {
    Major,
    Minor,
    Micro,
}

/// Qualifier suffix of a version, e.g. `SNAPSHOT`, `CR1`, `Final`
#[derive(Debug, Clone)]
struct Qualifier {
    /// Lower-cased alphabetic label ("cr" for "CR1")
    label: String,
    /// Trailing number ("1" for "CR1"), 0 when absent
    number: u64,
}

impl Qualifier {
    fn parse(text: &str) -> Self {
        let label: String = text
            .chars()
            .take_while(|c| c.is_ascii_alphabetic())
            .collect::<String>()
            .to_ascii_lowercase();
        let number = text[label.len()..]
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect::<String>()
            .parse::<u64>()
            .unwrap_or(0);
        Self { label, number }
    }

    fn rank(&self) -> u8 {
        match self.label.as_str() {
            "alpha" | "a" => 0,
            "beta" | "b" => 1,
            "milestone" | "m" => 2,
            "rc" | "cr" => 3,
            "snapshot" => 4,
            "" | "final" | "ga" | "release" => RELEASE_RANK,
            "sp" => 6,
            _ => UNKNOWN_RANK,
        }
    }
}

/// A parsed artifact version
#[derive(Debug, Clone)]
pub struct ArtifactVersion {
    raw: String,
    components: Vec<u64>,
    qualifier: Option<Qualifier>,
}

impl ArtifactVersion {
    /// Parse a version string
    ///
    /// At least one leading numeric component is required. The first
    /// non-numeric token starts the qualifier, which extends to the end
    /// of the string.
    pub fn parse(s: &str) -> Result<Self> {
        let raw = s.trim();
        if raw.is_empty() {
            return Err(Error::InvalidVersion("empty version string".to_string()));
        }

        let mut components = Vec::new();
        let mut qualifier = None;
        let mut offset = 0;

        for token in raw.split(['.', '-']) {
            let digits = token.chars().take_while(|c| c.is_ascii_digit()).count();
            if digits == token.len() && !token.is_empty() {
                let value = token.parse::<u64>().map_err(|e| {
                    Error::InvalidVersion(format!("'{}': component '{}': {}", raw, token, e))
                })?;
                components.push(value);
                offset += token.len() + 1;
                continue;
            }

            if digits > 0 {
                let value = token[..digits].parse::<u64>().map_err(|e| {
                    Error::InvalidVersion(format!("'{}': component '{}': {}", raw, token, e))
                })?;
                components.push(value);
                offset += digits;
            }
            qualifier = Some(Qualifier::parse(&raw[offset..]));
            break;
        }

        if components.is_empty() {
            return Err(Error::InvalidVersion(format!(
                "'{}' has no numeric component",
                raw
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            components,
            qualifier,
        })
    }

    /// Numeric component at `index`, 0 when not present
    pub fn component(&self, index: usize) -> u64 {
        self.components.get(index).copied().unwrap_or(0)
    }

    pub fn major(&self) -> u64 {
        self.component(0)
    }

    pub fn minor(&self) -> u64 {
        self.component(1)
    }

    pub fn micro(&self) -> u64 {
        self.component(2)
    }

    /// Whether the qualifier marks a pre-release (alpha, beta, milestone, rc, snapshot)
    pub fn is_prerelease(&self) -> bool {
        self.qualifier_rank() < RELEASE_RANK
    }

    /// Check if `other` keeps every position more significant than `update` unchanged
    ///
    /// - `Micro`: same major and minor
    /// - `Minor`: same major
    /// - `Major`: always true
    pub fn within_update(&self, other: &ArtifactVersion, update: UpdateNumber) -> bool {
        match update {
            UpdateNumber::Major => true,
            UpdateNumber::Minor => self.major() == other.major(),
            UpdateNumber::Micro => self.major() == other.major() && self.minor() == other.minor(),
        }
    }

    /// The version string as written
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn qualifier_rank(&self) -> u8 {
        self.qualifier.as_ref().map_or(RELEASE_RANK, Qualifier::rank)
    }

    fn significant_components(&self) -> &[u64] {
        let len = self
            .components
            .iter()
            .rposition(|c| *c != 0)
            .map_or(0, |i| i + 1);
        &self.components[..len]
    }

    /// Compare two versions
    pub fn compare(&self, other: &ArtifactVersion) -> Ordering {
        let len = self.components.len().max(other.components.len());
        for i in 0..len {
            match self.component(i).cmp(&other.component(i)) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }

        let (rank, other_rank) = (self.qualifier_rank(), other.qualifier_rank());
        match rank.cmp(&other_rank) {
            Ordering::Equal => {}
            ord => return ord,
        }
        if rank == RELEASE_RANK {
            return Ordering::Equal;
        }

        let (label, number) = self.qualifier_parts();
        let (other_label, other_number) = other.qualifier_parts();
        if rank == UNKNOWN_RANK {
            match label.cmp(other_label) {
                Ordering::Equal => {}
                ord => return ord,
            }
        }
        number.cmp(&other_number)
    }

    fn qualifier_parts(&self) -> (&str, u64) {
        self.qualifier
            .as_ref()
            .map_or(("", 0), |q| (q.label.as_str(), q.number))
    }
}

impl fmt::Display for ArtifactVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for ArtifactVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl PartialEq for ArtifactVersion {
    fn eq(&self, other: &Self) -> bool {
        self.compare(other) == Ordering::Equal
    }
}

impl Eq for ArtifactVersion {}

impl Hash for ArtifactVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant_components().hash(state);
        let rank = self.qualifier_rank();
        rank.hash(state);
        if rank != RELEASE_RANK {
            let (label, number) = self.qualifier_parts();
            if rank == UNKNOWN_RANK {
                label.hash(state);
            }
            number.hash(state);
        }
    }
}

impl Ord for ArtifactVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl PartialOrd for ArtifactVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for ArtifactVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for ArtifactVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> ArtifactVersion {
        ArtifactVersion::parse(s).unwrap()
    }

    #[test]
    fn test_parse_simple() {
        let version = v("1.2.3");
        assert_eq!(version.major(), 1);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.micro(), 3);
        assert!(!version.is_prerelease());
    }

    #[test]
    fn test_parse_dotted_qualifier() {
        let version = v("3.8.1.Final");
        assert_eq!(version.micro(), 1);
        assert!(!version.is_prerelease());
        assert_eq!(version.to_string(), "3.8.1.Final");
    }

    #[test]
    fn test_parse_mixed_token() {
        let version = v("1.0.0CR2");
        assert_eq!(version.micro(), 0);
        assert!(version.is_prerelease());
        assert!(version > v("1.0.0.CR1"));
    }

    #[test]
    fn test_parse_rejects_missing_number() {
        assert!(ArtifactVersion::parse("").is_err());
        assert!(ArtifactVersion::parse("Final").is_err());
    }

    #[test]
    fn test_release_aliases_are_equal() {
        assert_eq!(v("3.8.1"), v("3.8.1.Final"));
        assert_eq!(v("1.0"), v("1.0.0"));
        assert_eq!(v("2.0.0-GA"), v("2.0.0"));
    }

    #[test]
    fn test_numeric_ordering() {
        assert!(v("1.2.3") < v("1.2.4"));
        assert!(v("1.10.0") > v("1.9.9"));
        assert!(v("2") > v("1.99.99"));
    }

    #[test]
    fn test_qualifier_ordering() {
        assert!(v("1.0.0-alpha1") < v("1.0.0-beta1"));
        assert!(v("1.0.0-beta1") < v("1.0.0.CR1"));
        assert!(v("1.0.0.CR1") < v("1.0.0-SNAPSHOT"));
        assert!(v("1.0.0-SNAPSHOT") < v("1.0.0"));
        assert!(v("1.0.0") < v("1.0.0-sp1"));
        assert!(v("1.0.0-beta2") > v("1.0.0-beta1"));
    }

    #[test]
    fn test_within_update() {
        let base = v("1.2.3");
        assert!(base.within_update(&v("1.2.9"), UpdateNumber::Micro));
        assert!(!base.within_update(&v("1.3.0"), UpdateNumber::Micro));
        assert!(base.within_update(&v("1.3.0"), UpdateNumber::Minor));
        assert!(!base.within_update(&v("2.0.0"), UpdateNumber::Minor));
        assert!(base.within_update(&v("2.0.0"), UpdateNumber::Major));
    }

    #[test]
    fn test_hash_matches_equality() {
        use std::collections::HashSet;

        let mut set = HashSet::new();
        set.insert(v("1.0"));
        assert!(set.contains(&v("1.0.0.Final")));
        assert!(!set.contains(&v("1.0.0-SNAPSHOT")));
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&v("2.1.0.Final")).unwrap();
        assert_eq!(json, "\"2.1.0.Final\"");
        let parsed: ArtifactVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, v("2.1.0"));
    }
}
