// src/artifact/flags.rs

//! Dependency flags
//!
//! One artifact can be a direct dependency, a runtime extension and a
//! member of both classpaths at the same time, so flags form a bitset.

use serde::ser::SerializeSeq;
use serde::{Serialize, Serializer};
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DependencyFlags(u8);

impl DependencyFlags {
    /// Declared directly by the user
    pub const DIRECT: Self = Self(0b0000_0001);
    /// Runtime artifact of an extension
    pub const RUNTIME_EXTENSION_ARTIFACT: Self = Self(0b0000_0010);
    /// Member of the application runtime classpath
    pub const RUNTIME_CP: Self = Self(0b0000_0100);
    /// Member of the build-time deployment classpath
    pub const DEPLOYMENT_CP: Self = Self(0b0000_1000);
    /// Brought in by an activated conditional dependency
    pub const CONDITIONAL: Self = Self(0b0001_0000);

    const NAMES: [(Self, &'static str); 5] = [
        (Self::DIRECT, "direct"),
        (Self::RUNTIME_EXTENSION_ARTIFACT, "runtime-extension"),
        (Self::RUNTIME_CP, "runtime-cp"),
        (Self::DEPLOYMENT_CP, "deployment-cp"),
        (Self::CONDITIONAL, "conditional"),
    ];

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Names of the set flags, in declaration order
    pub fn names(self) -> Vec<&'static str> {
        Self::NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

impl BitOr for DependencyFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for DependencyFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for DependencyFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.names().join("|"))
    }
}

impl Serialize for DependencyFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let names = self.names();
        let mut seq = serializer.serialize_seq(Some(names.len()))?;
        for name in names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}
