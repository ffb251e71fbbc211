// src/error.rs

//! Error types for the curation engine
//!
//! Every failure in this crate is fatal for the build invocation that hit
//! it. There is no retry logic here; callers surface the message and stop.

use thiserror::Error;

/// Errors raised while curating, resolving or running build phases
#[derive(Error, Debug)]
pub enum Error {
    #[error("Dependency conflict: {key} is requested at both {first} and {second}")]
    DependencyConflict {
        key: String,
        first: String,
        second: String,
    },

    #[error("Conditional dependency resolution did not converge within {rounds} rounds")]
    ResolutionDidNotConverge { rounds: usize },

    #[error("Outcome {0} has already been pushed by an earlier phase")]
    DuplicateOutcome(&'static str),

    #[error("Outcome {0} is not available, no phase has pushed it")]
    MissingOutcome(&'static str),

    #[error("Conditional dependency {feature} of {required_by} is not provided by any known artifact")]
    MissingCapability {
        feature: String,
        required_by: String,
    },

    #[error("Artifact not found in repository: {0}")]
    UnknownArtifact(String),

    #[error("Invalid artifact coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Curation lock version mismatch: expected {expected}, found {found}")]
    LockVersionMismatch { expected: u32, found: u32 },

    #[error("Phase {phase} failed: {source}")]
    Phase {
        phase: String,
        #[source]
        source: Box<Error>,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
