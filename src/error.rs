//! Error types for buildkit

use thiserror::Error;

/// Errors raised by the target registry
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Unknown build target: {0}")]
    UnknownTarget(String),

    #[error("Build target already registered: {0}")]
    DuplicateTarget(String),

    #[error("Invalid build target name: {0:?}")]
    InvalidTargetName(String),

    #[error("Failed to generate script for target '{target}'")]
    ScriptGeneration {
        target: String,
        #[source]
        source: ScriptError,
    },
}

/// Errors a script provider returns when it cannot produce a script
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScriptError {
    #[error("Release must not be empty")]
    EmptyRelease,

    #[error("Build directory must not be empty")]
    EmptyBuildDir,

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    #[error("{0}")]
    Invalid(String),
}

pub type Result<T> = std::result::Result<T, BuildError>;
