//! Error types for the semantics crate.
//!
//! Only construction-side APIs (building a tree, loading configuration) are
//! fallible. Diff passes, occlusion walks and scroll queries never fail; they
//! degrade to "no event" or empty bounds instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building trees or loading configuration.
#[derive(Error, Debug)]
pub enum SemanticsError {
    /// The node key does not belong to this tree.
    #[error("invalid or stale node key")]
    InvalidNodeKey,

    /// The tree has no root node.
    #[error("semantics tree has no root")]
    MissingRoot,

    /// A root node has already been set on this tree.
    #[error("semantics tree already has a root")]
    RootAlreadySet,

    /// The configuration text could not be parsed.
    #[error("failed to parse delegate config: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("failed to serialize delegate config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// The configuration file could not be read.
    #[error("failed to read delegate config {path}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for semantics construction operations.
pub type SemanticsResult<T> = Result<T, SemanticsError>;
