//! Error types for the state layer.

use std::path::PathBuf;

/// Errors that can occur while loading or saving bot state.
///
/// Only the load path surfaces these to callers. Save failures are logged
/// by [`StateManager::modify`](crate::StateManager::modify) and the
/// in-memory state is kept as-is.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// The state file exists but couldn't be read.
    #[error("failed to read state file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing or renaming the state file failed.
    #[error("failed to write state file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The state file is not valid JSON for the state shape.
    #[error("state file {} is malformed: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The state file holds JSON `null`.
    #[error("state file {} is null", path.display())]
    Null { path: PathBuf },

    /// Serializing the in-memory state failed.
    #[error("failed to encode state: {0}")]
    Encode(#[source] serde_json::Error),
}
