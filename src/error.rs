//! Error types
//!
//! The simulation itself never fails: bad requests are ignored and bad
//! numbers are clamped. Only loading configuration from outside can error.

use thiserror::Error;

/// Errors raised while loading a [`crate::SimConfig`]
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Error reading a config file from disk
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Malformed JSON or unknown field types
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// Unrecognized game mode name
    #[error("Unknown game mode: {0}")]
    UnknownMode(String),
}
