//! Error types for nightshift-core

use thiserror::Error;

/// Result type for nightshift operations that can actually fail
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by serialization, config and file output.
///
/// Parsing and aggregation never produce these; they degrade to defaults.
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Counter name that maps to no tracked counter
    #[error("Unknown counter: {0} (expected one of: {1})")]
    UnknownCounter(String, String),

    /// Configuration error
    #[error("Config error: {0}")]
    Config(String),
}
