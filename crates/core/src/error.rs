//! Error types for syncer-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.

use thiserror::Error;

/// Result type alias for syncer-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for syncer-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed S3 locator or path
    #[error("Invalid path: {0}")]
    Format(String),

    /// Invalid credential or certificate configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// No files or keys matched when a match was required
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network, TLS, or auth failure talking to the object store
    #[error("Transport error: {0}")]
    Transport(String),

    /// Batch completed with one or more per-object failures
    #[error("Could not process {} object(s)", failed.len())]
    Batch {
        /// Identifiers of the objects that failed, in attempt order
        failed: Vec<String>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid glob pattern
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Format(_) => 2,    // UsageError
            Error::Config(_) => 2,    // UsageError
            Error::Transport(_) => 3, // NetworkError
            Error::NotFound(_) => 5,  // NotFound
            _ => 1,                   // GeneralError
        }
    }
}
