//! Common error types for Tagrove.

use thiserror::Error;

/// Top-level error type for Tagrove operations.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network operation failed.
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Conflict detected.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Operation is not supported by this provider.
    #[error("Unsupported operation: {0}")]
    Unsupported(String),

    /// Export failed, retaining the underlying cause.
    #[error("Export error: {message}")]
    Export {
        message: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    /// Wrap an error as an export failure.
    pub fn export(message: impl Into<String>, source: Error) -> Self {
        Error::Export {
            message: message.into(),
            source: Box::new(source),
        }
    }
}

/// Result type alias using the common Error.
pub type Result<T> = std::result::Result<T, Error>;
