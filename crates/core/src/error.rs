use thiserror::Error;

/// Result type for vecmend operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vecmend operations
#[derive(Error, Debug)]
pub enum Error {
    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Vector-index service unreachable or returned a non-success status
    #[error("Connectivity error: {0}")]
    Connectivity(String),

    /// Dataset registry unreachable or query failed
    #[error("Registry error: {0}")]
    Registry(String),

    /// Malformed or unexpected schema document
    #[error("Schema error: {0}")]
    Schema(String),

    /// Any other error
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Creates a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates a connectivity error
    pub fn connectivity(msg: impl Into<String>) -> Self {
        Self::Connectivity(msg.into())
    }

    /// Creates a registry error
    pub fn registry(msg: impl Into<String>) -> Self {
        Self::Registry(msg.into())
    }

    /// Creates a schema error
    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }
}
