use thiserror::Error;

/// Errors produced by key resolution.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum KeyError {
    /// The symbolic name is not in the catalog
    #[error("unknown telemetry key: {0:?}")]
    UnknownKey(String),
}

/// Result type for key operations.
pub type Result<T> = std::result::Result<T, KeyError>;
