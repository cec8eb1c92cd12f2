//! Common error types for model binding
//!
//! Conversion failures of individual request values are NOT errors here:
//! they are recorded as data in the [`ModelStateDictionary`](crate::ModelStateDictionary)
//! and binding continues. This enum covers failures that stop a binding call.

use thiserror::Error;

/// Common result type for model binding operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the binding engine and its configuration layer
#[derive(Error, Debug)]
pub enum Error {
    /// Metadata or options rejected before any request is processed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A model type name that is not present in the metadata registry
    #[error("Unknown model type: {0}")]
    UnknownType(String),

    /// Malformed input handed over by the hosting layer
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The ambient request cancellation fired while binding was in flight
    #[error("Model binding cancelled")]
    Cancelled,

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options file could not be parsed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
