//! Error types for the instrument crate.

use thiserror::Error;

/// Result type alias for instrument operations.
pub type InstrumentResult<T> = Result<T, InstrumentError>;

/// Errors that can occur while loading reference data or resolving symbols.
#[derive(Error, Debug, Clone)]
pub enum InstrumentError {
    /// Symbol is not present in the reference table (under any accepted spelling).
    #[error("Instrument not found: {0}")]
    NotFound(String),

    /// Reference document could not be fetched (transport, non-2xx, file I/O).
    #[error("Failed to fetch reference data: {0}")]
    Fetch(String),

    /// Reference document could not be decoded (decompression, header, JSON).
    #[error("Failed to decode reference data: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl InstrumentError {
    /// Create a not found error for a symbol.
    pub fn not_found(symbol: impl Into<String>) -> Self {
        Self::NotFound(symbol.into())
    }
}

impl From<serde_json::Error> for InstrumentError {
    fn from(err: serde_json::Error) -> Self {
        InstrumentError::Decode(err.to_string())
    }
}

impl From<reqwest::Error> for InstrumentError {
    fn from(err: reqwest::Error) -> Self {
        InstrumentError::Fetch(err.to_string())
    }
}
