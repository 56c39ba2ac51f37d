//! Core domain types for reference data.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Canonical identifier of a tradable instrument, as understood by the
/// upstream candle source (e.g. `NSE_EQ|INE002A01018`, `NSE_INDEX|Nifty 50`).
///
/// The key is opaque to Tickforge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InstrumentKey(String);

impl InstrumentKey {
    /// Create a new instrument key from a string.
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the inner string value.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InstrumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for InstrumentKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for InstrumentKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}
