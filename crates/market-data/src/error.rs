//! Market data error types

use chrono::NaiveDate;
use instrument::InstrumentError;
use thiserror::Error;

/// Result type alias for market data operations.
pub type MarketDataResult<T> = Result<T, MarketDataError>;

/// Errors that can occur while producing underlying series
#[derive(Error, Debug, Clone)]
pub enum MarketDataError {
    /// Symbol could not be resolved to an instrument
    #[error("Symbol not found: {0}")]
    NotFound(String),

    /// Instrument resolved but the source has no bar for the date
    #[error("No market data for {symbol} on {date}")]
    NoData { symbol: String, date: NaiveDate },

    /// Transport failure, non-2xx status or malformed response from a live source
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Underlying type tag is neither `stock` nor `sector`
    #[error("Invalid underlying type: {0}. Must be one of: stock, sector")]
    InvalidUnderlyingType(String),

    /// Unsupported candle interval
    #[error("Invalid interval: {0}. Must be one of: day, 5minute")]
    InvalidInterval(String),

    /// Generator could not be built from configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl MarketDataError {
    pub fn no_data(symbol: impl Into<String>, date: NaiveDate) -> Self {
        Self::NoData {
            symbol: symbol.into(),
            date,
        }
    }

    pub fn upstream(message: impl Into<String>) -> Self {
        Self::Upstream(message.into())
    }

    /// Metric label for this error.
    pub fn outcome(&self) -> observability::CallOutcome {
        use observability::CallOutcome;
        match self {
            Self::NotFound(_) => CallOutcome::NotFound,
            Self::NoData { .. } => CallOutcome::NoData,
            Self::Upstream(_) => CallOutcome::Upstream,
            Self::InvalidUnderlyingType(_) | Self::InvalidInterval(_) | Self::Config(_) => {
                CallOutcome::Invalid
            }
        }
    }
}

impl From<InstrumentError> for MarketDataError {
    fn from(err: InstrumentError) -> Self {
        match err {
            InstrumentError::NotFound(symbol) => MarketDataError::NotFound(symbol),
            InstrumentError::Fetch(msg) | InstrumentError::Decode(msg) => MarketDataError::Upstream(msg),
            InstrumentError::ConfigError(msg) => MarketDataError::Config(msg),
        }
    }
}

impl From<reqwest::Error> for MarketDataError {
    fn from(err: reqwest::Error) -> Self {
        MarketDataError::Upstream(err.to_string())
    }
}

impl From<serde_json::Error> for MarketDataError {
    fn from(err: serde_json::Error) -> Self {
        MarketDataError::Upstream(format!("malformed response: {}", err))
    }
}
