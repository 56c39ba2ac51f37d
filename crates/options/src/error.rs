//! Options engine error types

use market_data::MarketDataError;
use thiserror::Error;

/// Result type alias for options operations.
pub type OptionsResult<T> = Result<T, OptionsError>;

/// Errors raised while deriving contracts or premium series
#[derive(Error, Debug, Clone)]
pub enum OptionsError {
    /// The underlying could not be priced
    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error("Invalid underlying type: {0}. Must be one of: stock, sector")]
    InvalidUnderlyingType(String),

    #[error("Invalid option type: {0}. Must be one of: CE, PE")]
    InvalidOptionType(String),

    /// Strike interval must be finite and positive
    #[error("Invalid strike interval: {0}")]
    InvalidStrikeInterval(f64),

    /// Ladder wider than the configured ceiling
    #[error("Invalid ATM levels: {requested}. Must be at most {max}")]
    InvalidAtmLevels { requested: u32, max: u32 },

    #[error("Invalid strike: {0}")]
    InvalidStrike(String),

    #[error("Invalid date: {0}. Expected YYYY-MM-DD")]
    InvalidDate(String),
}
