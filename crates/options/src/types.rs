//! Option contract types

use crate::error::{OptionsError, OptionsResult};
use chrono::NaiveDate;
use market_data::{Bar, UnderlyingType};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Date format used on the wire and in contract identifiers.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Type of option: Call or Put.
///
/// Serialized with the exchange codes `CE` / `PE`; `call` / `put` are
/// accepted on input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Call option - right to buy at strike price.
    #[serde(rename = "CE", alias = "call")]
    Call,
    /// Put option - right to sell at strike price.
    #[serde(rename = "PE", alias = "put")]
    Put,
}

impl OptionType {
    /// Exchange code for the option type.
    pub fn code(&self) -> &'static str {
        match self {
            OptionType::Call => "CE",
            OptionType::Put => "PE",
        }
    }

    /// Exercise value at `spot`.
    pub fn intrinsic(&self, spot: f64, strike: f64) -> f64 {
        match self {
            OptionType::Call => (spot - strike).max(0.0),
            OptionType::Put => (strike - spot).max(0.0),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for OptionType {
    type Err = OptionsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CE" | "call" => Ok(OptionType::Call),
            "PE" | "put" => Ok(OptionType::Put),
            other => Err(OptionsError::InvalidOptionType(other.to_string())),
        }
    }
}

/// A single option contract. Built per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionContract {
    pub underlying_type: UnderlyingType,
    pub underlying: String,
    pub expiry_date: NaiveDate,
    pub option_type: OptionType,
    pub strike: f64,
}

impl OptionContract {
    pub fn new(
        underlying_type: UnderlyingType,
        underlying: impl Into<String>,
        expiry_date: NaiveDate,
        option_type: OptionType,
        strike: f64,
    ) -> Self {
        Self {
            underlying_type,
            underlying: underlying.into(),
            expiry_date,
            option_type,
            strike,
        }
    }

    /// Identifier of the form `stock-RELIANCE-2024-01-25-CE-2500.00`.
    pub fn contract_id(&self) -> String {
        format!(
            "{}-{}-{}-{}-{:.2}",
            self.underlying_type,
            self.underlying,
            self.expiry_date.format(DATE_FORMAT),
            self.option_type.code(),
            self.strike
        )
    }

    /// Whole days from `date` to expiry. Negative once the contract has expired.
    pub fn days_to_expiry(&self, date: NaiveDate) -> i64 {
        (self.expiry_date - date).num_days()
    }
}

impl fmt::Display for OptionContract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.contract_id())
    }
}

/// Premium candles for one contract on one day, aligned 1:1 with the
/// underlying's intraday bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionCandles {
    pub contract: OptionContract,
    pub date: NaiveDate,
    pub candles: Vec<Bar>,
}

/// Parse a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> OptionsResult<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| OptionsError::InvalidDate(s.to_string()))
}
