//! Core market data types

use crate::error::MarketDataError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of underlying an option or series is written on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnderlyingType {
    /// A single listed equity
    Stock,
    /// A sector or broad-market index
    Sector,
}

impl UnderlyingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnderlyingType::Stock => "stock",
            UnderlyingType::Sector => "sector",
        }
    }
}

impl fmt::Display for UnderlyingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnderlyingType {
    type Err = MarketDataError;

    /// Exact, lowercase tags only.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "stock" => Ok(UnderlyingType::Stock),
            "sector" => Ok(UnderlyingType::Sector),
            other => Err(MarketDataError::InvalidUnderlyingType(other.to_string())),
        }
    }
}

/// Bar width requested from a candle source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CandleInterval {
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "5minute")]
    FiveMinute,
}

impl CandleInterval {
    /// Path segment used by the historical candle API.
    pub fn as_str(&self) -> &'static str {
        match self {
            CandleInterval::Day => "day",
            CandleInterval::FiveMinute => "5minute",
        }
    }
}

impl FromStr for CandleInterval {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "day" => Ok(CandleInterval::Day),
            "5minute" => Ok(CandleInterval::FiveMinute),
            other => Err(MarketDataError::InvalidInterval(other.to_string())),
        }
    }
}

/// One OHLCV bar.
///
/// `time` is a bare `HH:MM` label for intraday bars and the date for daily ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub time: String,
    #[serde(rename = "open_price")]
    pub open: f64,
    #[serde(rename = "high_price")]
    pub high: f64,
    #[serde(rename = "low_price")]
    pub low: f64,
    #[serde(rename = "close_price")]
    pub close: f64,
    pub volume: i64,
}

impl Bar {
    /// Create a bar, enforcing the high/low bounds.
    pub fn new(time: impl Into<String>, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            time: time.into(),
            open,
            high,
            low,
            close,
            volume,
        }
        .normalized()
    }

    /// Widen high and low so that `low <= min(open, close)` and `high >= max(open, close)`.
    ///
    /// A bar that already satisfies the bounds is returned unchanged.
    pub fn normalized(mut self) -> Self {
        self.high = self.high.max(self.open).max(self.close);
        self.low = self.low.min(self.open).min(self.close);
        self
    }

    /// Whether high and low bound open and close.
    pub fn is_consistent(&self) -> bool {
        self.low <= self.open.min(self.close) && self.high >= self.open.max(self.close)
    }
}

/// Daily OHLCV record for one underlying, with an optional intraday series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    pub symbol: String,
    pub underlying_type: UnderlyingType,
    pub date: NaiveDate,
    #[serde(rename = "open_price")]
    pub open: f64,
    #[serde(rename = "high_price")]
    pub high: f64,
    #[serde(rename = "low_price")]
    pub low: f64,
    #[serde(rename = "close_price")]
    pub close: f64,
    pub volume: i64,
    /// Implied volatility estimate
    pub iv: f64,
    /// Intraday bars, oldest first. `None` when not requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timewise: Option<Vec<Bar>>,
}

impl DailyRecord {
    /// Build a record from a daily bar. The bar's bounds are enforced.
    pub fn from_bar(
        symbol: impl Into<String>,
        underlying_type: UnderlyingType,
        date: NaiveDate,
        bar: Bar,
        iv: f64,
    ) -> Self {
        let bar = bar.normalized();
        Self {
            symbol: symbol.into(),
            underlying_type,
            date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            iv,
            timewise: None,
        }
    }

    /// The daily values as a bar labelled with the date.
    pub fn bar(&self) -> Bar {
        Bar {
            time: self.date.to_string(),
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }

    /// Spot price used for strike selection.
    pub fn spot(&self) -> f64 {
        self.close
    }

    /// Intraday bars, empty when not requested or unavailable.
    pub fn intraday(&self) -> &[Bar] {
        self.timewise.as_deref().unwrap_or_default()
    }
}
