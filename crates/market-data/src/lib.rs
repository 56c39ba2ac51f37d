//! Underlying market data for Tickforge
//!
//! Daily and 5-minute OHLCV series for stocks and sector indices, produced
//! either from a live historical-candle source or from a seeded random walk.
//!
//! # Core Components
//!
//! - [`types`] - `Bar`, `DailyRecord`, `UnderlyingType`, `CandleInterval`
//! - [`session`] - intraday slot grid for a trading session
//! - [`source`] - `CandleSource` trait, HTTP and in-memory sources
//! - [`live`] - resolve-then-fetch strategy
//! - [`synthetic`] - random-walk strategy
//! - [`service`] - `MarketDataService`, the facade callers use
//!
//! # Key Invariants
//!
//! - Every bar handed out has `low <= min(open, close)` and `high >= max(open, close)`,
//!   whatever the source reported
//! - Intraday series are oldest-first with `HH:MM` labels
//! - The strategy is fixed when the service is built; there is no per-request switching
//! - A failed intraday fetch never fails the daily record it belongs to

pub mod error;
pub mod generator;
pub mod live;
pub mod service;
pub mod session;
pub mod source;
pub mod synthetic;
pub mod types;

pub use error::{MarketDataError, MarketDataResult};
pub use generator::SeriesGenerator;
pub use live::LiveSeriesGenerator;
pub use service::MarketDataService;
pub use session::{market_today, TradingSession};
pub use source::{decode_candles, CandleSource, HttpCandleSource, InMemoryCandleSource, RawCandle};
pub use synthetic::{SyntheticProfile, SyntheticSeriesGenerator};
pub use types::{Bar, CandleInterval, DailyRecord, UnderlyingType};
