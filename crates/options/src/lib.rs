//! Options derivation for Tickforge
//!
//! Turns an underlying's spot and intraday series into an option contract
//! universe and per-contract premium candles.
//!
//! ```text
//!   MarketDataService ──daily close──► StrikeLadder ──► Vec<OptionContract>
//!          │
//!          └──intraday bars──► PremiumModel ──► OptionCandles
//! ```
//!
//! # Core Components
//!
//! - [`types`] - `OptionType`, `OptionContract`, `OptionCandles`
//! - [`ladder`] - ATM snapping and strike ladder
//! - [`pricing`] - intrinsic + time value premium model
//! - [`engine`] - `OptionsEngine`, the public entry point

pub mod engine;
pub mod error;
pub mod ladder;
pub mod pricing;
pub mod types;

pub use engine::{parse_underlying_type, OptionsEngine};
pub use error::{OptionsError, OptionsResult};
pub use ladder::StrikeLadder;
pub use pricing::PremiumModel;
pub use types::{parse_date, OptionCandles, OptionContract, OptionType, DATE_FORMAT};
