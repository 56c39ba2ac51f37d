//! Strike ladder around the at-the-money price.
//!
//! Strikes sit on a fixed grid of `interval` and extend `levels` steps on
//! either side of the grid point nearest to spot.

use crate::error::{OptionsError, OptionsResult};
use crate::types::{OptionContract, OptionType};
use chrono::NaiveDate;
use market_data::UnderlyingType;
use tracing::debug;

/// A symmetric ladder of strikes centred on the ATM strike.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrikeLadder {
    atm_strike: f64,
    interval: f64,
    levels: u32,
}

impl StrikeLadder {
    /// Hard ceiling on `levels`, whatever the configuration allows.
    pub const MAX_LEVELS: u32 = 1_000;

    /// Snap `spot` to the grid and build a ladder of `levels` strikes each side.
    pub fn new(spot: f64, interval: f64, levels: u32) -> OptionsResult<Self> {
        if !interval.is_finite() || interval <= 0.0 {
            return Err(OptionsError::InvalidStrikeInterval(interval));
        }
        if levels > Self::MAX_LEVELS {
            return Err(OptionsError::InvalidAtmLevels {
                requested: levels,
                max: Self::MAX_LEVELS,
            });
        }

        let atm_strike = Self::snap_to_grid(spot, interval);
        debug!(spot, atm_strike, interval, levels, "Strike ladder built");

        Ok(Self {
            atm_strike,
            interval,
            levels,
        })
    }

    /// Round a price to the nearest grid point.
    pub fn snap_to_grid(price: f64, interval: f64) -> f64 {
        (price / interval).round() * interval
    }

    pub fn atm_strike(&self) -> f64 {
        self.atm_strike
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn levels(&self) -> u32 {
        self.levels
    }

    /// Strikes in ascending order, `2 * levels + 1` of them.
    pub fn strikes(&self) -> Vec<f64> {
        let levels = i64::from(self.levels);
        (-levels..=levels)
            .map(|i| self.atm_strike + i as f64 * self.interval)
            .collect()
    }

    /// A call and a put at every strike, call first.
    pub fn contracts(
        &self,
        underlying_type: UnderlyingType,
        underlying: &str,
        expiry_date: NaiveDate,
    ) -> Vec<OptionContract> {
        self.strikes()
            .into_iter()
            .flat_map(|strike| {
                [OptionType::Call, OptionType::Put].map(|option_type| {
                    OptionContract::new(underlying_type, underlying, expiry_date, option_type, strike)
                })
            })
            .collect()
    }
}
