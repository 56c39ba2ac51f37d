//! Simplified premium model.
//!
//! Premium is intrinsic value plus a square-root time value, scaled by a
//! small random factor and floored at a minimum tick. This is deliberately
//! not Black-Scholes; there is no volatility input.

use crate::types::{OptionContract, OptionType};
use market_data::Bar;
use rand::Rng;

/// Parameters of the premium model.
#[derive(Debug, Clone, PartialEq)]
pub struct PremiumModel {
    /// Time value at `time_value_period_days` to expiry, as a fraction of strike
    pub time_value_rate: f64,
    pub time_value_period_days: f64,
    /// Half-width of the uniform premium multiplier (0.05 gives [0.95, 1.05))
    pub factor_spread: f64,
    pub min_premium: f64,
    /// Half-width of the open offset, as a fraction of premium
    pub bar_noise: f64,
    /// High/low extend this multiple of the open offset
    pub wick_multiplier: f64,
    pub volume_divisor: i64,
}

impl Default for PremiumModel {
    fn default() -> Self {
        Self {
            time_value_rate: 0.02,
            time_value_period_days: 30.0,
            factor_spread: 0.05,
            min_premium: 1.0,
            bar_noise: 0.01,
            wick_multiplier: 1.5,
            volume_divisor: 10,
        }
    }
}

impl PremiumModel {
    /// Zero once the contract is at or past expiry.
    pub fn time_value(&self, strike: f64, days_to_expiry: i64) -> f64 {
        if days_to_expiry <= 0 {
            return 0.0;
        }
        strike * self.time_value_rate * (days_to_expiry as f64 / self.time_value_period_days).sqrt()
    }

    /// Premium before any random scaling.
    pub fn fair_value(&self, option_type: OptionType, spot: f64, strike: f64, days_to_expiry: i64) -> f64 {
        option_type.intrinsic(spot, strike) + self.time_value(strike, days_to_expiry)
    }

    /// Point premium for one spot observation.
    pub fn premium<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        option_type: OptionType,
        spot: f64,
        strike: f64,
        days_to_expiry: i64,
    ) -> f64 {
        let factor = 1.0 + (rng.gen::<f64>() - 0.5) * 2.0 * self.factor_spread;
        (self.fair_value(option_type, spot, strike, days_to_expiry) * factor).max(self.min_premium)
    }

    /// Premium bar aligned with one underlying bar.
    pub fn premium_bar<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        contract: &OptionContract,
        underlying: &Bar,
        days_to_expiry: i64,
    ) -> Bar {
        let premium = self.premium(
            rng,
            contract.option_type,
            underlying.close,
            contract.strike,
            days_to_expiry,
        );
        let noise = (rng.gen::<f64>() - 0.5) * premium * 2.0 * self.bar_noise;
        let wick = noise.abs() * self.wick_multiplier;

        Bar::new(
            underlying.time.clone(),
            (premium + noise).max(0.0),
            (premium + wick).max(0.0),
            (premium - wick).max(0.0),
            premium.max(0.0),
            underlying.volume.div_euclid(self.volume_divisor),
        )
    }
}
