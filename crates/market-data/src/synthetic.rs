//! Synthetic strategy: a bounded random walk around a random base price.
//!
//! Never fails. Output is reproducible when the generator is seeded.

use crate::error::MarketDataResult;
use crate::generator::SeriesGenerator;
use crate::session::TradingSession;
use crate::types::{Bar, DailyRecord, UnderlyingType};
use async_trait::async_trait;
use chrono::NaiveDate;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use tracing::debug;

/// Maximum open offset from the base price (±0.5%).
const OPEN_SPREAD: f64 = 0.005;
/// Maximum close offset from the base price (±1%).
const CLOSE_SPREAD: f64 = 0.01;
/// Maximum daily wick beyond the body (1%).
const DAILY_WICK: f64 = 0.01;
/// Per-bar noise on the intraday drift target, as a fraction of base (±0.1%).
const STEP_NOISE: f64 = 0.001;
/// Maximum intraday wick beyond the bar body, as a fraction of base (0.05%).
const INTRADAY_WICK: f64 = 0.0005;

/// Price, volume and volatility bands for one kind of underlying.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticProfile {
    pub base_price: Range<f64>,
    pub volume: Range<i64>,
    pub iv: Range<f64>,
}

impl SyntheticProfile {
    /// Large-cap equity.
    pub fn stock() -> Self {
        Self {
            base_price: 1_000.0..2_000.0,
            volume: 500_000..1_500_000,
            iv: 0.5..1.0,
        }
    }

    /// Broad or sector index, roughly an order of magnitude above a stock.
    pub fn sector() -> Self {
        Self {
            base_price: 10_000.0..15_000.0,
            volume: 5_000_000..15_000_000,
            iv: 0.15..0.20,
        }
    }

    pub fn for_type(underlying: UnderlyingType) -> Self {
        match underlying {
            UnderlyingType::Stock => Self::stock(),
            UnderlyingType::Sector => Self::sector(),
        }
    }
}

/// Random-walk generator for both stocks and sectors.
pub struct SyntheticSeriesGenerator {
    rng: Mutex<StdRng>,
    session: TradingSession,
}

impl SyntheticSeriesGenerator {
    /// Seeded generators repeat their output; `None` seeds from entropy.
    pub fn new(seed: Option<u64>, session: TradingSession) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng: Mutex::new(rng),
            session,
        }
    }

    pub fn session(&self) -> &TradingSession {
        &self.session
    }

    /// Build one record. The RNG lock is held for the whole record so a
    /// seeded generator yields the same record regardless of other callers'
    /// timing within a single call.
    pub fn generate(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
        include_intraday: bool,
    ) -> DailyRecord {
        let profile = SyntheticProfile::for_type(underlying);
        let mut rng = self.rng.lock();

        let base = rng.gen_range(profile.base_price.clone());
        let open = base * (1.0 + rng.gen_range(-OPEN_SPREAD..=OPEN_SPREAD));
        let close = base * (1.0 + rng.gen_range(-CLOSE_SPREAD..=CLOSE_SPREAD));
        let high = open.max(close) * (1.0 + rng.gen_range(0.0..=DAILY_WICK));
        let low = open.min(close) * (1.0 - rng.gen_range(0.0..=DAILY_WICK));
        let volume = rng.gen_range(profile.volume.clone());
        let iv = rng.gen_range(profile.iv.clone());

        let bar = Bar::new(date.to_string(), open, high, low, close, volume);
        let mut record = DailyRecord::from_bar(symbol, underlying, date, bar, iv);

        if include_intraday {
            let bars = self.walk(&mut *rng, base, open, close, volume);

            // Keep the day consistent with its own intraday extremes
            for bar in &bars {
                record.high = record.high.max(bar.high);
                record.low = record.low.min(bar.low);
            }
            record.timewise = Some(bars);
        }

        debug!(%underlying, symbol, %date, close = record.close, "Synthetic record generated");
        record
    }

    /// Walk from `open` to `close` across the session in equal drift steps plus noise.
    fn walk<R: Rng + ?Sized>(&self, rng: &mut R, base: f64, open: f64, close: f64, daily_volume: i64) -> Vec<Bar> {
        let labels = self.session.labels();
        let n = labels.len();
        if n == 0 {
            return Vec::new();
        }

        let step = (close - open) / n as f64;
        let volume_per_bar = daily_volume as f64 / n as f64;
        let mut previous_close = open;

        labels
            .into_iter()
            .enumerate()
            .map(|(i, label)| {
                let bar_open = previous_close;
                let bar_close = if i + 1 == n {
                    close
                } else {
                    open + step * (i + 1) as f64 + base * rng.gen_range(-STEP_NOISE..=STEP_NOISE)
                };
                let high = bar_open.max(bar_close) + base * rng.gen_range(0.0..=INTRADAY_WICK);
                let low = bar_open.min(bar_close) - base * rng.gen_range(0.0..=INTRADAY_WICK);
                let volume = (volume_per_bar * rng.gen_range(0.5..1.5)) as i64;

                previous_close = bar_close;
                Bar::new(label, bar_open, high, low, bar_close, volume)
            })
            .collect()
    }
}

#[async_trait]
impl SeriesGenerator for SyntheticSeriesGenerator {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn get_daily(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
        include_intraday: bool,
    ) -> MarketDataResult<DailyRecord> {
        Ok(self.generate(underlying, symbol, date, include_intraday))
    }

    async fn get_intraday(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
    ) -> MarketDataResult<Vec<Bar>> {
        Ok(self
            .generate(underlying, symbol, date, true)
            .timewise
            .unwrap_or_default())
    }
}
