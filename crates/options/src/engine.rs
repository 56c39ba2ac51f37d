//! Options derivation engine.
//!
//! Builds the contract universe around the underlying's spot and derives
//! premium candles from its intraday series.

use crate::error::{OptionsError, OptionsResult};
use crate::ladder::StrikeLadder;
use crate::pricing::PremiumModel;
use crate::types::{OptionCandles, OptionContract};
use chrono::NaiveDate;
use config::OptionsConfig;
use market_data::{market_today, MarketDataService, UnderlyingType};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// Derives option contracts and premium series from underlying data.
pub struct OptionsEngine {
    market: MarketDataService,
    model: PremiumModel,
    rng: Mutex<StdRng>,
    default_atm_levels: u32,
    max_atm_levels: u32,
    default_strike_interval: f64,
}

impl OptionsEngine {
    /// Seeded engines repeat their premium noise; `None` seeds from entropy.
    pub fn new(market: MarketDataService, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let defaults = OptionsConfig::default();
        Self {
            market,
            model: PremiumModel::default(),
            rng: Mutex::new(rng),
            default_atm_levels: defaults.default_atm_levels,
            max_atm_levels: defaults.max_atm_levels,
            default_strike_interval: defaults.default_strike_interval,
        }
    }

    pub fn from_config(config: &OptionsConfig, market: MarketDataService) -> Self {
        let mut engine = Self::new(market, config.seed);
        engine.default_atm_levels = config.default_atm_levels;
        engine.max_atm_levels = config.max_atm_levels.min(StrikeLadder::MAX_LEVELS);
        engine.default_strike_interval = config.default_strike_interval;
        engine
    }

    /// Ladder width used when a request does not name one.
    pub fn default_atm_levels(&self) -> u32 {
        self.default_atm_levels
    }

    /// Widest ladder a request may ask for.
    pub fn max_atm_levels(&self) -> u32 {
        self.max_atm_levels
    }

    /// Strike spacing used when a request does not name one.
    pub fn default_strike_interval(&self) -> f64 {
        self.default_strike_interval
    }

    /// Contracts around today's spot.
    pub async fn generate_contracts(
        &self,
        underlying_type: UnderlyingType,
        underlying: &str,
        expiry_date: NaiveDate,
        atm_levels: u32,
        strike_interval: f64,
    ) -> OptionsResult<Vec<OptionContract>> {
        self.generate_contracts_on(
            market_today(),
            underlying_type,
            underlying,
            expiry_date,
            atm_levels,
            strike_interval,
        )
        .await
    }

    /// Contracts around the close on `spot_date`.
    ///
    /// Returns `2 * (2 * atm_levels + 1)` contracts in ascending strike
    /// order, call before put at each strike.
    #[tracing::instrument(skip(self), fields(underlying_type = %underlying_type))]
    pub async fn generate_contracts_on(
        &self,
        spot_date: NaiveDate,
        underlying_type: UnderlyingType,
        underlying: &str,
        expiry_date: NaiveDate,
        atm_levels: u32,
        strike_interval: f64,
    ) -> OptionsResult<Vec<OptionContract>> {
        if !strike_interval.is_finite() || strike_interval <= 0.0 {
            return Err(OptionsError::InvalidStrikeInterval(strike_interval));
        }
        if atm_levels > self.max_atm_levels {
            return Err(OptionsError::InvalidAtmLevels {
                requested: atm_levels,
                max: self.max_atm_levels,
            });
        }

        let record = self
            .market
            .get_daily(underlying_type, underlying, spot_date, false)
            .await?;

        let ladder = StrikeLadder::new(record.spot(), strike_interval, atm_levels)?;
        let contracts = ladder.contracts(underlying_type, underlying, expiry_date);

        info!(
            spot = record.spot(),
            atm_strike = ladder.atm_strike(),
            count = contracts.len(),
            "Option contracts generated"
        );
        Ok(contracts)
    }

    /// Premium candles for `contract` on `date`, one per underlying intraday bar.
    ///
    /// A date past expiry is accepted and priced on intrinsic value alone.
    /// Any finite strike is accepted; the minimum premium covers odd ones.
    #[tracing::instrument(skip(self, contract), fields(contract = %contract))]
    pub async fn generate_premium_series(
        &self,
        contract: &OptionContract,
        date: NaiveDate,
    ) -> OptionsResult<OptionCandles> {
        if !contract.strike.is_finite() {
            return Err(OptionsError::InvalidStrike(contract.strike.to_string()));
        }

        let record = self
            .market
            .get_daily(contract.underlying_type, &contract.underlying, date, true)
            .await?;

        let days_to_expiry = contract.days_to_expiry(date);
        let candles = {
            let mut rng = self.rng.lock();
            record
                .intraday()
                .iter()
                .map(|bar| self.model.premium_bar(&mut *rng, contract, bar, days_to_expiry))
                .collect::<Vec<_>>()
        };

        debug!(days_to_expiry, count = candles.len(), "Premium series generated");
        Ok(OptionCandles {
            contract: contract.clone(),
            date,
            candles,
        })
    }
}

/// Parse an underlying type tag, reporting failures as an options error.
pub fn parse_underlying_type(s: &str) -> OptionsResult<UnderlyingType> {
    s.parse()
        .map_err(|_| OptionsError::InvalidUnderlyingType(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OptionType;
    use assert_matches::assert_matches;
    use instrument::InstrumentResolver;
    use market_data::{InMemoryCandleSource, MarketDataError, TradingSession};
    use std::sync::Arc;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 25).unwrap()
    }

    fn engine(seed: u64) -> OptionsEngine {
        let market = MarketDataService::synthetic(Some(seed), TradingSession::nse());
        OptionsEngine::new(market, Some(seed))
    }

    #[tokio::test]
    async fn test_contract_count_and_order() {
        let engine = engine(1);

        for levels in [0u32, 1, 5, 10] {
            let contracts = engine
                .generate_contracts_on(day(), UnderlyingType::Stock, "RELIANCE", expiry(), levels, 50.0)
                .await
                .unwrap();

            assert_eq!(contracts.len(), 2 * (2 * levels as usize + 1));
            for pair in contracts.chunks(2) {
                assert_eq!(pair[0].option_type, OptionType::Call);
                assert_eq!(pair[1].option_type, OptionType::Put);
                assert_eq!(pair[0].strike, pair[1].strike);
                assert_eq!(pair[0].strike % 50.0, 0.0);
            }
            let strikes: Vec<f64> = contracts.iter().step_by(2).map(|c| c.strike).collect();
            assert!(strikes.windows(2).all(|w| w[0] < w[1]));
            assert!(contracts.iter().all(|c| c.expiry_date == expiry() && c.underlying == "RELIANCE"));
        }
    }

    #[tokio::test]
    async fn test_sector_contracts() {
        let contracts = engine(2)
            .generate_contracts_on(day(), UnderlyingType::Sector, "NIFTY 50", expiry(), 5, 100.0)
            .await
            .unwrap();

        assert_eq!(contracts.len(), 22);
        assert!(contracts.iter().all(|c| c.underlying_type == UnderlyingType::Sector));
        // Index-scale spot
        assert!(contracts[10].strike >= 9_000.0);
    }

    #[tokio::test]
    async fn test_invalid_strike_interval() {
        assert_matches!(
            engine(3)
                .generate_contracts_on(day(), UnderlyingType::Stock, "X", expiry(), 5, 0.0)
                .await,
            Err(OptionsError::InvalidStrikeInterval(_))
        );
    }

    #[tokio::test]
    async fn test_atm_levels_above_max_rejected() {
        let engine = engine(3);
        let max = engine.max_atm_levels();

        assert_matches!(
            engine
                .generate_contracts_on(day(), UnderlyingType::Stock, "RELIANCE", expiry(), max + 1, 50.0)
                .await,
            Err(OptionsError::InvalidAtmLevels { requested, .. }) if requested == max + 1
        );
        assert_matches!(
            engine
                .generate_contracts_on(day(), UnderlyingType::Stock, "RELIANCE", expiry(), u32::MAX, 50.0)
                .await,
            Err(OptionsError::InvalidAtmLevels { .. })
        );
        let widest = engine
            .generate_contracts_on(day(), UnderlyingType::Stock, "RELIANCE", expiry(), max, 50.0)
            .await
            .unwrap();
        assert_eq!(widest.len(), 2 * (2 * max as usize + 1));
    }

    #[tokio::test]
    async fn test_premium_series_aligned_with_underlying() {
        let seed = 4;
        let market = MarketDataService::synthetic(Some(seed), TradingSession::nse());
        let underlying = MarketDataService::synthetic(Some(seed), TradingSession::nse())
            .get_stock_data("RELIANCE", day(), true)
            .await
            .unwrap();
        let engine = OptionsEngine::new(market, Some(seed));

        let contract = OptionContract::new(UnderlyingType::Stock, "RELIANCE", expiry(), OptionType::Put, 1_500.0);
        let series = engine.generate_premium_series(&contract, day()).await.unwrap();

        assert_eq!(series.contract, contract);
        assert_eq!(series.date, day());
        assert_eq!(series.candles.len(), underlying.intraday().len());
        for (premium, bar) in series.candles.iter().zip(underlying.intraday()) {
            assert_eq!(premium.time, bar.time);
            assert_eq!(premium.volume, bar.volume / 10);
            assert!(premium.is_consistent());
            assert!(premium.close >= 1.0);
        }
    }

    #[tokio::test]
    async fn test_expired_contract_prices_intrinsic_only() {
        let engine = engine(5);
        // Far out of the money and past expiry: floored at the minimum
        let contract = OptionContract::new(
            UnderlyingType::Stock,
            "TCS",
            NaiveDate::from_ymd_opt(2023, 12, 28).unwrap(),
            OptionType::Call,
            100_000.0,
        );

        let series = engine.generate_premium_series(&contract, day()).await.unwrap();
        assert!(!series.candles.is_empty());
        assert!(series.candles.iter().all(|c| c.close == 1.0));
    }

    #[tokio::test]
    async fn test_any_finite_strike_is_priced() {
        let engine = engine(8);

        for strike in [0.0, -50.0] {
            let contract = OptionContract::new(UnderlyingType::Stock, "RELIANCE", expiry(), OptionType::Put, strike);
            let series = engine.generate_premium_series(&contract, day()).await.unwrap();
            assert!(series.candles.iter().all(|c| c.close >= 1.0 && c.is_consistent()));
        }

        let contract = OptionContract::new(UnderlyingType::Stock, "RELIANCE", expiry(), OptionType::Call, f64::NAN);
        assert_matches!(
            engine.generate_premium_series(&contract, day()).await,
            Err(OptionsError::InvalidStrike(_))
        );
    }

    #[tokio::test]
    async fn test_unknown_underlying_propagates_not_found() {
        let market = MarketDataService::live(
            Arc::new(InstrumentResolver::empty()),
            Arc::new(InMemoryCandleSource::new()),
        );
        let engine = OptionsEngine::new(market, Some(6));
        let contract = OptionContract::new(UnderlyingType::Stock, "UNKNOWN_XYZ", expiry(), OptionType::Call, 100.0);

        assert_matches!(
            engine.generate_premium_series(&contract, day()).await,
            Err(OptionsError::MarketData(MarketDataError::NotFound(_)))
        );
        assert_matches!(
            engine
                .generate_contracts_on(day(), UnderlyingType::Stock, "UNKNOWN_XYZ", expiry(), 5, 50.0)
                .await,
            Err(OptionsError::MarketData(MarketDataError::NotFound(_)))
        );
    }

    #[test]
    fn test_parse_underlying_type() {
        assert_eq!(parse_underlying_type("sector").unwrap(), UnderlyingType::Sector);
        assert_matches!(
            parse_underlying_type("crypto"),
            Err(OptionsError::InvalidUnderlyingType(s)) if s == "crypto"
        );
    }

    #[test]
    fn test_from_config_defaults() {
        let market = MarketDataService::synthetic(Some(7), TradingSession::nse());
        let config = OptionsConfig {
            default_atm_levels: 3,
            max_atm_levels: 20,
            default_strike_interval: 25.0,
            seed: Some(7),
        };
        let engine = OptionsEngine::from_config(&config, market);

        assert_eq!(engine.default_atm_levels(), 3);
        assert_eq!(engine.max_atm_levels(), 20);
        assert_eq!(engine.default_strike_interval(), 25.0);
    }
}
