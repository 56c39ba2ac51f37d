//! The data access facade.
//!
//! One [`SeriesGenerator`] is chosen at startup and every call goes through it.

use crate::error::{MarketDataError, MarketDataResult};
use crate::generator::SeriesGenerator;
use crate::live::LiveSeriesGenerator;
use crate::session::TradingSession;
use crate::source::{CandleSource, HttpCandleSource};
use crate::synthetic::SyntheticSeriesGenerator;
use crate::types::{Bar, DailyRecord, UnderlyingType};
use chrono::NaiveDate;
use config::{MasterConfig, ProviderKind};
use instrument::InstrumentResolver;
use observability::{CallOutcome, DataMetrics};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Entry point for underlying market data.
#[derive(Clone)]
pub struct MarketDataService {
    generator: Arc<dyn SeriesGenerator>,
    metrics: DataMetrics,
}

impl fmt::Debug for MarketDataService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketDataService")
            .field("provider", &self.generator.name())
            .finish()
    }
}

impl MarketDataService {
    pub fn new(generator: Arc<dyn SeriesGenerator>) -> Self {
        let metrics = DataMetrics::new(generator.name());
        Self { generator, metrics }
    }

    /// Facade over the live candle source.
    pub fn live(resolver: Arc<InstrumentResolver>, source: Arc<dyn CandleSource>) -> Self {
        Self::new(Arc::new(LiveSeriesGenerator::new(resolver, source)))
    }

    /// Facade over the random-walk generator.
    pub fn synthetic(seed: Option<u64>, session: TradingSession) -> Self {
        Self::new(Arc::new(SyntheticSeriesGenerator::new(seed, session)))
    }

    /// Build the strategy named by `config.provider`.
    ///
    /// The resolver is only consulted by the live strategy; it is expected to
    /// be loaded (or left empty after a failed load) before requests arrive.
    pub fn from_config(config: &MasterConfig, resolver: Arc<InstrumentResolver>) -> MarketDataResult<Self> {
        let service = match config.provider {
            ProviderKind::Live => {
                let live = &config.live;
                let source = HttpCandleSource::new(
                    &live.candle_base_url,
                    Duration::from_secs(live.timeout_seconds),
                    &live.user_agent,
                )?;
                Self::live(resolver, Arc::new(source))
            }
            ProviderKind::Synthetic => {
                let session = TradingSession::from_config(&config.synthetic)?;
                Self::synthetic(config.synthetic.seed, session)
            }
        };

        info!(provider = service.provider_name(), "Market data provider selected");
        Ok(service)
    }

    /// Name of the active strategy.
    pub fn provider_name(&self) -> &'static str {
        self.generator.name()
    }

    /// Daily record for any underlying type.
    pub async fn get_daily(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
        timewise: bool,
    ) -> MarketDataResult<DailyRecord> {
        let result = self
            .generator
            .get_daily(underlying, symbol, date, timewise)
            .await;
        self.record("get_daily", &result);
        result
    }

    /// Intraday bars only.
    pub async fn get_intraday(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
    ) -> MarketDataResult<Vec<Bar>> {
        let result = self.generator.get_intraday(underlying, symbol, date).await;
        self.record("get_intraday", &result);
        result
    }

    pub async fn get_stock_data(&self, symbol: &str, date: NaiveDate, timewise: bool) -> MarketDataResult<DailyRecord> {
        self.get_daily(UnderlyingType::Stock, symbol, date, timewise)
            .await
    }

    pub async fn get_sector_data(&self, symbol: &str, date: NaiveDate, timewise: bool) -> MarketDataResult<DailyRecord> {
        self.get_daily(UnderlyingType::Sector, symbol, date, timewise)
            .await
    }

    fn record<T>(&self, operation: &'static str, result: &Result<T, MarketDataError>) {
        let outcome = match result {
            Ok(_) => CallOutcome::Ok,
            Err(e) => e.outcome(),
        };
        self.metrics.record_call(operation, outcome);
    }
}
