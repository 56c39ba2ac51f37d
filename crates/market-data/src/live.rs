//! Live strategy: resolve the symbol, then ask the historical candle source.

use crate::error::{MarketDataError, MarketDataResult};
use crate::generator::SeriesGenerator;
use crate::source::{CandleSource, RawCandle};
use crate::types::{Bar, CandleInterval, DailyRecord, UnderlyingType};
use async_trait::async_trait;
use chrono::NaiveDate;
use instrument::{InstrumentKey, InstrumentResolver};
use observability::DataMetrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

/// Implied volatility reported for live records. The upstream has no IV.
pub const LIVE_IV: f64 = 1.0;

/// Serves real candles for resolvable symbols.
pub struct LiveSeriesGenerator {
    resolver: Arc<InstrumentResolver>,
    source: Arc<dyn CandleSource>,
    metrics: DataMetrics,
}

impl LiveSeriesGenerator {
    pub fn new(resolver: Arc<InstrumentResolver>, source: Arc<dyn CandleSource>) -> Self {
        Self {
            resolver,
            source,
            metrics: DataMetrics::new("live"),
        }
    }

    async fn fetch(
        &self,
        key: &InstrumentKey,
        interval: CandleInterval,
        date: NaiveDate,
    ) -> MarketDataResult<Vec<RawCandle>> {
        let start = Instant::now();
        let result = self.source.fetch(key, interval, date, date).await;
        self.metrics
            .record_upstream_latency(interval.as_str(), start.elapsed());
        result
    }

    async fn intraday_for_key(&self, key: &InstrumentKey, date: NaiveDate) -> MarketDataResult<Vec<Bar>> {
        let candles = self.fetch(key, CandleInterval::FiveMinute, date).await?;

        // Upstream is newest-first
        Ok(candles
            .into_iter()
            .rev()
            .map(|candle| {
                let label = candle.time_label();
                candle.into_bar(label)
            })
            .collect())
    }
}

#[async_trait]
impl SeriesGenerator for LiveSeriesGenerator {
    fn name(&self) -> &'static str {
        "live"
    }

    #[tracing::instrument(skip(self), fields(provider = "live"))]
    async fn get_daily(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
        include_intraday: bool,
    ) -> MarketDataResult<DailyRecord> {
        let key = self.resolver.resolve(symbol)?;
        debug!(%key, "Symbol resolved");

        let candle = self
            .fetch(&key, CandleInterval::Day, date)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| MarketDataError::no_data(symbol, date))?;

        let bar = candle.into_bar(date.to_string());
        let mut record = DailyRecord::from_bar(symbol, underlying, date, bar, LIVE_IV);

        if include_intraday {
            let bars = match self.intraday_for_key(&key, date).await {
                Ok(bars) => bars,
                Err(e) => {
                    warn!(symbol, %date, error = %e, "Intraday fetch failed, returning daily record without it");
                    self.metrics.record_intraday_degraded();
                    Vec::new()
                }
            };
            record.timewise = Some(bars);
        }

        Ok(record)
    }

    #[tracing::instrument(skip(self), fields(provider = "live"))]
    async fn get_intraday(
        &self,
        _underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
    ) -> MarketDataResult<Vec<Bar>> {
        let key = self.resolver.resolve(symbol)?;
        self.intraday_for_key(&key, date).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::InMemoryCandleSource;
    use assert_matches::assert_matches;
    use instrument::ReferenceTable;

    const RELIANCE_KEY: &str = "NSE_EQ|INE002A01018";

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
    }

    fn resolver() -> Arc<InstrumentResolver> {
        let mut builder = ReferenceTable::builder();
        builder.insert("RELIANCE", RELIANCE_KEY);
        builder.insert_index_aliases();
        Arc::new(InstrumentResolver::new(builder.build()))
    }

    fn daily_candle() -> RawCandle {
        RawCandle::new("2024-01-02T00:00:00+05:30", 2500.0, 2550.0, 2480.0, 2510.0, 1_200_000)
    }

    fn intraday_newest_first() -> Vec<RawCandle> {
        vec![
            RawCandle::new("2024-01-02T09:25:00+05:30", 2506.0, 2512.0, 2504.0, 2510.0, 900),
            RawCandle::new("2024-01-02T09:20:00+05:30", 2503.0, 2507.0, 2501.0, 2506.0, 800),
            RawCandle::new("2024-01-02T09:15:00+05:30", 2500.0, 2505.0, 2498.0, 2503.0, 1000),
        ]
    }

    #[tokio::test]
    async fn test_daily_record_passes_source_values_through() {
        let source = InMemoryCandleSource::new().with_candles(RELIANCE_KEY, CandleInterval::Day, day(), vec![daily_candle()]);
        let generator = LiveSeriesGenerator::new(resolver(), Arc::new(source));

        let record = generator
            .get_daily(UnderlyingType::Stock, "RELIANCE", day(), false)
            .await
            .unwrap();

        assert_eq!(record.symbol, "RELIANCE");
        assert_eq!(record.date, day());
        assert_eq!(
            (record.open, record.high, record.low, record.close, record.volume),
            (2500.0, 2550.0, 2480.0, 2510.0, 1_200_000)
        );
        assert_eq!(record.iv, LIVE_IV);
        assert!(record.timewise.is_none());
    }

    #[tokio::test]
    async fn test_suffixed_symbol_resolves() {
        let source = InMemoryCandleSource::new().with_candles(RELIANCE_KEY, CandleInterval::Day, day(), vec![daily_candle()]);
        let generator = LiveSeriesGenerator::new(resolver(), Arc::new(source));

        let record = generator
            .get_daily(UnderlyingType::Stock, "RELIANCE.NS", day(), false)
            .await
            .unwrap();
        assert_eq!(record.symbol, "RELIANCE.NS");
        assert_eq!(record.close, 2510.0);
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_not_found() {
        let source = Arc::new(InMemoryCandleSource::new());
        let generator = LiveSeriesGenerator::new(resolver(), source.clone());

        assert_matches!(
            generator.get_daily(UnderlyingType::Stock, "UNKNOWN_XYZ", day(), true).await,
            Err(MarketDataError::NotFound(_))
        );
        // Never reached the upstream
        assert_eq!(source.request_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_day_is_no_data() {
        let generator = LiveSeriesGenerator::new(resolver(), Arc::new(InMemoryCandleSource::new()));

        assert_matches!(
            generator.get_daily(UnderlyingType::Sector, "NIFTY 50", day(), false).await,
            Err(MarketDataError::NoData { symbol, .. }) if symbol == "NIFTY 50"
        );
    }

    #[tokio::test]
    async fn test_upstream_failure_on_daily_propagates() {
        let source = InMemoryCandleSource::new().with_failure(
            RELIANCE_KEY,
            CandleInterval::Day,
            day(),
            MarketDataError::upstream("status: 503"),
        );
        let generator = LiveSeriesGenerator::new(resolver(), Arc::new(source));

        assert_matches!(
            generator.get_daily(UnderlyingType::Stock, "RELIANCE", day(), false).await,
            Err(MarketDataError::Upstream(_))
        );
    }

    #[tokio::test]
    async fn test_intraday_reversed_and_labelled() {
        let source = InMemoryCandleSource::new()
            .with_candles(RELIANCE_KEY, CandleInterval::Day, day(), vec![daily_candle()])
            .with_candles(RELIANCE_KEY, CandleInterval::FiveMinute, day(), intraday_newest_first());
        let generator = LiveSeriesGenerator::new(resolver(), Arc::new(source));

        let record = generator
            .get_daily(UnderlyingType::Stock, "RELIANCE", day(), true)
            .await
            .unwrap();

        let labels: Vec<&str> = record.intraday().iter().map(|b| b.time.as_str()).collect();
        assert_eq!(labels, vec!["09:15", "09:20", "09:25"]);
        assert_eq!(record.intraday()[0].open, 2500.0);
        assert!(record.intraday().iter().all(Bar::is_consistent));
    }

    #[tokio::test]
    async fn test_intraday_failure_degrades_to_empty() {
        let source = InMemoryCandleSource::new()
            .with_candles(RELIANCE_KEY, CandleInterval::Day, day(), vec![daily_candle()])
            .with_failure(
                RELIANCE_KEY,
                CandleInterval::FiveMinute,
                day(),
                MarketDataError::upstream("timeout"),
            );
        let generator = LiveSeriesGenerator::new(resolver(), Arc::new(source));

        let record = generator
            .get_daily(UnderlyingType::Stock, "RELIANCE", day(), true)
            .await
            .unwrap();

        assert_eq!(record.timewise, Some(Vec::new()));
        assert_eq!(record.close, 2510.0);

        // The standalone call does not degrade
        assert_matches!(
            generator.get_intraday(UnderlyingType::Stock, "RELIANCE", day()).await,
            Err(MarketDataError::Upstream(_))
        );
    }

    #[tokio::test]
    async fn test_inconsistent_source_bar_is_normalized() {
        let bad = RawCandle::new("2024-01-02T00:00:00+05:30", 100.0, 99.0, 101.0, 102.0, 5);
        let source = InMemoryCandleSource::new().with_candles(RELIANCE_KEY, CandleInterval::Day, day(), vec![bad]);
        let generator = LiveSeriesGenerator::new(resolver(), Arc::new(source));

        let record = generator
            .get_daily(UnderlyingType::Stock, "RELIANCE", day(), false)
            .await
            .unwrap();

        assert!(record.bar().is_consistent());
        assert_eq!(record.high, 102.0);
        assert_eq!(record.low, 100.0);
    }
}
