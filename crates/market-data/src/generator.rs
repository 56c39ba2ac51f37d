//! The underlying series contract shared by the live and synthetic strategies.

use crate::error::MarketDataResult;
use crate::types::{Bar, DailyRecord, UnderlyingType};
use async_trait::async_trait;
use chrono::NaiveDate;

/// Produces daily and intraday OHLCV series for an underlying.
///
/// Implementations must hand out bars whose high and low bound open and
/// close, and intraday bars in ascending time order.
#[async_trait]
pub trait SeriesGenerator: Send + Sync {
    /// Short strategy name, used in logs and metric labels.
    fn name(&self) -> &'static str;

    /// Daily record for `symbol` on `date`, with the intraday series attached
    /// when `include_intraday` is set.
    async fn get_daily(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
        include_intraday: bool,
    ) -> MarketDataResult<DailyRecord>;

    /// Intraday bars for `symbol` on `date`, oldest first.
    async fn get_intraday(
        &self,
        underlying: UnderlyingType,
        symbol: &str,
        date: NaiveDate,
    ) -> MarketDataResult<Vec<Bar>>;
}
