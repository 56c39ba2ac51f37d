//! Historical candle sources.
//!
//! The live strategy talks to an upstream historical-candle API through the
//! [`CandleSource`] trait. The HTTP implementation targets the Upstox v2
//! public endpoint; tests use [`InMemoryCandleSource`].

use crate::error::{MarketDataError, MarketDataResult};
use crate::session::TIME_LABEL_FORMAT;
use crate::types::{Bar, CandleInterval};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate};
use instrument::InstrumentKey;
use parking_lot::Mutex;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tracing::debug;

/// Minimum fields in an upstream candle row: timestamp, open, high, low, close, volume.
const MIN_CANDLE_FIELDS: usize = 6;

/// A candle exactly as the upstream reported it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCandle {
    /// RFC 3339 timestamp, e.g. `2024-01-02T09:15:00+05:30`
    pub timestamp: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
    pub open_interest: Option<i64>,
}

impl RawCandle {
    pub fn new(timestamp: impl Into<String>, open: f64, high: f64, low: f64, close: f64, volume: i64) -> Self {
        Self {
            timestamp: timestamp.into(),
            open,
            high,
            low,
            close,
            volume,
            open_interest: None,
        }
    }

    /// Wall-clock `HH:MM` in the timestamp's own offset; the raw string if unparseable.
    pub fn time_label(&self) -> String {
        DateTime::parse_from_rfc3339(&self.timestamp)
            .map(|ts| ts.format(TIME_LABEL_FORMAT).to_string())
            .unwrap_or_else(|_| self.timestamp.clone())
    }

    /// Convert into a bar with the given label, enforcing the high/low bounds.
    pub fn into_bar(self, time: impl Into<String>) -> Bar {
        Bar::new(time, self.open, self.high, self.low, self.close, self.volume)
    }
}

/// Source of historical OHLCV candles.
#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Fetch candles for `key` between `from` and `to` inclusive.
    ///
    /// Intraday candles come back newest-first.
    async fn fetch(
        &self,
        key: &InstrumentKey,
        interval: CandleInterval,
        from: NaiveDate,
        to: NaiveDate,
    ) -> MarketDataResult<Vec<RawCandle>>;
}

#[derive(Debug, Deserialize)]
struct CandleEnvelope {
    status: String,
    #[serde(default)]
    data: Option<CandleData>,
}

#[derive(Debug, Deserialize)]
struct CandleData {
    #[serde(default)]
    candles: Vec<Vec<Value>>,
}

/// Decode an upstream candle response body.
///
/// The envelope must report `status: "success"`. Rows shorter than six fields
/// are dropped; missing or non-numeric values decode as zero.
pub fn decode_candles(body: &[u8]) -> MarketDataResult<Vec<RawCandle>> {
    let envelope: CandleEnvelope = serde_json::from_slice(body)?;

    if envelope.status != "success" {
        return Err(MarketDataError::upstream(format!("api status: {}", envelope.status)));
    }

    let rows = envelope.data.map(|d| d.candles).unwrap_or_default();
    Ok(rows.iter().filter_map(|row| decode_row(row)).collect())
}

fn decode_row(row: &[Value]) -> Option<RawCandle> {
    if row.len() < MIN_CANDLE_FIELDS {
        return None;
    }

    let number = |i: usize| row.get(i).and_then(Value::as_f64).unwrap_or(0.0);
    let timestamp = match &row[0] {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    };

    Some(RawCandle {
        timestamp,
        open: number(1),
        high: number(2),
        low: number(3),
        close: number(4),
        volume: number(5) as i64,
        open_interest: row.get(6).and_then(Value::as_f64).map(|oi| oi as i64),
    })
}

// ==================== HTTP Implementation ====================

/// Historical candle API over HTTP(S).
///
/// `GET {base}/historical-candle/{key}/{interval}/{to}/{from}`, with the `|`
/// in the instrument key sent as `%7C`.
pub struct HttpCandleSource {
    client: Client,
    base_url: String,
}

impl HttpCandleSource {
    pub fn new(base_url: &str, timeout: Duration, user_agent: &str) -> MarketDataResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| MarketDataError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Request URL for a candle query. Note the upstream's `to` before `from` order.
    pub fn candle_url(&self, key: &InstrumentKey, interval: CandleInterval, from: NaiveDate, to: NaiveDate) -> String {
        format!(
            "{}/historical-candle/{}/{}/{}/{}",
            self.base_url,
            key.as_str().replace('|', "%7C"),
            interval.as_str(),
            to.format("%Y-%m-%d"),
            from.format("%Y-%m-%d"),
        )
    }
}

#[async_trait]
impl CandleSource for HttpCandleSource {
    #[tracing::instrument(skip(self, key), fields(key = %key))]
    async fn fetch(
        &self,
        key: &InstrumentKey,
        interval: CandleInterval,
        from: NaiveDate,
        to: NaiveDate,
    ) -> MarketDataResult<Vec<RawCandle>> {
        let url = self.candle_url(key, interval, from, to);

        let response = self
            .client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MarketDataError::upstream(format!("status: {}, body: {}", status, body)));
        }

        let body = response.bytes().await?;
        let candles = decode_candles(&body)?;
        debug!(count = candles.len(), "Candles fetched");
        Ok(candles)
    }
}

// ==================== In-Memory Implementation ====================

type CandleKey = (String, CandleInterval, NaiveDate);

/// Canned candle responses keyed by instrument, interval and date.
///
/// Unknown queries return an empty list, like an upstream with no data.
#[derive(Default)]
pub struct InMemoryCandleSource {
    responses: Mutex<HashMap<CandleKey, MarketDataResult<Vec<RawCandle>>>>,
    requests: Mutex<Vec<CandleKey>>,
}

impl InMemoryCandleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `candles` for the query.
    pub fn with_candles(self, key: &str, interval: CandleInterval, date: NaiveDate, candles: Vec<RawCandle>) -> Self {
        self.responses
            .lock()
            .insert((key.to_string(), interval, date), Ok(candles));
        self
    }

    /// Fail the query with `error`.
    pub fn with_failure(self, key: &str, interval: CandleInterval, date: NaiveDate, error: MarketDataError) -> Self {
        self.responses
            .lock()
            .insert((key.to_string(), interval, date), Err(error));
        self
    }

    /// Number of fetches served so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl CandleSource for InMemoryCandleSource {
    async fn fetch(
        &self,
        key: &InstrumentKey,
        interval: CandleInterval,
        from: NaiveDate,
        _to: NaiveDate,
    ) -> MarketDataResult<Vec<RawCandle>> {
        let lookup = (key.as_str().to_string(), interval, from);
        self.requests.lock().push(lookup.clone());

        self.responses
            .lock()
            .get(&lookup)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}
