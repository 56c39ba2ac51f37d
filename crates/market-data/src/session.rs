//! Trading session layout for intraday series.

use crate::error::{MarketDataError, MarketDataResult};
use chrono::{Duration, FixedOffset, NaiveDate, NaiveTime, Utc};
use config::SyntheticConfig;

/// Label format for intraday bars.
pub const TIME_LABEL_FORMAT: &str = "%H:%M";

/// Offset of the market's local time (IST) from UTC, in seconds.
pub const MARKET_UTC_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

/// Current calendar date in the market's time zone.
pub fn market_today() -> NaiveDate {
    let now = Utc::now();
    match FixedOffset::east_opt(MARKET_UTC_OFFSET_SECS) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// A trading day's intraday grid: fixed-width slots from open to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradingSession {
    open: NaiveTime,
    close: NaiveTime,
    interval: Duration,
}

impl TradingSession {
    pub fn new(open: NaiveTime, close: NaiveTime, interval_minutes: u32) -> MarketDataResult<Self> {
        if interval_minutes == 0 {
            return Err(MarketDataError::Config("session interval must be positive".into()));
        }
        let interval = Duration::minutes(i64::from(interval_minutes));
        if !matches!(advance(open, interval), Some(end) if end <= close) {
            return Err(MarketDataError::Config(format!(
                "session {}-{} holds no {}-minute slot",
                open.format(TIME_LABEL_FORMAT),
                close.format(TIME_LABEL_FORMAT),
                interval_minutes
            )));
        }

        Ok(Self {
            open,
            close,
            interval,
        })
    }

    /// NSE cash session, 09:15 to 15:30 in 5-minute bars.
    pub fn nse() -> Self {
        Self {
            open: NaiveTime::from_hms_opt(9, 15, 0).unwrap_or_default(),
            close: NaiveTime::from_hms_opt(15, 30, 0).unwrap_or_default(),
            interval: Duration::minutes(5),
        }
    }

    pub fn from_config(config: &SyntheticConfig) -> MarketDataResult<Self> {
        let parse = |s: &str| {
            NaiveTime::parse_from_str(s, TIME_LABEL_FORMAT)
                .map_err(|e| MarketDataError::Config(format!("invalid session time '{}': {}", s, e)))
        };
        Self::new(
            parse(&config.session_open)?,
            parse(&config.session_close)?,
            config.interval_minutes,
        )
    }

    /// Slot start times. A trailing partial slot before the close is dropped.
    pub fn slots(&self) -> Vec<NaiveTime> {
        let mut slots = Vec::new();
        let mut start = self.open;
        while let Some(end) = advance(start, self.interval).filter(|end| *end <= self.close) {
            slots.push(start);
            start = end;
        }
        slots
    }

    /// Slot labels as `HH:MM`.
    pub fn labels(&self) -> Vec<String> {
        self.slots()
            .into_iter()
            .map(|t| t.format(TIME_LABEL_FORMAT).to_string())
            .collect()
    }

    /// Number of full slots in the session.
    pub fn len(&self) -> usize {
        self.slots().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// `time + step`, or `None` past midnight.
fn advance(time: NaiveTime, step: Duration) -> Option<NaiveTime> {
    match time.overflowing_add_signed(step) {
        (next, 0) => Some(next),
        _ => None,
    }
}

impl Default for TradingSession {
    fn default() -> Self {
        Self::nse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_nse_session_slots() {
        let labels = TradingSession::nse().labels();

        assert_eq!(labels.len(), 75);
        assert_eq!(labels.first().unwrap(), "09:15");
        assert_eq!(labels.last().unwrap(), "15:25");
        assert!(labels.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_partial_last_slot_truncated() {
        let session = TradingSession::new(t(9, 15), t(9, 32), 5).unwrap();
        assert_eq!(session.labels(), vec!["09:15", "09:20", "09:25"]);
    }

    #[test]
    fn test_from_config() {
        let config = SyntheticConfig {
            seed: None,
            session_open: "10:00".into(),
            session_close: "11:00".into(),
            interval_minutes: 15,
        };
        let session = TradingSession::from_config(&config).unwrap();
        assert_eq!(session.labels(), vec!["10:00", "10:15", "10:30", "10:45"]);

        let bad = SyntheticConfig {
            session_open: "ten".into(),
            ..config
        };
        assert_matches!(TradingSession::from_config(&bad), Err(MarketDataError::Config(_)));
    }

    #[test]
    fn test_session_ending_at_midnight_terminates() {
        let session = TradingSession::new(t(23, 45), t(23, 59), 5).unwrap();
        assert_eq!(session.labels(), vec!["23:45", "23:50"]);
    }

    #[test]
    fn test_market_today_is_close_to_utc_today() {
        let diff = (market_today() - Utc::now().date_naive()).num_days();
        assert!((0..=1).contains(&diff));
    }

    #[test]
    fn test_empty_session_rejected() {
        assert!(TradingSession::new(t(15, 30), t(15, 30), 5).is_err());
        assert!(TradingSession::new(t(9, 15), t(15, 30), 0).is_err());
    }
}
