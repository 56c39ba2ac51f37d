//! Prometheus metrics
//!
//! Metrics are recorded through the `metrics` facade. Without an installed
//! exporter every call is a no-op, so library code records unconditionally and
//! only the binary decides whether to call [`init_metrics`].

use metrics::{counter, gauge, histogram, Counter, Histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::{Duration, Instant};

/// Start the Prometheus exporter, serving `/metrics` on `port`.
pub fn init_metrics(port: u16) -> anyhow::Result<()> {
    let addr: SocketAddr = format!("0.0.0.0:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    tracing::info!(%addr, "Metrics server listening");
    Ok(())
}

/// How a data-path call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallOutcome {
    Ok,
    NotFound,
    NoData,
    Upstream,
    Invalid,
}

impl CallOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CallOutcome::Ok => "ok",
            CallOutcome::NotFound => "not_found",
            CallOutcome::NoData => "no_data",
            CallOutcome::Upstream => "upstream_error",
            CallOutcome::Invalid => "invalid",
        }
    }
}

/// Metrics for underlying and options data generation.
///
/// * `tickforge_data_calls_total{provider, operation, outcome}`
/// * `tickforge_upstream_latency_seconds{provider, interval}`
/// * `tickforge_reference_symbols`
/// * `tickforge_intraday_degraded_total{provider}`
#[derive(Debug, Clone)]
pub struct DataMetrics {
    provider: String,
}

impl DataMetrics {
    /// Metrics labelled with the active provider (`live`, `synthetic`).
    pub fn new(provider: &str) -> Self {
        Self {
            provider: provider.to_string(),
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    /// Count one completed operation.
    pub fn record_call(&self, operation: &'static str, outcome: CallOutcome) {
        counter!(
            "tickforge_data_calls_total",
            "provider" => self.provider.clone(),
            "operation" => operation,
            "outcome" => outcome.as_str()
        )
        .increment(1);
    }

    /// Record one round trip to an upstream candle source.
    pub fn record_upstream_latency(&self, interval: &'static str, elapsed: Duration) {
        histogram!(
            "tickforge_upstream_latency_seconds",
            "provider" => self.provider.clone(),
            "interval" => interval
        )
        .record(elapsed.as_secs_f64());
    }

    /// An intraday fetch failed and the daily record went out without it.
    pub fn record_intraday_degraded(&self) {
        counter!("tickforge_intraday_degraded_total", "provider" => self.provider.clone())
            .increment(1);
    }

    /// Size of the currently published reference table.
    pub fn set_reference_symbols(&self, count: usize) {
        gauge!("tickforge_reference_symbols").set(count as f64);
    }
}

/// Per-route HTTP request metrics for the API gateway.
///
/// * `tickforge_http_requests_total{route, status}`
/// * `tickforge_http_request_duration_seconds{route}`
#[derive(Clone)]
pub struct RequestMetrics {
    route: String,
    duration: Histogram,
}

impl RequestMetrics {
    pub fn new(route: &str) -> Self {
        Self {
            route: route.to_string(),
            duration: histogram!("tickforge_http_request_duration_seconds", "route" => route.to_string()),
        }
    }

    fn requests(&self, status: u16) -> Counter {
        counter!(
            "tickforge_http_requests_total",
            "route" => self.route.clone(),
            "status" => status.to_string()
        )
    }

    /// Record a completed request.
    pub fn record(&self, status: u16, elapsed: Duration) {
        self.requests(status).increment(1);
        self.duration.record(elapsed.as_secs_f64());
    }

    /// Start timing a request; the guard records on drop.
    pub fn start(&self) -> RequestTimer<'_> {
        RequestTimer {
            metrics: self,
            start: Instant::now(),
            status: 200,
        }
    }

    pub fn route(&self) -> &str {
        &self.route
    }
}

/// Records the elapsed time of a request when dropped.
pub struct RequestTimer<'a> {
    metrics: &'a RequestMetrics,
    start: Instant,
    status: u16,
}

impl RequestTimer<'_> {
    /// Set the status code recorded on drop.
    pub fn set_status(&mut self, status: u16) {
        self.status = status;
    }
}

impl Drop for RequestTimer<'_> {
    fn drop(&mut self) {
        self.metrics.record(self.status, self.start.elapsed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_exporter_is_noop() {
        let metrics = DataMetrics::new("synthetic");
        metrics.record_call("get_daily", CallOutcome::Ok);
        metrics.record_upstream_latency("day", Duration::from_millis(5));
        metrics.record_intraday_degraded();
        metrics.set_reference_symbols(10);
        assert_eq!(metrics.provider(), "synthetic");
    }

    #[test]
    fn test_request_timer() {
        let metrics = RequestMetrics::new("/api/v1/stock/data");
        {
            let mut timer = metrics.start();
            timer.set_status(404);
        }
        assert_eq!(metrics.route(), "/api/v1/stock/data");
    }

    #[test]
    fn test_outcome_labels() {
        assert_eq!(CallOutcome::Upstream.as_str(), "upstream_error");
        assert_eq!(CallOutcome::NoData.as_str(), "no_data");
    }
}
