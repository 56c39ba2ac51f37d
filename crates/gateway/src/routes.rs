//! Axum route definitions for the Tickforge API.

use crate::handlers;
use crate::state::AppState;
use axum::extract::{MatchedPath, Request};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use observability::RequestMetrics;
use tower_http::trace::TraceLayer;

/// Create all API routes.
///
/// # Routes
///
/// - `GET /health` - Service health
/// - `GET /api/v1/stock/data` - Daily stock record, optional intraday
/// - `GET /api/v1/sector/data` - Daily sector record, optional intraday
/// - `GET /api/v1/options/contracts` - Contract ladder around spot
/// - `GET /api/v1/options/candles/5min` - Premium candles for one contract
///
/// Authentication is handled in front of this service.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/api/v1/stock/data", get(handlers::get_stock_data))
        .route("/api/v1/sector/data", get(handlers::get_sector_data))
        .route("/api/v1/options/contracts", get(handlers::get_option_contracts))
        .route("/api/v1/options/candles/5min", get(handlers::get_option_candles))
        .route_layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn track_metrics(request: Request, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let metrics = RequestMetrics::new(&route);
    let mut timer = metrics.start();
    let response = next.run(request).await;
    timer.set_status(response.status().as_u16());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use instrument::{InstrumentResolver, ReferenceTable};
    use market_data::{
        CandleInterval, InMemoryCandleSource, MarketDataService, RawCandle, TradingSession,
    };
    use options::OptionsEngine;
    use serde_json::Value;
    use server::HealthState;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn synthetic_app() -> Router {
        let market = MarketDataService::synthetic(Some(11), TradingSession::nse());
        let options = OptionsEngine::new(market.clone(), Some(11));
        router(AppState::new(market, options, HealthState::new("tickforge")))
    }

    fn live_app() -> Router {
        let mut builder = ReferenceTable::builder();
        builder.insert("RELIANCE", "NSE_EQ|INE002A01018");
        let resolver = Arc::new(InstrumentResolver::new(builder.build()));
        let date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let source = InMemoryCandleSource::new().with_candles(
            "NSE_EQ|INE002A01018",
            CandleInterval::Day,
            date,
            vec![RawCandle::new("2024-01-02T00:00:00+05:30", 2500.0, 2550.0, 2480.0, 2510.0, 1_200_000)],
        );
        let market = MarketDataService::live(resolver, Arc::new(source));
        let options = OptionsEngine::new(market.clone(), Some(12));
        router(AppState::new(market, options, HealthState::new("tickforge")))
    }

    async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, json) = get(synthetic_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["service"], "tickforge");
    }

    #[tokio::test]
    async fn test_stock_data_live() {
        let (status, json) = get(live_app(), "/api/v1/stock/data?symbol=RELIANCE&date=2024-01-02").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Stock data retrieved successfully");
        assert_eq!(json["data"]["open_price"], 2500.0);
        assert_eq!(json["data"]["close_price"], 2510.0);
        assert_eq!(json["data"]["volume"], 1_200_000);
        assert!(json["data"].get("timewise").is_none());
    }

    #[tokio::test]
    async fn test_unknown_symbol_is_404() {
        let (status, json) = get(live_app(), "/api/v1/sector/data?symbol=UNKNOWN_XYZ&date=2024-01-02").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["status"], "error");
        assert_eq!(json["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_missing_parameters_is_400() {
        for uri in [
            "/api/v1/stock/data?symbol=RELIANCE",
            "/api/v1/sector/data?date=2024-01-02",
            "/api/v1/options/contracts?underlying_type=stock",
            "/api/v1/options/candles/5min?underlying_type=stock&underlying=RELIANCE",
        ] {
            let (status, json) = get(synthetic_app(), uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(json["code"], "MISSING_PARAMETERS", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_bad_date_is_400() {
        let (status, json) = get(synthetic_app(), "/api/v1/stock/data?symbol=TCS&date=2024-13-01").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_DATE");
    }

    #[tokio::test]
    async fn test_timewise_synthetic() {
        let (status, json) = get(synthetic_app(), "/api/v1/sector/data?symbol=NIFTY%2050&date=2024-01-02&timewise=true").await;

        assert_eq!(status, StatusCode::OK);
        let bars = json["data"]["timewise"].as_array().unwrap();
        assert_eq!(bars.len(), 75);
        assert_eq!(bars[0]["time"], "09:15");
    }

    #[tokio::test]
    async fn test_option_contracts_defaults() {
        let (status, json) = get(
            synthetic_app(),
            "/api/v1/options/contracts?underlying_type=stock&underlying=RELIANCE&expiry_date=2024-01-25",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Option contracts generated successfully");
        let contracts = json["data"].as_array().unwrap();
        assert_eq!(contracts.len(), 22);
        assert_eq!(contracts[0]["option_type"], "CE");
        assert_eq!(contracts[1]["option_type"], "PE");
    }

    #[tokio::test]
    async fn test_option_contracts_invalid_type() {
        let (status, json) = get(
            synthetic_app(),
            "/api/v1/options/contracts?underlying_type=crypto&underlying=BTC&expiry_date=2024-01-25",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_UNDERLYING_TYPE");
    }

    #[tokio::test]
    async fn test_option_contracts_oversized_ladder_is_400() {
        for levels in ["4294967295", "51"] {
            let uri = format!(
                "/api/v1/options/contracts?underlying_type=stock&underlying=RELIANCE&expiry_date=2024-01-25&atm_levels={levels}"
            );
            let (status, json) = get(synthetic_app(), &uri).await;

            assert_eq!(status, StatusCode::BAD_REQUEST, "{levels}");
            assert_eq!(json["code"], "INVALID_PARAMETERS", "{levels}");
        }

        // The server keeps answering afterwards
        let (status, _) = get(synthetic_app(), "/health").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_option_candles() {
        let (status, json) = get(
            synthetic_app(),
            "/api/v1/options/candles/5min?underlying_type=stock&underlying=RELIANCE&expiry_date=2024-01-25&option_type=CE&strike=1500&date=2024-01-02",
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["contract"]["strike"], 1500.0);
        assert_eq!(json["data"]["date"], "2024-01-02");
        let candles = json["data"]["candles"].as_array().unwrap();
        assert_eq!(candles.len(), 75);
        assert!(candles.iter().all(|c| c["close_price"].as_f64().unwrap() >= 1.0));
    }

    #[tokio::test]
    async fn test_option_candles_invalid_strike() {
        let (status, json) = get(
            synthetic_app(),
            "/api/v1/options/candles/5min?underlying_type=stock&underlying=RELIANCE&expiry_date=2024-01-25&option_type=CE&strike=abc&date=2024-01-02",
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["code"], "INVALID_STRIKE");
    }
}
