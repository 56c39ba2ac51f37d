//! HTTP request handlers.

use crate::error::ApiError;
use crate::models::*;
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use market_data::{DailyRecord, UnderlyingType};
use options::{parse_date, parse_underlying_type, OptionCandles, OptionContract, OptionType};
use server::HealthStatus;

type ApiResult<T> = Result<Json<SuccessResponse<T>>, ApiError>;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health.report().await)
}

/// GET /api/v1/stock/data
pub async fn get_stock_data(
    State(state): State<AppState>,
    Query(params): Query<UnderlyingDataParams>,
) -> ApiResult<DailyRecord> {
    let record = underlying_data(&state, UnderlyingType::Stock, &params).await?;
    Ok(Json(SuccessResponse::new("Stock data retrieved successfully", record)))
}

/// GET /api/v1/sector/data
pub async fn get_sector_data(
    State(state): State<AppState>,
    Query(params): Query<UnderlyingDataParams>,
) -> ApiResult<DailyRecord> {
    let record = underlying_data(&state, UnderlyingType::Sector, &params).await?;
    Ok(Json(SuccessResponse::new("Sector data retrieved successfully", record)))
}

async fn underlying_data(
    state: &AppState,
    underlying: UnderlyingType,
    params: &UnderlyingDataParams,
) -> Result<DailyRecord, ApiError> {
    let (Some(symbol), Some(date)) = (required(&params.symbol), required(&params.date)) else {
        return Err(ApiError::missing_parameters("symbol and date are required"));
    };
    let date = parse_date(date)?;

    Ok(state
        .market
        .get_daily(underlying, symbol, date, params.include_intraday())
        .await?)
}

/// GET /api/v1/options/contracts
pub async fn get_option_contracts(
    State(state): State<AppState>,
    Query(params): Query<ContractsParams>,
) -> ApiResult<Vec<OptionContract>> {
    let (Some(underlying_type), Some(underlying), Some(expiry_date)) = (
        required(&params.underlying_type),
        required(&params.underlying),
        required(&params.expiry_date),
    ) else {
        return Err(ApiError::missing_parameters(
            "underlying_type, underlying and expiry_date are required",
        ));
    };

    let underlying_type = parse_underlying_type(underlying_type)?;
    let expiry_date = parse_date(expiry_date)?;
    let atm_levels = match required(&params.atm_levels) {
        Some(raw) => raw
            .parse::<u32>()
            .map_err(|_| ApiError::invalid_parameter("atm_levels must be a non-negative integer"))?,
        None => state.options.default_atm_levels(),
    };
    let strike_interval = match required(&params.strike_interval) {
        Some(raw) => raw
            .parse::<f64>()
            .map_err(|_| ApiError::invalid_parameter("strike_interval must be a number"))?,
        None => state.options.default_strike_interval(),
    };

    let contracts = state
        .options
        .generate_contracts(underlying_type, underlying, expiry_date, atm_levels, strike_interval)
        .await?;

    Ok(Json(SuccessResponse::new("Option contracts generated successfully", contracts)))
}

/// GET /api/v1/options/candles/5min
pub async fn get_option_candles(
    State(state): State<AppState>,
    Query(params): Query<OptionCandlesParams>,
) -> ApiResult<OptionCandles> {
    let (
        Some(underlying_type),
        Some(underlying),
        Some(expiry_date),
        Some(option_type),
        Some(strike),
        Some(date),
    ) = (
        required(&params.underlying_type),
        required(&params.underlying),
        required(&params.expiry_date),
        required(&params.option_type),
        required(&params.strike),
        required(&params.date),
    )
    else {
        return Err(ApiError::missing_parameters(
            "All parameters are required: underlying_type, underlying, expiry_date, option_type, strike, date",
        ));
    };

    let strike = strike
        .parse::<f64>()
        .ok()
        .filter(|s| s.is_finite())
        .ok_or_else(ApiError::invalid_strike)?;

    let contract = OptionContract::new(
        parse_underlying_type(underlying_type)?,
        underlying,
        parse_date(expiry_date)?,
        option_type.parse::<OptionType>()?,
        strike,
    );
    let date = parse_date(date)?;

    let candles = state.options.generate_premium_series(&contract, date).await?;
    Ok(Json(SuccessResponse::new("Option candles generated successfully", candles)))
}
