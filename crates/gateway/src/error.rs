//! Mapping from core errors to HTTP responses

use crate::models::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use market_data::MarketDataError;
use options::OptionsError;
use tracing::warn;

/// An error response: status, machine code and message.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn missing_parameters(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "MISSING_PARAMETERS", message)
    }

    pub fn invalid_strike() -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_STRIKE", "Strike must be a valid number")
    }

    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "INVALID_PARAMETERS", message)
    }
}

impl From<MarketDataError> for ApiError {
    fn from(err: MarketDataError) -> Self {
        let (status, code) = match &err {
            MarketDataError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            MarketDataError::NoData { .. } => (StatusCode::NOT_FOUND, "NO_DATA"),
            MarketDataError::Upstream(_) => (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR"),
            MarketDataError::InvalidUnderlyingType(_) => (StatusCode::BAD_REQUEST, "INVALID_UNDERLYING_TYPE"),
            MarketDataError::InvalidInterval(_) => (StatusCode::BAD_REQUEST, "INVALID_INTERVAL"),
            MarketDataError::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        Self::new(status, code, err.to_string())
    }
}

impl From<OptionsError> for ApiError {
    fn from(err: OptionsError) -> Self {
        let code = match err {
            OptionsError::MarketData(inner) => return inner.into(),
            OptionsError::InvalidUnderlyingType(_) => "INVALID_UNDERLYING_TYPE",
            OptionsError::InvalidOptionType(_) => "INVALID_OPTION_TYPE",
            OptionsError::InvalidStrikeInterval(_) => "INVALID_STRIKE_INTERVAL",
            OptionsError::InvalidAtmLevels { .. } => "INVALID_PARAMETERS",
            OptionsError::InvalidStrike(_) => "INVALID_STRIKE",
            OptionsError::InvalidDate(_) => "INVALID_DATE",
        };
        Self::new(StatusCode::BAD_REQUEST, code, err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(code = self.code, message = %self.message, "Request failed");
        }
        (self.status, Json(ErrorResponse::new(self.code, self.message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(MarketDataError::NotFound("X".into())).status, StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(MarketDataError::upstream("503")).status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            ApiError::from(OptionsError::from(MarketDataError::NotFound("X".into()))).code,
            "NOT_FOUND"
        );
        assert_eq!(
            ApiError::from(OptionsError::InvalidDate("x".into())).status,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::invalid_strike().code, "INVALID_STRIKE");
        assert_eq!(
            ApiError::from(OptionsError::InvalidAtmLevels { requested: 51, max: 50 }).code,
            "INVALID_PARAMETERS"
        );
    }
}
