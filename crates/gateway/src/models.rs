//! API request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope for every successful response.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuccessResponse<T> {
    pub status: String,
    pub message: String,
    pub data: T,
    pub timestamp: DateTime<Utc>,
}

impl<T> SuccessResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.into(),
            data,
            timestamp: Utc::now(),
        }
    }
}

/// Envelope for every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
    pub details: Map<String, Value>,
    pub timestamp: DateTime<Utc>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            code: code.into(),
            message: message.into(),
            details: Map::new(),
            timestamp: Utc::now(),
        }
    }
}

/// Query parameters for `/stock/data` and `/sector/data`.
///
/// Every field is optional here so a missing one surfaces as
/// `MISSING_PARAMETERS` instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct UnderlyingDataParams {
    pub symbol: Option<String>,
    pub date: Option<String>,
    /// Only the literal `true` enables the intraday series.
    pub timewise: Option<String>,
}

impl UnderlyingDataParams {
    pub fn include_intraday(&self) -> bool {
        self.timewise.as_deref() == Some("true")
    }
}

/// Query parameters for `/options/contracts`.
#[derive(Debug, Default, Deserialize)]
pub struct ContractsParams {
    pub underlying_type: Option<String>,
    pub underlying: Option<String>,
    pub expiry_date: Option<String>,
    pub atm_levels: Option<String>,
    pub strike_interval: Option<String>,
}

/// Query parameters for `/options/candles/5min`.
#[derive(Debug, Default, Deserialize)]
pub struct OptionCandlesParams {
    pub underlying_type: Option<String>,
    pub underlying: Option<String>,
    pub expiry_date: Option<String>,
    pub option_type: Option<String>,
    pub strike: Option<String>,
    pub date: Option<String>,
}

/// Value of a required query parameter, or `None` when absent or blank.
pub fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelopes() {
        let ok = serde_json::to_value(SuccessResponse::new("done", vec![1, 2])).unwrap();
        assert_eq!(ok["status"], "success");
        assert_eq!(ok["data"][1], 2);

        let err = serde_json::to_value(ErrorResponse::new("MISSING_PARAMETERS", "symbol and date are required")).unwrap();
        assert_eq!(err["status"], "error");
        assert_eq!(err["code"], "MISSING_PARAMETERS");
        assert!(err["details"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_required_and_timewise() {
        assert_eq!(required(&Some("RELIANCE".into())), Some("RELIANCE"));
        assert_eq!(required(&Some("  ".into())), None);
        assert_eq!(required(&None), None);

        let params = UnderlyingDataParams {
            timewise: Some("TRUE".into()),
            ..Default::default()
        };
        assert!(!params.include_intraday());
    }
}
