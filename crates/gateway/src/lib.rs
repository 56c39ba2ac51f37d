//! HTTP API for Tickforge
//!
//! JSON endpoints over the market data facade and the options engine.
//! Responses use a `{status, message, data, timestamp}` envelope on success
//! and `{status, code, message, details, timestamp}` on failure.
//!
//! Core errors map to status codes as follows: unknown symbol or missing
//! data is 404, an upstream failure is 502 and bad input is 400.

pub mod error;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::router;
pub use state::AppState;
