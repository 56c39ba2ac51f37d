//! Observability infrastructure for Tickforge
//!
//! This crate provides:
//! - Structured logging via tracing
//! - Prometheus metrics
//! - Metric helpers for the data path and the HTTP surface
//!
//! # Quick Start
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! // Initialize logging
//! init_logging("tickforge", LogFormat::Pretty)?;
//!
//! // Initialize metrics (optional)
//! observability::metrics::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, init_logging_named, LogFormat};
pub use metrics::{init_metrics, CallOutcome, DataMetrics, RequestMetrics};
