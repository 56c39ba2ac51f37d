//! Server infrastructure for Tickforge
//!
//! Binds the HTTP API, serves it until shutdown and drains in-flight
//! requests. The routes themselves live in the `gateway` crate.
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ShutdownController};
//!
//! let shutdown = ShutdownController::with_signals();
//! let server = HttpServer::bind(&ServerConfig::new("0.0.0.0", 8080), router).await?;
//! server.serve(shutdown.child_token()).await?;
//! ```

pub mod config;
pub mod error;
pub mod health;
pub mod http;
pub mod shutdown;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use health::{ComponentStatus, HealthState, HealthStatus};
pub use http::HttpServer;
pub use shutdown::{run_until_shutdown, ShutdownController};
