//! Listen address

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Where the HTTP server binds.
///
/// ```
/// use server::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8080);
/// assert_eq!(config.addr().map(|a| a.port()).ok(), Some(8080));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    /// 0 binds an ephemeral port
    pub port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Loopback on an ephemeral port.
    pub fn ephemeral() -> Self {
        Self::new("127.0.0.1", 0)
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        let joined = format!("{}:{}", self.host, self.port);
        joined
            .parse()
            .map_err(|_| ServerError::InvalidAddress(joined))
    }
}
