//! The HTTP listener.
//!
//! Binding and serving are separate steps: a port conflict fails startup
//! before anything is reported as up, and tests can read the ephemeral port.

use axum::Router;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// A bound listener and the router it serves.
pub struct HttpServer {
    listener: TcpListener,
    router: Router,
    local_addr: SocketAddr,
}

impl HttpServer {
    /// Bind the configured address. Port 0 picks an ephemeral port.
    pub async fn bind(config: &ServerConfig, router: Router) -> Result<Self> {
        let address = config.addr()?;
        let listener = TcpListener::bind(address)
            .await
            .map_err(|source| ServerError::Bind { address, source })?;
        let local_addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { address, source })?;

        info!(%local_addr, "HTTP server listening");
        Ok(Self {
            listener,
            router,
            local_addr,
        })
    }

    /// Address actually bound.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `shutdown` fires, then let in-flight requests finish.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        let local_addr = self.local_addr;

        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                info!("HTTP server draining");
            })
            .await
            .map_err(ServerError::Serve)?;

        info!(%local_addr, "HTTP server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use axum::routing::get;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    #[tokio::test]
    async fn test_serves_until_cancelled() {
        let router = Router::new().route("/ping", get(|| async { "pong" }));
        let server = HttpServer::bind(&ServerConfig::ephemeral(), router).await.unwrap();
        let addr = server.local_addr();
        assert_ne!(addr.port(), 0);

        let token = CancellationToken::new();
        let handle = tokio::spawn(server.serve(token.clone()));

        let mut stream = TcpStream::connect(addr).await.unwrap();
        stream
            .write_all(b"GET /ping HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
            .await
            .unwrap();
        let mut response = String::new();
        stream.read_to_string(&mut response).await.unwrap();
        assert!(response.starts_with("HTTP/1.1 200"), "{response}");
        assert!(response.ends_with("pong"), "{response}");

        token.cancel();
        let stopped = tokio::time::timeout(Duration::from_secs(5), handle).await;
        assert_matches!(stopped, Ok(Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_port_in_use_is_bind_error() {
        let first = HttpServer::bind(&ServerConfig::ephemeral(), Router::new()).await.unwrap();
        let taken = ServerConfig::new("127.0.0.1", first.local_addr().port());

        assert_matches!(
            HttpServer::bind(&taken, Router::new()).await.err(),
            Some(ServerError::Bind { address, .. }) if address == first.local_addr()
        );
    }

    #[tokio::test]
    async fn test_bad_host_is_invalid_address() {
        let config = ServerConfig::new("256.0.0.1", 0);

        assert_matches!(
            HttpServer::bind(&config, Router::new()).await.err(),
            Some(ServerError::InvalidAddress(_))
        );
    }
}
