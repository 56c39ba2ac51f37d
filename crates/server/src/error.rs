//! Server error types

use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// Result type alias for server operations
pub type Result<T> = std::result::Result<T, ServerError>;

/// Failures while bringing the listener up or serving on it.
#[derive(Error, Debug)]
pub enum ServerError {
    /// `host:port` from configuration is not a socket address
    #[error("'{0}' is not a valid listen address")]
    InvalidAddress(String),

    #[error("Cannot listen on {address}: {source}")]
    Bind {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },

    /// The accept loop stopped with an I/O error
    #[error("HTTP server stopped: {0}")]
    Serve(#[source] io::Error),
}
