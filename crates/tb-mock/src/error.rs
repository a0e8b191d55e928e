//! Error types for tb-mock

use std::net::SocketAddr;
use thiserror::Error;

/// Mock server errors
#[derive(Error, Debug)]
pub enum MockError {
    /// Listener could not be bound (M001)
    #[error("[M001] Failed to bind mock server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },

    /// Server terminated with an I/O error (M002)
    #[error("[M002] Mock server error: {0}")]
    Server(#[source] std::io::Error),

    /// Host and port do not form a socket address (M003)
    #[error("[M003] Invalid mock server address '{0}'")]
    InvalidAddress(String),
}

/// Result type alias for MockError
pub type MockResult<T> = Result<T, MockError>;
