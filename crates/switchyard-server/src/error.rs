//! Server error types.

use std::net::SocketAddr;

use thiserror::Error;

/// Errors returned while starting or running a [`Server`](crate::Server).
#[derive(Debug, Error)]
pub enum ServerError {
    /// The configured address is not a valid socket address.
    #[error("Invalid address '{addr}': {reason}")]
    InvalidAddress {
        /// The configured address string.
        addr: String,
        /// Parser message.
        reason: String,
    },

    /// Binding the listener failed.
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        /// The address that could not be bound.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// I/O error during server operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
