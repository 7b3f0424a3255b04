//! Transport error types.

use thiserror::Error;

/// Errors raised by a streams transport.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    /// The call could not be established.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// The call was closed by the remote end or the channel went away.
    #[error("Connection closed")]
    ConnectionClosed,

    /// The server terminated the call with an error status.
    #[error("RPC status {code}: {message}")]
    Status {
        /// Status code reported by the server.
        code: i32,
        /// Status message reported by the server.
        message: String,
    },

    /// Any other transport failure.
    #[error("Transport error: {0}")]
    Other(String),
}
