//! Error types for the event log client.

use std::time::Duration;

use eventlog_transport::{ExpectedRevision, StreamName, TransportError};
use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for client operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or contradictory options. Raised before any RPC is made.
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The RPC call could not be established.
    #[error("Failed to open {call} call: {source}")]
    Connect {
        /// Which call was being opened.
        call: &'static str,
        /// The underlying transport error.
        #[source]
        source: TransportError,
    },

    /// The stream being read does not exist.
    #[error("Stream '{0}' does not exist")]
    StreamNotFound(StreamName),

    /// A send or receive failed after the call was established.
    #[error("Transport error: {0}")]
    Transport(#[source] TransportError),

    /// The append's expected revision did not hold.
    #[error("Wrong expected version appending to '{stream}': expected {expected}, current {current:?}")]
    WrongExpectedVersion {
        /// Stream that was appended to.
        stream: StreamName,
        /// Precondition the append asserted.
        expected: ExpectedRevision,
        /// Actual revision reported by the server.
        current: Option<u64>,
    },

    /// The server answered with a response this client does not understand.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),

    /// The caller's cancellation token fired.
    #[error("Operation cancelled")]
    Cancelled,

    /// Operation timed out.
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),

    /// The event payload has a content type that cannot be decoded.
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),

    /// Event payload (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Check if this is a stream-not-found error
    #[must_use]
    pub const fn is_stream_not_found(&self) -> bool {
        matches!(self, Self::StreamNotFound(_))
    }

    /// Check if this is a concurrency conflict on append
    #[must_use]
    pub const fn is_wrong_expected_version(&self) -> bool {
        matches!(self, Self::WrongExpectedVersion { .. })
    }

    /// Check if the operation was cancelled by the caller
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Configuration errors raised by option functions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A stream name was empty.
    #[error("stream name must not be empty")]
    EmptyStreamName,

    /// Stream options were given without a stream.
    #[error("stream options require a stream name")]
    MissingStreamName,

    /// A filter prefix list was empty.
    #[error("filter prefix list must not be empty")]
    EmptyPrefixes,

    /// A filter regex was empty.
    #[error("filter regex must not be empty")]
    EmptyRegex,

    /// A filter max window of zero.
    #[error("filter window max must be greater than zero")]
    ZeroWindowMax,

    /// A checkpoint interval multiplier of zero.
    #[error("checkpoint interval multiplier must be greater than zero")]
    ZeroCheckpointInterval,

    /// A filter combined with a single-stream selector.
    #[error("filters only apply to whole-log reads")]
    FilterOnStream,

    /// A synchronous read with an unbounded count.
    #[error("synchronous reads need a bounded count, use read_async for subscriptions")]
    UnboundedRead,
}
