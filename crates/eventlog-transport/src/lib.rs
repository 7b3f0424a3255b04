//! Transport abstraction for the event log streams service.
//!
//! This crate describes the two RPC calls the streams service exposes and the
//! messages they carry. It does not know how bytes reach the server: concrete
//! transports (in-memory, gRPC, etc.) are provided in separate crates.
//!
//! The service exposes:
//! - a server-streaming `read` call taking a [`ReadRequest`] and yielding
//!   [`ReadResponse`] messages until end-of-stream or an error
//! - a client-streaming `append` call accepting [`AppendRequest`] frames
//!   (one options frame, then one frame per event) and yielding a single
//!   [`AppendResponse`]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod append;
pub mod error;
pub mod read;
pub mod types;

use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

pub use append::{
    AppendOptions, AppendRequest, AppendResponse, AppendSuccess, ExpectedRevision,
    ProposedMessage, WrongExpectedVersion,
};
pub use error::TransportError;
pub use read::{
    CountSelector, Filter, FilterExpression, FilterTarget, FilterWindow, PositionSelector,
    ReadDirection, ReadRequest, ReadResponse, ReadResponseEvent, RecordedEvent,
    RevisionSelector, StreamSelector, UuidFormat,
};
pub use types::{Position, StreamName};

/// Stream of responses produced by a `read` call.
///
/// The stream ending (`None`) is the end-of-stream signal. Dropping it
/// releases the underlying call.
pub type ReadResponseStream =
    Pin<Box<dyn Stream<Item = Result<ReadResponse, TransportError>> + Send>>;

/// Transport for the streams service.
///
/// Every call opens its own independent RPC stream, so implementations must
/// allow concurrent calls without external synchronization.
#[async_trait]
pub trait StreamsTransport: Send + Sync + 'static {
    /// Open a server-streaming read call.
    async fn read(&self, request: ReadRequest) -> Result<ReadResponseStream, TransportError>;

    /// Open a client-streaming append call.
    async fn append(&self) -> Result<Box<dyn AppendCall>, TransportError>;
}

/// The client side of an open append call.
#[async_trait]
pub trait AppendCall: Send {
    /// Send one request frame.
    async fn send(&mut self, request: AppendRequest) -> Result<(), TransportError>;

    /// Close the send side and wait for the terminal response.
    async fn close_and_recv(self: Box<Self>) -> Result<AppendResponse, TransportError>;
}
