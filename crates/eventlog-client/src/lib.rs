//! Client for an append-only event log service.
//!
//! The client exposes three operations over a [`StreamsTransport`]:
//! - [`Client::read`] reads a bounded number of events and returns them once
//!   the server ends the read
//! - [`Client::read_async`] feeds events to an [`EventHandler`] on a
//!   background task, optionally as an open-ended subscription
//! - [`Client::append`] appends a batch of events to one stream atomically,
//!   optionally guarded by an expected revision
//!
//! Calls are configured with option functions from [`options`], applied in
//! order on top of documented defaults. Invalid options fail the call before
//! anything is sent.
//!
//! Every operation takes a [`CancellationToken`]. Cancelling it abandons the
//! call, including a receive that is still waiting on the server.
//!
//! # Example
//!
//! ```no_run
//! use eventlog_client::options::{for_limited_count, for_stream, with_stream_options};
//! use eventlog_client::{Client, ProposedEvent};
//! use eventlog_transport_memory::MemoryTransport;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> eventlog_client::Result<()> {
//! let client = Client::new(MemoryTransport::new_default());
//! let scope = CancellationToken::new();
//!
//! let event = ProposedEvent::json("order-placed", &serde_json::json!({ "id": 7 }))?;
//! client.append(&scope, "orders-7", vec![event], []).await?;
//!
//! let events = client
//!     .read(
//!         &scope,
//!         [
//!             with_stream_options([for_stream("orders-7")]),
//!             for_limited_count(100),
//!         ],
//!     )
//!     .await?;
//!
//! for event in events {
//!     println!("{} {}", event.revision(), event.event_type());
//! }
//! # Ok(())
//! # }
//! ```
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod append;
mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod options;
mod read;

pub use client::Client;
pub use config::{ClientBuilder, ClientConfig};
pub use error::{ConfigError, Error, Result};
pub use event::{BINARY_CONTENT_TYPE, JSON_CONTENT_TYPE, ProposedEvent, ReadEvent};
pub use read::{EventHandler, ReadSubscription};

pub use eventlog_transport::{
    AppendSuccess, ExpectedRevision, Position, StreamName, StreamsTransport, TransportError,
};
pub use tokio_util::sync::CancellationToken;
