//! Messages exchanged by the `read` call.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Position, StreamName};

/// Read call configuration.
///
/// Every selector is an enum, so exactly one variant is active per field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadRequest {
    /// Which stream (or the whole log) to read
    pub stream: StreamSelector,
    /// Read direction
    pub direction: ReadDirection,
    /// Whether link events are resolved to the events they point at
    pub resolve_links: bool,
    /// Bounded read or subscription
    pub count: CountSelector,
    /// Server-side filter, `None` for no filter
    pub filter: Option<Filter>,
    /// How event ids are encoded on the wire
    pub uuid_format: UuidFormat,
}

impl Default for ReadRequest {
    /// Subscribe to the whole log from the start, forwards, unfiltered.
    fn default() -> Self {
        Self {
            stream: StreamSelector::All(PositionSelector::Start),
            direction: ReadDirection::Forwards,
            resolve_links: false,
            count: CountSelector::Subscription,
            filter: None,
            uuid_format: UuidFormat::String,
        }
    }
}

/// Target of a read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StreamSelector {
    /// A single stream, starting at a revision
    Stream {
        /// Stream to read
        name: StreamName,
        /// Revision to start from
        revision: RevisionSelector,
    },
    /// The whole log, starting at a position
    All(PositionSelector),
}

/// Starting point within a single stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RevisionSelector {
    /// First event of the stream
    #[default]
    Start,
    /// After the last event of the stream
    End,
    /// A specific revision
    Exact(u64),
}

/// Starting point within the whole log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionSelector {
    /// Beginning of the log
    #[default]
    Start,
    /// End of the log
    End,
    /// A specific position
    Exact(Position),
}

/// Read direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadDirection {
    /// Oldest to newest
    #[default]
    Forwards,
    /// Newest to oldest
    Backwards,
}

/// How many events to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CountSelector {
    /// Read at most this many events, then end the stream
    Limit(u64),
    /// Keep streaming new events until stopped
    Subscription,
}

impl CountSelector {
    /// Whether this selector never ends on its own
    #[must_use]
    pub const fn is_unbounded(&self) -> bool {
        matches!(self, Self::Subscription)
    }
}

/// Server-side filter for whole-log reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    /// What the filter matches against
    pub target: FilterTarget,
    /// Search window
    pub window: FilterWindow,
    /// Multiplier applied to the window to decide when checkpoints are sent
    pub checkpoint_interval_multiplier: u32,
}

/// Field a filter is applied to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterTarget {
    /// Match on stream names
    StreamName(FilterExpression),
    /// Match on event types
    EventType(FilterExpression),
}

/// Filter matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterExpression {
    /// Match any of these prefixes
    Prefixes(Vec<String>),
    /// Match a regular expression
    Regex(String),
}

/// Filter search window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FilterWindow {
    /// Window based on the read count
    Count,
    /// Search at most this many events between checkpoints
    Max(u32),
}

/// Wire format of event ids.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UuidFormat {
    /// Hyphenated string
    #[default]
    String,
    /// Most/least significant bits pair
    Structured,
}

/// A message received on a read call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReadResponse {
    /// An event
    Event(ReadResponseEvent),
    /// Subscription acknowledgement
    Confirmation {
        /// Server-assigned subscription id
        subscription_id: String,
    },
    /// Filtered read progress marker
    Checkpoint(Position),
    /// The requested stream does not exist
    StreamNotFound {
        /// Stream that was requested
        stream: StreamName,
    },
}

/// Event payload of a [`ReadResponse::Event`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadResponseEvent {
    /// The event, or the resolved target when links are resolved
    pub event: RecordedEvent,
    /// The link event that pointed at `event`, if any
    pub link: Option<RecordedEvent>,
    /// Commit position of the event in the whole log, if known
    pub commit_position: Option<u64>,
}

/// An event as stored by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Event id
    pub id: Uuid,
    /// Stream the event belongs to
    pub stream: StreamName,
    /// Zero-based revision within the stream
    pub revision: u64,
    /// Position within the whole log, if known
    pub position: Option<Position>,
    /// Event type tag
    pub event_type: String,
    /// Content type of `data`
    pub content_type: String,
    /// Caller-supplied metadata
    pub custom_metadata: Bytes,
    /// Event payload
    pub data: Bytes,
}
