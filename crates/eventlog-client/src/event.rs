//! Events written and read through the client.

use bytes::Bytes;
use eventlog_transport::{Position, ProposedMessage, ReadResponseEvent, RecordedEvent, StreamName};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Content type of JSON payloads.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Content type of opaque binary payloads.
pub const BINARY_CONTENT_TYPE: &str = "application/octet-stream";

/// An event to append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposedEvent {
    id: Uuid,
    event_type: String,
    content_type: String,
    custom_metadata: Bytes,
    data: Bytes,
}

impl ProposedEvent {
    /// Create an event with a fresh id.
    pub fn new(
        event_type: impl Into<String>,
        content_type: impl Into<String>,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            event_type: event_type.into(),
            content_type: content_type.into(),
            custom_metadata: Bytes::new(),
            data: data.into(),
        }
    }

    /// Create an event carrying `value` serialized as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: Serialize>(event_type: impl Into<String>, value: &T) -> Result<Self> {
        let data = serde_json::to_vec(value)?;
        Ok(Self::new(event_type, JSON_CONTENT_TYPE, data))
    }

    /// Create an event carrying opaque bytes.
    pub fn binary(event_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self::new(event_type, BINARY_CONTENT_TYPE, data)
    }

    /// Use `id` instead of the generated one.
    #[must_use]
    pub const fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Attach caller metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<Bytes>) -> Self {
        self.custom_metadata = metadata.into();
        self
    }

    /// Event id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Event type tag.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// Content type of the payload.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Payload.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.data
    }

    /// Caller metadata.
    #[must_use]
    pub const fn custom_metadata(&self) -> &Bytes {
        &self.custom_metadata
    }
}

impl From<ProposedEvent> for ProposedMessage {
    fn from(event: ProposedEvent) -> Self {
        Self {
            id: event.id,
            event_type: event.event_type,
            content_type: event.content_type,
            custom_metadata: event.custom_metadata,
            data: event.data,
        }
    }
}

/// An event received from a read.
///
/// When links are resolved, the accessors describe the resolved event and
/// [`ReadEvent::link`] the link that pointed at it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadEvent {
    inner: ReadResponseEvent,
}

impl ReadEvent {
    /// Event id.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.inner.event.id
    }

    /// Revision within its stream.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.inner.event.revision
    }

    /// Stream the event belongs to.
    #[must_use]
    pub const fn stream(&self) -> &StreamName {
        &self.inner.event.stream
    }

    /// Event type tag.
    #[must_use]
    pub fn event_type(&self) -> &str {
        &self.inner.event.event_type
    }

    /// Content type of the payload.
    #[must_use]
    pub fn content_type(&self) -> &str {
        &self.inner.event.content_type
    }

    /// Payload.
    #[must_use]
    pub const fn data(&self) -> &Bytes {
        &self.inner.event.data
    }

    /// Caller metadata.
    #[must_use]
    pub const fn custom_metadata(&self) -> &Bytes {
        &self.inner.event.custom_metadata
    }

    /// Position in the whole log, if the server sent one.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        self.inner.event.position
    }

    /// The link event, when links are resolved.
    #[must_use]
    pub const fn link(&self) -> Option<&RecordedEvent> {
        self.inner.link.as_ref()
    }

    /// The event as the server recorded it.
    #[must_use]
    pub const fn recorded(&self) -> &RecordedEvent {
        &self.inner.event
    }

    /// Commit position of the event, if known.
    #[must_use]
    pub const fn commit_position(&self) -> Option<u64> {
        self.inner.commit_position
    }

    /// Deserialize a JSON payload.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedContentType`] for non-JSON events and
    /// [`Error::Serialization`] for malformed payloads.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        if self.content_type() != JSON_CONTENT_TYPE {
            return Err(Error::UnsupportedContentType(self.content_type().to_string()));
        }
        Ok(serde_json::from_slice(self.data())?)
    }
}

impl From<ReadResponseEvent> for ReadEvent {
    fn from(inner: ReadResponseEvent) -> Self {
        Self { inner }
    }
}
