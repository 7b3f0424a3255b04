//! Messages exchanged by the `append` call.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{Position, StreamName};

/// A frame sent on an append call.
///
/// The first frame of a call is always [`AppendRequest::Options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppendRequest {
    /// Call configuration
    Options(AppendOptions),
    /// One event to append
    ProposedMessage(ProposedMessage),
}

/// Append call configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendOptions {
    /// Stream to append to
    pub stream: StreamName,
    /// Optimistic concurrency precondition
    pub expected_revision: ExpectedRevision,
}

impl AppendOptions {
    /// Options for appending to `stream` without a concurrency check
    pub fn new(stream: impl Into<StreamName>) -> Self {
        Self {
            stream: stream.into(),
            expected_revision: ExpectedRevision::Any,
        }
    }
}

/// Optimistic concurrency precondition of an append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExpectedRevision {
    /// No check
    #[default]
    Any,
    /// The stream must not exist
    NoStream,
    /// The stream must exist
    StreamExists,
    /// The last event of the stream must have this revision
    Exact(u64),
}

impl fmt::Display for ExpectedRevision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => write!(f, "any"),
            Self::NoStream => write!(f, "no stream"),
            Self::StreamExists => write!(f, "stream exists"),
            Self::Exact(revision) => write!(f, "revision {revision}"),
        }
    }
}

/// An event proposed for appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposedMessage {
    /// Event id
    pub id: Uuid,
    /// Event type tag
    pub event_type: String,
    /// Content type of `data`
    pub content_type: String,
    /// Caller-supplied metadata
    pub custom_metadata: Bytes,
    /// Event payload
    pub data: Bytes,
}

/// Terminal response of an append call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AppendResponse {
    /// The events were written
    Success(AppendSuccess),
    /// The expected revision did not hold
    WrongExpectedVersion(WrongExpectedVersion),
    /// A result this client does not understand
    Unrecognized(String),
}

/// Details of a successful append.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppendSuccess {
    /// Revision of the last event in the stream, `None` if the stream is empty
    pub current_revision: Option<u64>,
    /// Position of the last written event, if any were written
    pub position: Option<Position>,
}

/// Details of a rejected append.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrongExpectedVersion {
    /// Actual revision of the stream, `None` if it does not exist
    pub current_revision: Option<u64>,
    /// Precondition that was asserted
    pub expected: ExpectedRevision,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_revision_display() {
        assert_eq!(ExpectedRevision::default().to_string(), "any");
        assert_eq!(ExpectedRevision::NoStream.to_string(), "no stream");
        assert_eq!(ExpectedRevision::StreamExists.to_string(), "stream exists");
        assert_eq!(ExpectedRevision::Exact(3).to_string(), "revision 3");
    }

    #[test]
    fn test_options_default_to_any() {
        let options = AppendOptions::new("orders-1");
        assert_eq!(options.stream.as_str(), "orders-1");
        assert_eq!(options.expected_revision, ExpectedRevision::Any);
    }

    #[test]
    fn test_response_serde_shape() {
        let response = AppendResponse::WrongExpectedVersion(WrongExpectedVersion {
            current_revision: None,
            expected: ExpectedRevision::NoStream,
        });

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "WrongExpectedVersion": {
                    "current_revision": null,
                    "expected": "NoStream",
                }
            })
        );
        assert_eq!(
            serde_json::from_value::<AppendResponse>(json).unwrap(),
            response
        );
    }
}
