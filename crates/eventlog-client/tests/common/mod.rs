//! Shared helpers for client integration tests

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use bytes::Bytes;
use eventlog_client::options::{ReadOption, with_read_stopped_callback};
use eventlog_client::{Client, Position, StreamName};
use eventlog_transport::{ReadResponse, ReadResponseEvent, RecordedEvent};
use eventlog_transport_memory::MemoryTransport;
use uuid::Uuid;

/// Client sharing state with `transport`.
pub fn client(transport: &MemoryTransport) -> Client<MemoryTransport> {
    Client::new(transport.clone())
}

/// A recorded event message for `stream` at `revision`.
pub fn event(stream: &str, revision: u64) -> ReadResponse {
    ReadResponse::Event(ReadResponseEvent {
        event: RecordedEvent {
            id: Uuid::new_v4(),
            stream: StreamName::from(stream),
            revision,
            position: Some(Position::new(revision * 10, revision * 10)),
            event_type: "test-event".to_string(),
            content_type: "application/octet-stream".to_string(),
            custom_metadata: Bytes::new(),
            data: Bytes::from(format!("{stream}-{revision}")),
        },
        link: None,
        commit_position: Some(revision * 10),
    })
}

/// Outcomes seen by a read's stop callback, as error messages.
#[derive(Clone, Default)]
pub struct StopRecorder {
    calls: Arc<Mutex<Vec<Option<String>>>>,
}

impl StopRecorder {
    pub fn option(&self) -> ReadOption {
        let calls = Arc::clone(&self.calls);
        with_read_stopped_callback(move |error| {
            calls
                .lock()
                .unwrap()
                .push(error.map(ToString::to_string));
        })
    }

    pub fn calls(&self) -> Vec<Option<String>> {
        self.calls.lock().unwrap().clone()
    }
}
