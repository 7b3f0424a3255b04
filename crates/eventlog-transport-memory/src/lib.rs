//! In-memory streams transport for testing
//!
//! This transport plays the server side of the streams service within the
//! same process. Read calls are served from feeds the test pushes responses
//! into, and append calls are recorded frame by frame so tests can assert on
//! exactly what the client sent.
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

mod append;
mod read;

pub use append::{AppendScript, RecordedAppend};
pub use read::ReadFeed;

use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use eventlog_transport::{
    AppendCall, ReadRequest, ReadResponseStream, StreamsTransport, TransportError,
};
use parking_lot::Mutex;
use tracing::debug;

use append::MemoryAppendCall;
use read::PendingRead;

/// Configuration for memory transport
#[derive(Debug, Clone)]
pub struct MemoryOptions {
    /// Capacity of each read feed
    pub channel_capacity: usize,
}

impl Default for MemoryOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 100,
        }
    }
}

#[derive(Default)]
struct State {
    pending_reads: VecDeque<PendingRead>,
    read_requests: Vec<ReadRequest>,
    append_scripts: VecDeque<AppendScript>,
    append_calls: Vec<Arc<Mutex<RecordedAppend>>>,
}

/// Memory transport implementation
///
/// Clones share the same state, so a test can keep one handle while the
/// client owns another.
#[derive(Clone)]
pub struct MemoryTransport {
    options: MemoryOptions,
    state: Arc<Mutex<State>>,
}

impl MemoryTransport {
    /// Create a new memory transport with options
    #[must_use]
    pub fn new(options: MemoryOptions) -> Self {
        Self {
            options,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Create a new memory transport with default options
    #[must_use]
    pub fn new_default() -> Self {
        Self::new(MemoryOptions::default())
    }

    /// Prepare the server side of the next read call.
    ///
    /// Responses pushed into the returned feed are delivered to the reader in
    /// order. Dropping the feed ends the stream.
    #[must_use]
    pub fn expect_read(&self) -> ReadFeed {
        let (sender, receiver) = flume::bounded(self.options.channel_capacity);
        self.state
            .lock()
            .pending_reads
            .push_back(PendingRead::Feed(receiver));

        ReadFeed::new(sender)
    }

    /// Make the next read call fail to establish.
    pub fn fail_next_read(&self, error: TransportError) {
        self.state
            .lock()
            .pending_reads
            .push_back(PendingRead::Fail(error));
    }

    /// Requests received by read calls so far, in call order.
    #[must_use]
    pub fn read_requests(&self) -> Vec<ReadRequest> {
        self.state.lock().read_requests.clone()
    }

    /// Script the behaviour of the next append call.
    ///
    /// Append calls without a script succeed.
    pub fn script_append(&self, script: AppendScript) {
        self.state.lock().append_scripts.push_back(script);
    }

    /// Snapshot of every append call opened so far, in call order.
    #[must_use]
    pub fn append_calls(&self) -> Vec<RecordedAppend> {
        self.state
            .lock()
            .append_calls
            .iter()
            .map(|record| record.lock().clone())
            .collect()
    }
}

impl Default for MemoryTransport {
    fn default() -> Self {
        Self::new_default()
    }
}

impl Debug for MemoryTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryTransport")
            .field("options", &self.options)
            .field("pending_reads", &state.pending_reads.len())
            .field("append_calls", &state.append_calls.len())
            .finish()
    }
}

#[async_trait]
impl StreamsTransport for MemoryTransport {
    async fn read(&self, request: ReadRequest) -> Result<ReadResponseStream, TransportError> {
        let pending = {
            let mut state = self.state.lock();
            state.read_requests.push(request);
            state.pending_reads.pop_front()
        };

        match pending {
            Some(PendingRead::Feed(receiver)) => {
                debug!("Memory read call established");
                Ok(Box::pin(receiver.into_stream()))
            }
            Some(PendingRead::Fail(error)) => {
                debug!("Memory read call rejected: {}", error);
                Err(error)
            }
            None => Err(TransportError::ConnectionFailed(
                "No read call expected".to_string(),
            )),
        }
    }

    async fn append(&self) -> Result<Box<dyn AppendCall>, TransportError> {
        let (script, record) = {
            let mut state = self.state.lock();
            let script = state.append_scripts.pop_front().unwrap_or_default();
            if let Some(error) = script.open_error.clone() {
                debug!("Memory append call rejected: {}", error);
                return Err(error);
            }

            let record = Arc::new(Mutex::new(RecordedAppend::default()));
            state.append_calls.push(Arc::clone(&record));
            (script, record)
        };

        debug!("Memory append call established");

        Ok(Box::new(MemoryAppendCall::new(script, record)))
    }
}
