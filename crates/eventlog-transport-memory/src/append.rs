use std::sync::Arc;

use async_trait::async_trait;
use eventlog_transport::{
    AppendCall, AppendRequest, AppendResponse, AppendSuccess, ProposedMessage, TransportError,
};
use parking_lot::Mutex;
use tracing::debug;

/// Frames received by one append call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecordedAppend {
    /// Frames in the order they were sent
    pub frames: Vec<AppendRequest>,
    /// Whether the client closed its send side
    pub closed: bool,
}

impl RecordedAppend {
    /// The proposed events among the recorded frames.
    pub fn events(&self) -> impl Iterator<Item = &ProposedMessage> {
        self.frames.iter().filter_map(|frame| match frame {
            AppendRequest::ProposedMessage(message) => Some(message),
            AppendRequest::Options(_) => None,
        })
    }
}

/// Behaviour of one append call.
#[derive(Clone, Debug, Default)]
pub struct AppendScript {
    pub(crate) open_error: Option<TransportError>,
    send_error: Option<(usize, TransportError)>,
    close: Option<Result<AppendResponse, TransportError>>,
}

impl AppendScript {
    /// A call that succeeds with the given terminal response.
    #[must_use]
    pub fn respond(response: AppendResponse) -> Self {
        Self {
            close: Some(Ok(response)),
            ..Self::default()
        }
    }

    /// A call that cannot be established.
    #[must_use]
    pub fn fail_open(error: TransportError) -> Self {
        Self {
            open_error: Some(error),
            ..Self::default()
        }
    }

    /// Fail the send of the frame at `index` (zero-based, options frame
    /// included).
    #[must_use]
    pub fn fail_send_at(mut self, index: usize, error: TransportError) -> Self {
        self.send_error = Some((index, error));
        self
    }

    /// Fail the call when the client closes its send side.
    #[must_use]
    pub fn fail_close(mut self, error: TransportError) -> Self {
        self.close = Some(Err(error));
        self
    }
}

pub struct MemoryAppendCall {
    script: AppendScript,
    record: Arc<Mutex<RecordedAppend>>,
    sent: usize,
}

impl MemoryAppendCall {
    pub const fn new(script: AppendScript, record: Arc<Mutex<RecordedAppend>>) -> Self {
        Self {
            script,
            record,
            sent: 0,
        }
    }
}

#[async_trait]
impl AppendCall for MemoryAppendCall {
    async fn send(&mut self, request: AppendRequest) -> Result<(), TransportError> {
        if let Some((index, error)) = &self.script.send_error {
            if *index == self.sent {
                debug!("Memory append call failing frame {}", index);
                return Err(error.clone());
            }
        }

        self.sent += 1;
        self.record.lock().frames.push(request);

        Ok(())
    }

    async fn close_and_recv(self: Box<Self>) -> Result<AppendResponse, TransportError> {
        let events = {
            let mut record = self.record.lock();
            record.closed = true;
            record.events().count() as u64
        };

        debug!("Memory append call closed after {} events", events);

        self.script.close.unwrap_or_else(|| {
            Ok(AppendResponse::Success(AppendSuccess {
                current_revision: events.checked_sub(1),
                position: None,
            }))
        })
    }
}
