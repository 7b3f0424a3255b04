use eventlog_transport::{ReadResponse, TransportError};
use tracing::debug;

type FeedItem = Result<ReadResponse, TransportError>;

pub enum PendingRead {
    Feed(flume::Receiver<FeedItem>),
    Fail(TransportError),
}

/// Server side of one read call.
///
/// Dropping the feed (or calling [`ReadFeed::end`]) signals end-of-stream.
#[derive(Debug)]
pub struct ReadFeed {
    sender: flume::Sender<FeedItem>,
}

impl ReadFeed {
    pub(crate) const fn new(sender: flume::Sender<FeedItem>) -> Self {
        Self { sender }
    }

    /// Queue a response without waiting.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed is full or the reader released the call.
    pub fn push(&self, response: ReadResponse) -> Result<(), TransportError> {
        self.sender
            .try_send(Ok(response))
            .map_err(|_| TransportError::ConnectionClosed)
    }

    /// Deliver a response, waiting for room in the feed.
    ///
    /// # Errors
    ///
    /// Returns an error if the reader released the call.
    pub async fn send(&self, response: ReadResponse) -> Result<(), TransportError> {
        self.sender
            .send_async(Ok(response))
            .await
            .map_err(|_| TransportError::ConnectionClosed)
    }

    /// Fail the call with a mid-stream error.
    ///
    /// The error is delivered after any responses already queued.
    ///
    /// # Errors
    ///
    /// Returns an error if the feed is full or the reader released the call,
    /// in which case the failure is never delivered.
    pub fn fail(self, error: TransportError) -> Result<(), TransportError> {
        debug!("Memory read feed failing: {}", error);
        self.sender
            .try_send(Err(error))
            .map_err(|_| TransportError::ConnectionClosed)
    }

    /// End the stream once queued responses are consumed.
    pub fn end(self) {
        debug!("Memory read feed ended");
    }

    /// Whether the reader has dropped its end of the call.
    #[must_use]
    pub fn is_released(&self) -> bool {
        self.sender.is_disconnected()
    }
}
