//! Read streaming engine.
//!
//! A read call is consumed message by message. Events are handed out,
//! confirmations are dropped, checkpoints go to the checkpoint callback, and
//! the first terminal condition (end-of-stream, stream-not-found, transport
//! error or cancellation) stops the read. The stop callback then runs exactly
//! once and the call is released.

use async_trait::async_trait;
use eventlog_transport::{ReadResponse, ReadResponseStream};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};
use crate::event::ReadEvent;
use crate::options::{CheckpointCallback, ReadStoppedCallback};

/// Consumer of events delivered by [`Client::read_async`](crate::Client::read_async).
///
/// Events are handled one at a time, in arrival order.
#[async_trait]
pub trait EventHandler: Send + 'static {
    /// Handle one event.
    async fn handle(&mut self, event: ReadEvent);
}

#[async_trait]
impl<F> EventHandler for F
where
    F: FnMut(ReadEvent) + Send + 'static,
{
    async fn handle(&mut self, event: ReadEvent) {
        (self)(event);
    }
}

/// Handle to a running asynchronous read.
///
/// Dropping the handle does not stop the read. It stops when the server ends
/// it, when it fails, or when it is cancelled through [`ReadSubscription::cancel`]
/// or the token it was started with.
#[derive(Debug)]
pub struct ReadSubscription {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl ReadSubscription {
    pub(crate) const fn new(token: CancellationToken, handle: JoinHandle<()>) -> Self {
        Self { token, handle }
    }

    /// Stop the read.
    ///
    /// A pending receive is abandoned. The handler is not called again and
    /// the stop callback receives [`Error::Cancelled`].
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the read has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the read to stop.
    ///
    /// A panic raised by the handler or a callback is resumed here. Such a
    /// panic ends the read without calling the stop callback.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            if e.is_panic() {
                std::panic::resume_unwind(e.into_panic());
            }
        }
    }
}

/// One established read call.
pub(crate) struct ReadSession {
    stream: ReadResponseStream,
    scope: CancellationToken,
    on_checkpoint: Option<CheckpointCallback>,
    on_read_stopped: Option<ReadStoppedCallback>,
}

impl ReadSession {
    pub(crate) fn new(
        stream: ReadResponseStream,
        scope: CancellationToken,
        on_checkpoint: Option<CheckpointCallback>,
        on_read_stopped: Option<ReadStoppedCallback>,
    ) -> Self {
        Self {
            stream,
            scope,
            on_checkpoint,
            on_read_stopped,
        }
    }

    /// Receive until the next event. `None` means the server ended the read.
    async fn next_event(&mut self) -> Result<Option<ReadEvent>> {
        loop {
            if self.scope.is_cancelled() {
                return Err(Error::Cancelled);
            }

            let message = tokio::select! {
                biased;
                () = self.scope.cancelled() => return Err(Error::Cancelled),
                message = self.stream.next() => message,
            };

            match message {
                None => return Ok(None),
                Some(Err(e)) => return Err(Error::Transport(e)),
                Some(Ok(ReadResponse::Event(event))) => {
                    trace!("Read event {} of '{}'", event.event.revision, event.event.stream);
                    return Ok(Some(ReadEvent::from(event)));
                }
                Some(Ok(ReadResponse::Confirmation { subscription_id })) => {
                    trace!("Read confirmed as subscription {}", subscription_id);
                }
                Some(Ok(ReadResponse::Checkpoint(position))) => {
                    trace!("Read checkpoint at {}", position);
                    if let Some(callback) = self.on_checkpoint.as_mut() {
                        callback(position);
                    }
                }
                Some(Ok(ReadResponse::StreamNotFound { stream })) => {
                    return Err(Error::StreamNotFound(stream));
                }
            }
        }
    }

    fn finish(self, error: Option<&Error>) {
        let Self {
            stream,
            on_read_stopped,
            ..
        } = self;
        drop(stream);

        match error {
            Some(e) => warn!("Read stopped: {}", e),
            None => debug!("Read completed"),
        }

        if let Some(callback) = on_read_stopped {
            callback(error);
        }
    }

    /// Consume the whole read. Events are only returned if the read completes.
    pub(crate) async fn collect(mut self) -> Result<Vec<ReadEvent>> {
        let mut events = Vec::new();
        let result = loop {
            match self.next_event().await {
                Ok(Some(event)) => events.push(event),
                Ok(None) => break Ok(()),
                Err(e) => break Err(e),
            }
        };

        match result {
            Ok(()) => {
                self.finish(None);
                Ok(events)
            }
            Err(e) => {
                self.finish(Some(&e));
                Err(e)
            }
        }
    }

    /// Feed every event to `handler` until the read stops.
    pub(crate) async fn run<H: EventHandler>(mut self, mut handler: H) {
        let error = loop {
            match self.next_event().await {
                Ok(Some(event)) => handler.handle(event).await,
                Ok(None) => break None,
                Err(e) => break Some(e),
            }
        };

        self.finish(error.as_ref());
    }
}

/// Start feeding `session` to `handler` on a new task.
pub(crate) fn spawn<H: EventHandler>(
    session: ReadSession,
    token: CancellationToken,
    handler: H,
) -> ReadSubscription {
    let handle = tokio::spawn(session.run(handler));
    ReadSubscription::new(token, handle)
}
