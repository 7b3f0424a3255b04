//! Event log client.

use std::future::Future;
use std::sync::Arc;

use eventlog_transport::{AppendSuccess, StreamName, StreamsTransport, TransportError};
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::append::append_events;
use crate::config::{ClientBuilder, ClientConfig};
use crate::error::{ConfigError, Error, Result};
use crate::event::{ProposedEvent, ReadEvent};
use crate::options::{AppendOption, ReadOption, ReadOptions, append_options};
use crate::read::{self, EventHandler, ReadSession, ReadSubscription};

/// Client for the event log streams service.
///
/// Every call opens its own RPC stream on the transport, so a client can be
/// cloned and used from many tasks at once.
pub struct Client<T> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T> Clone for Client<T> {
    fn clone(&self) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            config: self.config.clone(),
        }
    }
}

impl<T: StreamsTransport> Client<T> {
    /// Create a client with the default configuration.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self::with_config(Arc::new(transport), ClientConfig::default())
    }

    /// Start building a client over `transport`.
    #[must_use]
    pub fn builder(transport: T) -> ClientBuilder<T> {
        ClientBuilder::new(transport)
    }

    pub(crate) const fn with_config(transport: Arc<T>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    /// The client's configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Read a bounded number of events.
    ///
    /// Events are returned in server order once the server ends the read. A
    /// read that fails part way returns only the error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid options or an unbounded count,
    /// [`Error::StreamNotFound`] for a missing stream, [`Error::Cancelled`]
    /// when `scope` is cancelled, and transport errors otherwise.
    pub async fn read(
        &self,
        scope: &CancellationToken,
        options: impl IntoIterator<Item = ReadOption>,
    ) -> Result<Vec<ReadEvent>> {
        let options = ReadOptions::from_options(options)?;
        if options.request.count.is_unbounded() {
            return Err(ConfigError::UnboundedRead.into());
        }

        let session = self.open_read(scope, options).await?;
        session.collect().await
    }

    /// Start a read that feeds each event to `handler` on a background task.
    ///
    /// Only option and establishment errors are returned here. Once the read
    /// is running its outcome is reported to the stop callback set with
    /// [`with_read_stopped_callback`](crate::options::with_read_stopped_callback).
    /// Cancelling `scope` stops the read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for invalid options and an error if the call
    /// cannot be established.
    pub async fn read_async<H: EventHandler>(
        &self,
        scope: &CancellationToken,
        handler: H,
        options: impl IntoIterator<Item = ReadOption>,
    ) -> Result<ReadSubscription> {
        let options = ReadOptions::from_options(options)?;
        let token = scope.child_token();

        let session = self.open_read(&token, options).await?;
        Ok(read::spawn(session, token, handler))
    }

    /// Append `events` to `stream` atomically.
    ///
    /// # Errors
    ///
    /// Returns [`Error::WrongExpectedVersion`] when the expected revision does
    /// not hold, [`Error::Cancelled`] or [`Error::Timeout`] when the call is
    /// cut short, and transport errors otherwise.
    pub async fn append(
        &self,
        scope: &CancellationToken,
        stream: impl Into<StreamName>,
        events: Vec<ProposedEvent>,
        options: impl IntoIterator<Item = AppendOption>,
    ) -> Result<AppendSuccess> {
        let options = append_options(stream, options)?;
        debug!(
            "Appending {} events to '{}' expecting {}",
            events.len(),
            options.stream,
            options.expected_revision
        );

        let call = self
            .establish(scope, "append", self.transport.append())
            .await?;

        let append_timeout = self.config.append_timeout;
        tokio::select! {
            biased;
            () = scope.cancelled() => Err(Error::Cancelled),
            result = timeout(append_timeout, append_events(call, options, events)) => {
                result.map_err(|_| Error::Timeout(append_timeout))?
            }
        }
    }

    async fn open_read(
        &self,
        scope: &CancellationToken,
        options: ReadOptions,
    ) -> Result<ReadSession> {
        let ReadOptions {
            request,
            on_checkpoint,
            on_read_stopped,
        } = options;

        debug!("Opening read of {:?}", request.stream);
        let stream = self
            .establish(scope, "read", self.transport.read(request))
            .await?;

        Ok(ReadSession::new(
            stream,
            scope.clone(),
            on_checkpoint,
            on_read_stopped,
        ))
    }

    async fn establish<F, R>(
        &self,
        scope: &CancellationToken,
        call: &'static str,
        open: F,
    ) -> Result<R>
    where
        F: Future<Output = std::result::Result<R, TransportError>>,
    {
        let connect_timeout = self.config.connect_timeout;
        tokio::select! {
            biased;
            () = scope.cancelled() => Err(Error::Cancelled),
            result = timeout(connect_timeout, open) => match result {
                Ok(Ok(opened)) => Ok(opened),
                Ok(Err(source)) => Err(Error::Connect { call, source }),
                Err(_) => Err(Error::Timeout(connect_timeout)),
            },
        }
    }
}
