//! Client configuration.

use std::sync::Arc;
use std::time::Duration;

use eventlog_transport::StreamsTransport;

use crate::client::Client;

/// Configuration for the event log client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// How long opening a read or append call may take.
    pub connect_timeout: Duration,
    /// How long an open append call may take to send its events and answer.
    pub append_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(5),
            append_timeout: Duration::from_secs(30),
        }
    }
}

/// Builder for creating event log clients.
pub struct ClientBuilder<T> {
    transport: Arc<T>,
    config: ClientConfig,
}

impl<T: StreamsTransport> ClientBuilder<T> {
    /// Create a new client builder over `transport`.
    #[must_use]
    pub fn new(transport: T) -> Self {
        Self {
            transport: Arc::new(transport),
            config: ClientConfig::default(),
        }
    }

    /// Set the call establishment timeout.
    #[must_use]
    pub const fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.config.connect_timeout = timeout;
        self
    }

    /// Set the append timeout.
    #[must_use]
    pub const fn append_timeout(mut self, timeout: Duration) -> Self {
        self.config.append_timeout = timeout;
        self
    }

    /// Replace the whole configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the client.
    #[must_use]
    pub fn build(self) -> Client<T> {
        Client::with_config(self.transport, self.config)
    }
}
