//! Call timeout tests against a transport that never answers

use std::time::Duration;

use assert_matches::assert_matches;
use async_trait::async_trait;
use eventlog_client::options::for_limited_count;
use eventlog_client::{CancellationToken, Client, Error, ProposedEvent, TransportError};
use eventlog_transport::{
    AppendCall, AppendRequest, AppendResponse, ReadRequest, ReadResponseStream, StreamsTransport,
};

/// Transport whose calls either never open or never make progress.
#[derive(Clone, Copy)]
struct StalledTransport {
    open_appends: bool,
}

struct StalledAppendCall;

#[async_trait]
impl StreamsTransport for StalledTransport {
    async fn read(&self, _request: ReadRequest) -> Result<ReadResponseStream, TransportError> {
        futures::future::pending().await
    }

    async fn append(&self) -> Result<Box<dyn AppendCall>, TransportError> {
        if self.open_appends {
            Ok(Box::new(StalledAppendCall))
        } else {
            futures::future::pending().await
        }
    }
}

#[async_trait]
impl AppendCall for StalledAppendCall {
    async fn send(&mut self, _request: AppendRequest) -> Result<(), TransportError> {
        futures::future::pending().await
    }

    async fn close_and_recv(self: Box<Self>) -> Result<AppendResponse, TransportError> {
        futures::future::pending().await
    }
}

fn stalled_client(open_appends: bool) -> Client<StalledTransport> {
    Client::builder(StalledTransport { open_appends })
        .connect_timeout(Duration::from_millis(10))
        .append_timeout(Duration::from_millis(50))
        .build()
}

#[tokio::test(start_paused = true)]
async fn test_read_connect_timeout() {
    let _ = tracing_subscriber::fmt::try_init();

    let result = stalled_client(false)
        .read(&CancellationToken::new(), [for_limited_count(1)])
        .await;

    assert_matches!(result, Err(Error::Timeout(timeout)) if timeout == Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn test_read_async_connect_timeout() {
    let _ = tracing_subscriber::fmt::try_init();

    let result = stalled_client(false)
        .read_async(
            &CancellationToken::new(),
            |_event: eventlog_client::ReadEvent| {},
            [],
        )
        .await;

    assert_matches!(result, Err(Error::Timeout(_)));
}

#[tokio::test(start_paused = true)]
async fn test_append_connect_timeout() {
    let _ = tracing_subscriber::fmt::try_init();

    let result = stalled_client(false)
        .append(
            &CancellationToken::new(),
            "orders-1",
            vec![ProposedEvent::binary("test-event", "payload")],
            [],
        )
        .await;

    assert_matches!(result, Err(Error::Timeout(timeout)) if timeout == Duration::from_millis(10));
}

#[tokio::test(start_paused = true)]
async fn test_append_timeout() {
    let _ = tracing_subscriber::fmt::try_init();

    let result = stalled_client(true)
        .append(
            &CancellationToken::new(),
            "orders-1",
            vec![ProposedEvent::binary("test-event", "payload")],
            [],
        )
        .await;

    assert_matches!(result, Err(Error::Timeout(timeout)) if timeout == Duration::from_millis(50));
}

#[tokio::test(start_paused = true)]
async fn test_cancel_beats_stalled_append() {
    let _ = tracing_subscriber::fmt::try_init();

    let scope = CancellationToken::new();
    let canceller = scope.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        canceller.cancel();
    });

    let result = stalled_client(true)
        .append(
            &scope,
            "orders-1",
            vec![ProposedEvent::binary("test-event", "payload")],
            [],
        )
        .await;

    assert_matches!(result, Err(Error::Cancelled));
}
