//! Synchronous read tests against the memory transport

mod common;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;
use eventlog_client::options::{
    for_limited_count, for_stream, from_revision, from_start_position, in_backwards_direction,
    include_stream_prefixes, with_all_options, with_checkpoint_callback, with_filter_options,
    with_stream_options,
};
use eventlog_client::{CancellationToken, ConfigError, Error, Position, StreamName, TransportError};
use eventlog_transport::{
    CountSelector, ReadDirection, ReadRequest, ReadResponse, RevisionSelector, StreamSelector,
};
use eventlog_transport_memory::MemoryTransport;

use common::{StopRecorder, client, event};

#[tokio::test]
async fn test_read_returns_events_in_order() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    let feed = transport.expect_read();
    for revision in 0..3 {
        feed.push(event("orders-1", revision)).unwrap();
    }
    feed.end();

    let stops = StopRecorder::default();
    let events = client(&transport)
        .read(
            &CancellationToken::new(),
            [
                with_stream_options([for_stream("orders-1"), from_revision(0)]),
                for_limited_count(10),
                stops.option(),
            ],
        )
        .await
        .unwrap();

    let revisions: Vec<_> = events.iter().map(|e| e.revision()).collect();
    assert_eq!(revisions, vec![0, 1, 2]);
    assert_eq!(&events[2].data()[..], b"orders-1-2");
    assert_eq!(stops.calls(), vec![None]);

    assert_eq!(
        transport.read_requests(),
        vec![ReadRequest {
            stream: StreamSelector::Stream {
                name: StreamName::from("orders-1"),
                revision: RevisionSelector::Exact(0),
            },
            count: CountSelector::Limit(10),
            ..ReadRequest::default()
        }]
    );
}

#[tokio::test]
async fn test_read_empty_stream() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    transport.expect_read().end();

    let events = client(&transport)
        .read(
            &CancellationToken::new(),
            [in_backwards_direction(), for_limited_count(5)],
        )
        .await
        .unwrap();

    assert!(events.is_empty());
    assert_eq!(
        transport.read_requests()[0].direction,
        ReadDirection::Backwards
    );
}

#[tokio::test]
async fn test_mid_stream_error_returns_no_events() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    let feed = transport.expect_read();
    feed.push(event("orders-1", 0)).unwrap();
    feed.push(event("orders-1", 1)).unwrap();
    feed.fail(TransportError::ConnectionClosed).unwrap();

    let stops = StopRecorder::default();
    let result = client(&transport)
        .read(
            &CancellationToken::new(),
            [for_limited_count(10), stops.option()],
        )
        .await;

    assert_matches!(result, Err(Error::Transport(TransportError::ConnectionClosed)));
    assert_eq!(
        stops.calls(),
        vec![Some(Error::Transport(TransportError::ConnectionClosed).to_string())]
    );
}

#[tokio::test]
async fn test_stream_not_found() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    let feed = transport.expect_read();
    feed.push(ReadResponse::StreamNotFound {
        stream: StreamName::from("missing"),
    })
    .unwrap();

    let stops = StopRecorder::default();
    let error = client(&transport)
        .read(
            &CancellationToken::new(),
            [
                with_stream_options([for_stream("missing")]),
                for_limited_count(1),
                stops.option(),
            ],
        )
        .await
        .unwrap_err();

    assert!(error.is_stream_not_found());
    assert_matches!(&error, Error::StreamNotFound(stream) if stream.as_str() == "missing");
    assert_eq!(stops.calls(), vec![Some(error.to_string())]);
}

#[tokio::test]
async fn test_checkpoints_reported_in_order() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    let feed = transport.expect_read();
    feed.push(ReadResponse::Confirmation {
        subscription_id: "sub-1".to_string(),
    })
    .unwrap();
    feed.push(event("orders-1", 0)).unwrap();
    feed.push(ReadResponse::Checkpoint(Position::new(10, 10)))
        .unwrap();
    feed.push(ReadResponse::Confirmation {
        subscription_id: "sub-1".to_string(),
    })
    .unwrap();
    feed.push(event("orders-2", 0)).unwrap();
    feed.push(ReadResponse::Checkpoint(Position::new(20, 19)))
        .unwrap();
    feed.end();

    let checkpoints = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&checkpoints);

    let events = client(&transport)
        .read(
            &CancellationToken::new(),
            [
                with_all_options([from_start_position()]),
                with_filter_options([include_stream_prefixes(["orders-"])]),
                with_checkpoint_callback(move |position| seen.lock().unwrap().push(position)),
                for_limited_count(100),
            ],
        )
        .await
        .unwrap();

    assert_eq!(events.len(), 2);
    assert_eq!(
        *checkpoints.lock().unwrap(),
        vec![Position::new(10, 10), Position::new(20, 19)]
    );
}

#[tokio::test]
async fn test_unbounded_read_rejected_before_any_call() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    let stops = StopRecorder::default();

    let result = client(&transport)
        .read(&CancellationToken::new(), [stops.option()])
        .await;

    assert_matches!(result, Err(Error::Config(ConfigError::UnboundedRead)));
    assert!(transport.read_requests().is_empty());
    assert!(stops.calls().is_empty());
}

#[tokio::test]
async fn test_invalid_options_rejected_before_any_call() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();

    let result = client(&transport)
        .read(
            &CancellationToken::new(),
            [with_stream_options([for_stream("")]), for_limited_count(1)],
        )
        .await;
    assert_matches!(result, Err(Error::Config(ConfigError::EmptyStreamName)));

    let result = client(&transport)
        .read(
            &CancellationToken::new(),
            [
                with_stream_options([for_stream("orders-1")]),
                with_filter_options([]),
                for_limited_count(1),
            ],
        )
        .await;
    assert_matches!(result, Err(Error::Config(ConfigError::FilterOnStream)));

    assert!(transport.read_requests().is_empty());
}

#[tokio::test]
async fn test_connect_failure() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    transport.fail_next_read(TransportError::ConnectionFailed("refused".to_string()));

    let stops = StopRecorder::default();
    let result = client(&transport)
        .read(
            &CancellationToken::new(),
            [for_limited_count(1), stops.option()],
        )
        .await;

    assert_matches!(
        result,
        Err(Error::Connect {
            call: "read",
            source: TransportError::ConnectionFailed(_),
        })
    );
    assert!(stops.calls().is_empty());
}

#[tokio::test]
async fn test_read_with_cancelled_scope() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    let _feed = transport.expect_read();

    let scope = CancellationToken::new();
    scope.cancel();

    let result = client(&transport)
        .read(&scope, [for_limited_count(1)])
        .await;

    assert!(result.unwrap_err().is_cancelled());
}

#[tokio::test]
async fn test_cancel_preempts_pending_receive() {
    let _ = tracing_subscriber::fmt::try_init();

    let transport = MemoryTransport::new_default();
    let feed = transport.expect_read();
    feed.push(event("orders-1", 0)).unwrap();

    let scope = CancellationToken::new();
    let canceller = scope.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let stops = StopRecorder::default();
    let result = tokio::time::timeout(
        Duration::from_secs(5),
        client(&transport).read(&scope, [for_limited_count(10), stops.option()]),
    )
    .await
    .expect("read should stop once cancelled");

    assert_matches!(result, Err(Error::Cancelled));
    assert_eq!(stops.calls(), vec![Some(Error::Cancelled.to_string())]);
    assert!(feed.is_released());
}
