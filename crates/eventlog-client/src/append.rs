//! Append engine.

use eventlog_transport::{
    AppendCall, AppendOptions, AppendRequest, AppendResponse, AppendSuccess, ExpectedRevision,
    StreamName,
};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::event::ProposedEvent;

/// Drive an established append call: options frame, one frame per event,
/// then the terminal response.
pub(crate) async fn append_events(
    mut call: Box<dyn AppendCall>,
    options: AppendOptions,
    events: Vec<ProposedEvent>,
) -> Result<AppendSuccess> {
    let stream = options.stream.clone();
    let expected = options.expected_revision;
    let count = events.len();

    call.send(AppendRequest::Options(options))
        .await
        .map_err(Error::Transport)?;

    for event in events {
        call.send(AppendRequest::ProposedMessage(event.into()))
            .await
            .map_err(Error::Transport)?;
    }

    let response = call.close_and_recv().await.map_err(Error::Transport)?;
    debug!("Append of {} events to '{}' answered", count, stream);

    classify(stream, expected, response)
}

fn classify(
    stream: StreamName,
    expected: ExpectedRevision,
    response: AppendResponse,
) -> Result<AppendSuccess> {
    match response {
        AppendResponse::Success(success) => Ok(success),
        AppendResponse::WrongExpectedVersion(conflict) => {
            warn!(
                "Append to '{}' rejected: expected {}, current {:?}",
                stream, expected, conflict.current_revision
            );
            Err(Error::WrongExpectedVersion {
                stream,
                expected,
                current: conflict.current_revision,
            })
        }
        AppendResponse::Unrecognized(kind) => Err(Error::UnexpectedResponse(kind)),
    }
}
