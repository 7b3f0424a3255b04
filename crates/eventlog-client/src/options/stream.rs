use eventlog_transport::{Position, PositionSelector, RevisionSelector, StreamName, StreamSelector};

use super::{AllOption, ReadOption, StreamOption};
use crate::error::ConfigError;

/// Single-stream selector under construction.
#[derive(Debug, Default)]
pub struct StreamSelection {
    /// Stream to read, required
    pub name: Option<StreamName>,
    /// Revision to start from
    pub revision: RevisionSelector,
}

/// Read a single stream, configured by `options`.
///
/// The selector replaces any previous one. It is only assigned when every
/// sub-option succeeds.
#[must_use]
pub fn with_stream_options(options: impl IntoIterator<Item = StreamOption>) -> ReadOption {
    let options: Vec<_> = options.into_iter().collect();
    ReadOption::new(move |read| {
        let mut selection = StreamSelection::default();
        for option in options {
            option.apply(&mut selection)?;
        }

        let name = selection.name.ok_or(ConfigError::MissingStreamName)?;
        read.request.stream = StreamSelector::Stream {
            name,
            revision: selection.revision,
        };

        Ok(())
    })
}

/// Stream to read.
#[must_use]
pub fn for_stream(name: impl Into<StreamName>) -> StreamOption {
    let name = name.into();
    StreamOption::new(move |selection| {
        if name.is_empty() {
            return Err(ConfigError::EmptyStreamName);
        }
        selection.name = Some(name);
        Ok(())
    })
}

/// Start at an explicit revision.
#[must_use]
pub fn from_revision(revision: u64) -> StreamOption {
    StreamOption::new(move |selection| {
        selection.revision = RevisionSelector::Exact(revision);
        Ok(())
    })
}

/// Start at the first event of the stream.
#[must_use]
pub fn from_start_revision() -> StreamOption {
    StreamOption::new(|selection| {
        selection.revision = RevisionSelector::Start;
        Ok(())
    })
}

/// Start at the end of the stream.
#[must_use]
pub fn from_end_revision() -> StreamOption {
    StreamOption::new(|selection| {
        selection.revision = RevisionSelector::End;
        Ok(())
    })
}

/// Start the whole-log read at an explicit position.
#[must_use]
pub fn from_position(prepare: u64, commit: u64) -> AllOption {
    AllOption::new(move |selector| {
        *selector = PositionSelector::Exact(Position::new(commit, prepare));
        Ok(())
    })
}

/// Start the whole-log read at the beginning of the log.
#[must_use]
pub fn from_start_position() -> AllOption {
    AllOption::new(|selector| {
        *selector = PositionSelector::Start;
        Ok(())
    })
}

/// Start the whole-log read at the end of the log.
#[must_use]
pub fn from_end_position() -> AllOption {
    AllOption::new(|selector| {
        *selector = PositionSelector::End;
        Ok(())
    })
}
