use eventlog_transport::ExpectedRevision;

use super::AppendOption;

fn expect(expected: ExpectedRevision) -> AppendOption {
    AppendOption::new(move |options| {
        options.expected_revision = expected;
        Ok(())
    })
}

/// Only append if the stream is at exactly `revision`.
#[must_use]
pub fn expect_revision(revision: u64) -> AppendOption {
    expect(ExpectedRevision::Exact(revision))
}

/// Only append if the stream does not exist yet.
#[must_use]
pub fn expect_no_stream() -> AppendOption {
    expect(ExpectedRevision::NoStream)
}

/// Only append if the stream already exists.
#[must_use]
pub fn expect_stream_exists() -> AppendOption {
    expect(ExpectedRevision::StreamExists)
}

/// Append regardless of the stream's state.
#[must_use]
pub fn expect_any() -> AppendOption {
    expect(ExpectedRevision::Any)
}
