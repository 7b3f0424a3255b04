use eventlog_transport::{
    CountSelector, Filter, FilterWindow, Position, PositionSelector, ReadDirection,
    StreamSelector, UuidFormat,
};

use super::filter::{DEFAULT_CHECKPOINT_INTERVAL_MULTIPLIER, DEFAULT_WINDOW_MAX, default_target};
use super::{AllOption, FilterOption, ReadOption};
use crate::error::Error;

/// Read the whole log, configured by `options`.
///
/// The selector replaces any previous one. It is only assigned when every
/// sub-option succeeds.
#[must_use]
pub fn with_all_options(options: impl IntoIterator<Item = AllOption>) -> ReadOption {
    let options: Vec<_> = options.into_iter().collect();
    ReadOption::new(move |read| {
        let mut selector = PositionSelector::default();
        for option in options {
            option.apply(&mut selector)?;
        }
        read.request.stream = StreamSelector::All(selector);
        Ok(())
    })
}

/// Read from newest to oldest.
#[must_use]
pub fn in_backwards_direction() -> ReadOption {
    ReadOption::new(|read| {
        read.request.direction = ReadDirection::Backwards;
        Ok(())
    })
}

/// Read from oldest to newest.
#[must_use]
pub fn in_forwards_direction() -> ReadOption {
    ReadOption::new(|read| {
        read.request.direction = ReadDirection::Forwards;
        Ok(())
    })
}

/// Have the server resolve link events to the events they point at.
#[must_use]
pub fn with_links_resolved() -> ReadOption {
    ReadOption::new(|read| {
        read.request.resolve_links = true;
        Ok(())
    })
}

/// Read at most `count` events.
#[must_use]
pub fn for_limited_count(count: u64) -> ReadOption {
    ReadOption::new(move |read| {
        read.request.count = CountSelector::Limit(count);
        Ok(())
    })
}

/// Keep reading as new events are written.
#[must_use]
pub fn as_subscription() -> ReadOption {
    ReadOption::new(|read| {
        read.request.count = CountSelector::Subscription;
        Ok(())
    })
}

/// Filter a whole-log read, configured by `options`.
///
/// Starts from the default filter (every stream name, max window of
/// [`DEFAULT_WINDOW_MAX`]) and replaces any previous filter.
#[must_use]
pub fn with_filter_options(options: impl IntoIterator<Item = FilterOption>) -> ReadOption {
    let options: Vec<_> = options.into_iter().collect();
    ReadOption::new(move |read| {
        let mut filter = Filter {
            target: default_target(),
            window: FilterWindow::Max(DEFAULT_WINDOW_MAX),
            checkpoint_interval_multiplier: DEFAULT_CHECKPOINT_INTERVAL_MULTIPLIER,
        };
        for option in options {
            option.apply(&mut filter)?;
        }
        read.request.filter = Some(filter);
        Ok(())
    })
}

/// Remove any filter.
#[must_use]
pub fn without_filter() -> ReadOption {
    ReadOption::new(|read| {
        read.request.filter = None;
        Ok(())
    })
}

/// Ask for event ids in structured form.
#[must_use]
pub fn with_structured_uuid() -> ReadOption {
    ReadOption::new(|read| {
        read.request.uuid_format = UuidFormat::Structured;
        Ok(())
    })
}

/// Ask for event ids in string form.
#[must_use]
pub fn with_string_uuid() -> ReadOption {
    ReadOption::new(|read| {
        read.request.uuid_format = UuidFormat::String;
        Ok(())
    })
}

/// Call `callback` with the position of every checkpoint received.
#[must_use]
pub fn with_checkpoint_callback<F>(callback: F) -> ReadOption
where
    F: FnMut(Position) + Send + 'static,
{
    ReadOption::new(move |read| {
        read.on_checkpoint = Some(Box::new(callback));
        Ok(())
    })
}

/// Call `callback` once when the read stops.
///
/// It receives `None` when the read completed and the error otherwise,
/// including [`Error::Cancelled`]. It is not called if the event handler or
/// the checkpoint callback panics.
#[must_use]
pub fn with_read_stopped_callback<F>(callback: F) -> ReadOption
where
    F: FnOnce(Option<&Error>) + Send + 'static,
{
    ReadOption::new(move |read| {
        read.on_read_stopped = Some(Box::new(callback));
        Ok(())
    })
}
