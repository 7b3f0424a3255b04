//! Option functions for read and append calls.
//!
//! A call starts from a documented default configuration and applies each
//! option in order. Options only touch the fields they own, and the first
//! option to fail aborts the call before any RPC is made.
//!
//! Mutually exclusive selectors follow last-write-wins: applying
//! [`with_stream_options`] and then [`with_all_options`] reads the whole log.

mod append;
mod filter;
mod read;
mod stream;

pub use append::{expect_any, expect_no_stream, expect_revision, expect_stream_exists};
pub use filter::{
    DEFAULT_CHECKPOINT_INTERVAL_MULTIPLIER, DEFAULT_WINDOW_MAX, include_event_prefixes,
    include_stream_prefixes, match_event_regex, match_stream_regex, with_checkpoint_interval,
    with_window_count, with_window_max,
};
pub use read::{
    as_subscription, for_limited_count, in_backwards_direction, in_forwards_direction,
    with_all_options, with_checkpoint_callback, with_filter_options, with_links_resolved,
    with_read_stopped_callback, with_string_uuid, with_structured_uuid, without_filter,
};
pub use stream::{
    StreamSelection, for_stream, from_end_position, from_end_revision, from_position,
    from_revision, from_start_position, from_start_revision, with_stream_options,
};

use std::fmt;

use eventlog_transport::{
    AppendOptions, Filter, Position, PositionSelector, ReadRequest, StreamName, StreamSelector,
};

use crate::error::{ConfigError, Error};

macro_rules! define_option {
    ($name:ident, $target:ty, $doc:expr) => {
        #[doc = $doc]
        pub struct $name(Box<dyn FnOnce(&mut $target) -> Result<(), ConfigError> + Send>);

        impl $name {
            /// Wrap a function as an option.
            pub fn new<F>(apply: F) -> Self
            where
                F: FnOnce(&mut $target) -> Result<(), ConfigError> + Send + 'static,
            {
                Self(Box::new(apply))
            }

            /// Apply the option.
            ///
            /// # Errors
            ///
            /// Returns the option's configuration error, if any.
            pub fn apply(self, target: &mut $target) -> Result<(), ConfigError> {
                (self.0)(target)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(stringify!($name))
            }
        }
    };
}

define_option!(ReadOption, ReadOptions, "An option applied to a read call.");
define_option!(
    StreamOption,
    StreamSelection,
    "An option applied to a single-stream selector."
);
define_option!(
    AllOption,
    PositionSelector,
    "An option applied to a whole-log selector."
);
define_option!(FilterOption, Filter, "An option applied to a read filter.");
define_option!(AppendOption, AppendOptions, "An option applied to an append call.");

/// Called with each checkpoint position received during a read.
pub type CheckpointCallback = Box<dyn FnMut(Position) + Send>;

/// Called once when a read stops, with the error that stopped it if any.
pub type ReadStoppedCallback = Box<dyn FnOnce(Option<&Error>) + Send>;

/// Resolved configuration of one read call.
///
/// Holds the request sent to the transport plus the callbacks invoked while
/// the read is consumed. Callbacks are never sent anywhere.
#[derive(Default)]
pub struct ReadOptions {
    pub(crate) request: ReadRequest,
    pub(crate) on_checkpoint: Option<CheckpointCallback>,
    pub(crate) on_read_stopped: Option<ReadStoppedCallback>,
}

impl ReadOptions {
    /// Apply `options` in order on top of the default configuration.
    ///
    /// # Errors
    ///
    /// Returns the first option error, or [`ConfigError::FilterOnStream`] if
    /// the result combines a filter with a single-stream selector.
    pub fn from_options(
        options: impl IntoIterator<Item = ReadOption>,
    ) -> Result<Self, ConfigError> {
        let mut resolved = Self::default();
        for option in options {
            option.apply(&mut resolved)?;
        }

        if resolved.request.filter.is_some()
            && matches!(resolved.request.stream, StreamSelector::Stream { .. })
        {
            return Err(ConfigError::FilterOnStream);
        }

        Ok(resolved)
    }

    /// The request that will be sent to the transport.
    #[must_use]
    pub const fn request(&self) -> &ReadRequest {
        &self.request
    }
}

impl fmt::Debug for ReadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadOptions")
            .field("request", &self.request)
            .field("on_checkpoint", &self.on_checkpoint.is_some())
            .field("on_read_stopped", &self.on_read_stopped.is_some())
            .finish()
    }
}

/// Apply `options` in order on top of the default append configuration for
/// `stream` (no concurrency check).
///
/// # Errors
///
/// Returns [`ConfigError::EmptyStreamName`] for an empty stream, or the first
/// option error.
pub fn append_options(
    stream: impl Into<StreamName>,
    options: impl IntoIterator<Item = AppendOption>,
) -> Result<AppendOptions, ConfigError> {
    let stream = stream.into();
    if stream.is_empty() {
        return Err(ConfigError::EmptyStreamName);
    }

    let mut resolved = AppendOptions::new(stream);
    for option in options {
        option.apply(&mut resolved)?;
    }

    Ok(resolved)
}
