use eventlog_transport::{FilterExpression, FilterTarget, FilterWindow};

use super::FilterOption;
use crate::error::ConfigError;

/// Default max search window of a filtered read.
pub const DEFAULT_WINDOW_MAX: u32 = 32;

/// Default checkpoint interval multiplier of a filtered read.
pub const DEFAULT_CHECKPOINT_INTERVAL_MULTIPLIER: u32 = 1;

pub(super) fn default_target() -> FilterTarget {
    FilterTarget::StreamName(FilterExpression::Regex(".*".to_string()))
}

fn prefixes<I, S>(prefixes: I) -> Result<FilterExpression, ConfigError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let prefixes: Vec<String> = prefixes.into_iter().map(Into::into).collect();
    if prefixes.is_empty() {
        return Err(ConfigError::EmptyPrefixes);
    }
    Ok(FilterExpression::Prefixes(prefixes))
}

fn regex(pattern: String) -> Result<FilterExpression, ConfigError> {
    if pattern.is_empty() {
        return Err(ConfigError::EmptyRegex);
    }
    Ok(FilterExpression::Regex(pattern))
}

/// Keep events whose stream name starts with one of `values`.
#[must_use]
pub fn include_stream_prefixes<I, S>(values: I) -> FilterOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let expression = prefixes(values);
    FilterOption::new(move |filter| {
        filter.target = FilterTarget::StreamName(expression?);
        Ok(())
    })
}

/// Keep events whose stream name matches `pattern`.
#[must_use]
pub fn match_stream_regex(pattern: impl Into<String>) -> FilterOption {
    let expression = regex(pattern.into());
    FilterOption::new(move |filter| {
        filter.target = FilterTarget::StreamName(expression?);
        Ok(())
    })
}

/// Keep events whose type starts with one of `values`.
#[must_use]
pub fn include_event_prefixes<I, S>(values: I) -> FilterOption
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let expression = prefixes(values);
    FilterOption::new(move |filter| {
        filter.target = FilterTarget::EventType(expression?);
        Ok(())
    })
}

/// Keep events whose type matches `pattern`.
#[must_use]
pub fn match_event_regex(pattern: impl Into<String>) -> FilterOption {
    let expression = regex(pattern.into());
    FilterOption::new(move |filter| {
        filter.target = FilterTarget::EventType(expression?);
        Ok(())
    })
}

/// Let the server pick the search window from the read count.
#[must_use]
pub fn with_window_count() -> FilterOption {
    FilterOption::new(|filter| {
        filter.window = FilterWindow::Count;
        Ok(())
    })
}

/// Search at most `max` events between checkpoints.
#[must_use]
pub fn with_window_max(max: u32) -> FilterOption {
    FilterOption::new(move |filter| {
        if max == 0 {
            return Err(ConfigError::ZeroWindowMax);
        }
        filter.window = FilterWindow::Max(max);
        Ok(())
    })
}

/// Emit a checkpoint every `multiplier` search windows.
#[must_use]
pub fn with_checkpoint_interval(multiplier: u32) -> FilterOption {
    FilterOption::new(move |filter| {
        if multiplier == 0 {
            return Err(ConfigError::ZeroCheckpointInterval);
        }
        filter.checkpoint_interval_multiplier = multiplier;
        Ok(())
    })
}
