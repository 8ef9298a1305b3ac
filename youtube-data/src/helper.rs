//! Small utilities for consuming list streams and API values.

use crate::error::{Error, Result};
use jiff::{SignedDuration, Span};
use tokio_stream::{Stream, StreamExt};

/// Returns the first item of `stream`, or `None` if it is empty.
///
/// Only the first page is ever requested.
pub async fn first<T>(stream: impl Stream<Item = Result<T>>) -> Result<Option<T>> {
    let mut stream = std::pin::pin!(stream);
    stream.next().await.transpose()
}

/// Caps `stream` at `total` items.
///
/// Pages past the one holding the last wanted item are never requested.
pub fn limit<S, T>(stream: S, total: usize) -> Result<impl Stream<Item = Result<T>>>
where
    S: Stream<Item = Result<T>>,
{
    if total < 1 {
        return Err(Error::validation("total has to be bigger than 0"));
    }
    Ok(stream.take(total))
}

/// Parses an ISO 8601 duration as used by `contentDetails.duration`, e.g. `PT1H2M3S`.
///
/// Days and weeks count as 24 hours and 7 days. Years and months are rejected since their
/// length is ambiguous.
pub fn parse_duration(value: &str) -> Result<SignedDuration> {
    let span: Span = value
        .parse()
        .map_err(|e| Error::validation(format!("invalid duration {value:?}: {e}")))?;
    if span.get_years() != 0 || span.get_months() != 0 {
        return Err(Error::validation(format!(
            "duration {value:?} uses calendar units"
        )));
    }

    let secs = i64::from(span.get_weeks()) * 7 * 86_400
        + i64::from(span.get_days()) * 86_400
        + i64::from(span.get_hours()) * 3_600
        + span.get_minutes() * 60
        + span.get_seconds();
    let nanos = span.get_milliseconds() * 1_000_000
        + span.get_microseconds() * 1_000
        + span.get_nanoseconds();
    Ok(SignedDuration::from_secs(secs) + SignedDuration::from_nanos(nanos))
}
