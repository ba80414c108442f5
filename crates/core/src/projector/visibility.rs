//! Event visibility filter
//!
//! Pure projections from elapsed time to the subset of scripted events a
//! viewer should currently see. The filter never re-sorts its input;
//! messages are kept in offset order by the storage layer.

use crate::models::{IntervalEvent, ScriptedMessage};

/// Messages visible at the given elapsed time.
///
/// Instantaneous events: once the offset is crossed the message is visible
/// permanently for the session. There is no expiry; chat history persists.
pub fn visible_messages(
    elapsed_seconds: i64,
    messages: &[ScriptedMessage],
) -> Vec<&ScriptedMessage> {
    messages
        .iter()
        .filter(|m| i64::from(m.offset_seconds) <= elapsed_seconds)
        .collect()
}

/// Interval events (CTA buttons, countdown timers) visible at the given
/// elapsed time: `offset <= elapsed < offset + duration`.
///
/// Overlapping windows stack; there is no priority policy. A zero duration
/// yields an empty interval and is never visible (creation rejects it, the
/// filter does not defend).
pub fn visible_intervals<E: IntervalEvent>(elapsed_seconds: i64, events: &[E]) -> Vec<&E> {
    events
        .iter()
        .filter(|e| {
            let offset = i64::from(e.offset_seconds());
            let until = offset + i64::from(e.duration_seconds());
            offset <= elapsed_seconds && elapsed_seconds < until
        })
        .collect()
}
