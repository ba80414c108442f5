//! Developer guardrails and invariants
//!
//! Debug assertions for detecting impossible states during development.
//! These checks are compiled out in release builds.

use uuid::Uuid;

use crate::models::{IntervalEvent, Schedule, ScriptedMessage, Webinar};

/// Validate that a schedule is internally consistent
pub fn assert_schedule_invariants(schedule: &Schedule) {
    debug_assert!(
        schedule.start_time < schedule.end_time,
        "Schedule starts at {} but ends at {}",
        schedule.start_time,
        schedule.end_time
    );
}

/// Validate that a webinar's state is internally consistent
pub fn assert_webinar_invariants(webinar: &Webinar) {
    assert_schedule_invariants(&webinar.schedule);

    debug_assert!(
        !webinar.slug.trim().is_empty(),
        "Webinar {} has empty slug",
        webinar.id
    );

    debug_assert!(
        webinar.owner_id != Uuid::nil(),
        "Webinar {} has nil owner_id",
        webinar.id
    );
}

/// Validate that an interval event defines a non-empty window
pub fn assert_interval_invariants<E: IntervalEvent>(event: &E, context: &str) {
    debug_assert!(
        event.duration_seconds() > 0,
        "Interval event with zero duration in context: {}",
        context
    );
}

/// Validate that a message list is sorted by offset (creation/edit-time order)
pub fn assert_message_order(messages: &[ScriptedMessage]) {
    debug_assert!(
        messages
            .windows(2)
            .all(|pair| pair[0].offset_seconds <= pair[1].offset_seconds),
        "Scripted messages are not sorted by offset"
    );
}
