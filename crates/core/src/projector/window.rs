//! Window classifier
//!
//! Classifies an instant against a webinar schedule. Pure and total;
//! malformed schedules are a caller precondition (validated at creation)
//! and are not re-checked here.

use chrono::{DateTime, Utc};

use crate::models::Schedule;

/// Where "now" falls relative to the broadcast window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowState {
    Upcoming,
    Live,
    Ended,
}

/// Classify an instant against the schedule.
///
/// `start_time <= now <= end_time` is Live; the end instant itself still
/// counts as Live.
pub fn classify(now: DateTime<Utc>, schedule: &Schedule) -> WindowState {
    if now < schedule.start_time {
        WindowState::Upcoming
    } else if now <= schedule.end_time {
        WindowState::Live
    } else {
        WindowState::Ended
    }
}

/// Master timebase for event visibility: seconds since the scheduled start.
/// Negative while the webinar is upcoming.
pub fn elapsed_seconds(now: DateTime<Utc>, schedule: &Schedule) -> i64 {
    (now - schedule.start_time).num_seconds()
}

/// Elapsed whole minutes since start, clamped to zero before the start.
/// Input to the synthetic analytics projection.
pub fn elapsed_minutes(now: DateTime<Utc>, schedule: &Schedule) -> i64 {
    (elapsed_seconds(now, schedule) / 60).max(0)
}
