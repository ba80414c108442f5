//! Synthetic analytics projector
//!
//! Deterministic placeholder formulas, not telemetry. The exact numbers
//! matter for parity with existing demos; do not tune them casually.

use serde::{Deserialize, Serialize};

/// Views saturate here (reached at 500 elapsed minutes)
const MAX_VIEWS: u64 = 1000;

/// Average watch time cap, in minutes
const MAX_WATCH_TIME_MINUTES: u64 = 45;

/// Projected audience numbers at a given elapsed time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsSnapshot {
    pub views: u64,
    pub unique_viewers: u64,
    pub watch_time_minutes: u64,
    pub chat_messages: u64,
    /// Percentage, always <= 100
    pub engagement: u64,
}

/// Project audience numbers from elapsed minutes.
///
/// Negative elapsed time (webinar not yet started) is treated as zero.
pub fn project_analytics(elapsed_minutes: i64, has_ended: bool) -> AnalyticsSnapshot {
    let minutes = elapsed_minutes.max(0) as u64;

    let views = (minutes * 2).min(MAX_VIEWS);
    let unique_viewers = views * 8 / 10;
    let watch_time_minutes = if has_ended {
        MAX_WATCH_TIME_MINUTES
    } else {
        minutes.min(MAX_WATCH_TIME_MINUTES)
    };
    let chat_messages = views * 3 / 10;
    let engagement = (chat_messages * 100 / views.max(1)).min(100);

    AnalyticsSnapshot {
        views,
        unique_viewers,
        watch_time_minutes,
        chat_messages,
        engagement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_elapsed() {
        let snap = project_analytics(0, false);
        assert_eq!(snap.views, 0);
        assert_eq!(snap.unique_viewers, 0);
        assert_eq!(snap.watch_time_minutes, 0);
        assert_eq!(snap.chat_messages, 0);
        assert_eq!(snap.engagement, 0);
    }

    #[test]
    fn test_negative_elapsed_clamped() {
        assert_eq!(project_analytics(-10, false), project_analytics(0, false));
    }

    #[test]
    fn test_formulas_at_ten_minutes() {
        let snap = project_analytics(10, false);
        assert_eq!(snap.views, 20);
        assert_eq!(snap.unique_viewers, 16);
        assert_eq!(snap.watch_time_minutes, 10);
        assert_eq!(snap.chat_messages, 6);
        assert_eq!(snap.engagement, 30);
    }

    #[test]
    fn test_views_saturate_at_500_minutes() {
        assert_eq!(project_analytics(500, false).views, 1000);
        assert_eq!(project_analytics(501, false).views, 1000);
        assert_eq!(project_analytics(10_000, false).views, 1000);
    }

    #[test]
    fn test_watch_time_caps_and_jumps_when_ended() {
        assert_eq!(project_analytics(44, false).watch_time_minutes, 44);
        assert_eq!(project_analytics(46, false).watch_time_minutes, 45);
        assert_eq!(project_analytics(3, true).watch_time_minutes, 45);
    }

    #[test]
    fn test_monotonic_until_saturation() {
        let mut previous = project_analytics(0, false);
        for minutes in 1..=520 {
            let current = project_analytics(minutes, false);
            assert!(current.views >= previous.views);
            assert!(current.unique_viewers >= previous.unique_viewers);
            assert!(current.chat_messages >= previous.chat_messages);
            assert!(current.engagement <= 100);
            previous = current;
        }
        assert_eq!(previous.views, 1000);
    }
}
