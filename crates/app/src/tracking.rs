//! Engagement tracking and webhook dispatch
//!
//! The sink is the seam to whatever carries events out of the process; the
//! default sink just logs. Webhook milestones are detected by boundary
//! crossing between consecutive ticks, so a lagging tick still fires every
//! milestone it slept through, exactly once.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::{json, Value};
use stagecast_core::{
    elapsed_minutes, project_analytics, Schedule, Webhook, WebhookEvent, Webinar,
};
use tracing::info;

use crate::ticker::TickSubscriber;

/// How far ahead of the start time the reminder milestone sits
const REMINDER_LEAD_MINUTES: i64 = 30;

/// Outbound event sink
pub trait TrackingSink: Send + Sync {
    fn track(&self, event: &str, payload: Value);
}

/// Default sink: structured log lines, no transport
pub struct LogSink;

impl TrackingSink for LogSink {
    fn track(&self, event: &str, payload: Value) {
        info!(event, payload = %payload, "Tracking event");
    }
}

/// Milestones whose boundary lies in `(prev, now]`, in schedule order.
///
/// `prev` of `None` arms the detector without firing: a session mounted
/// mid-webinar must not replay milestones that passed before it existed.
pub fn due_events(
    prev: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    schedule: &Schedule,
) -> Vec<WebhookEvent> {
    let Some(prev) = prev else {
        return Vec::new();
    };

    let boundaries = [
        (
            WebhookEvent::Reminder,
            schedule.start_time - Duration::minutes(REMINDER_LEAD_MINUTES),
        ),
        (WebhookEvent::Started, schedule.start_time),
        (WebhookEvent::Ended, schedule.end_time),
    ];

    boundaries
        .into_iter()
        .filter(|(_, at)| prev < *at && *at <= now)
        .map(|(event, _)| event)
        .collect()
}

/// Fires schedule milestones for one webinar into the tracking sink
pub struct WebhookDispatcher {
    webinar: Webinar,
    webhooks: Vec<Webhook>,
    sink: Arc<dyn TrackingSink>,
    last_tick: Option<DateTime<Utc>>,
}

impl WebhookDispatcher {
    pub fn new(webinar: Webinar, webhooks: Vec<Webhook>, sink: Arc<dyn TrackingSink>) -> Self {
        Self {
            webinar,
            webhooks,
            sink,
            last_tick: None,
        }
    }

    fn fire(&self, event: WebhookEvent, now: DateTime<Utc>) {
        let schedule = &self.webinar.schedule;
        let analytics = project_analytics(
            elapsed_minutes(now, schedule),
            event == WebhookEvent::Ended,
        );

        for hook in self.webhooks.iter().filter(|h| h.subscribes_to(event)) {
            self.sink.track(
                event.as_str(),
                json!({
                    "timestamp": now,
                    "url": hook.url,
                    "webhook_id": hook.id,
                    "webinar": {
                        "id": self.webinar.id,
                        "slug": self.webinar.slug,
                        "title": self.webinar.title,
                        "start_time": schedule.start_time,
                        "end_time": schedule.end_time,
                    },
                    "analytics": analytics,
                }),
            );
        }
    }
}

impl TickSubscriber for WebhookDispatcher {
    fn on_tick(&mut self, now: DateTime<Utc>) {
        let due = due_events(self.last_tick, now, &self.webinar.schedule);
        self.last_tick = Some(now);
        for event in due {
            self.fire(event, now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use uuid::Uuid;

    fn schedule(start: DateTime<Utc>) -> Schedule {
        Schedule::new(start, start + Duration::hours(1)).unwrap()
    }

    #[test]
    fn test_first_tick_arms_without_firing() {
        let start = Utc::now();
        assert!(due_events(None, start, &schedule(start)).is_empty());
    }

    #[test]
    fn test_each_boundary_fires_once() {
        let start = Utc::now();
        let sched = schedule(start);
        let reminder_at = start - Duration::minutes(30);

        // Tick straddling the reminder boundary
        let due = due_events(
            Some(reminder_at - Duration::seconds(1)),
            reminder_at,
            &sched,
        );
        assert_eq!(due, vec![WebhookEvent::Reminder]);

        // The next tick must not repeat it
        let due = due_events(Some(reminder_at), reminder_at + Duration::seconds(1), &sched);
        assert!(due.is_empty());
    }

    #[test]
    fn test_lagging_tick_catches_up_in_order() {
        let start = Utc::now();
        let sched = schedule(start);

        // One tick spanning reminder and start
        let due = due_events(
            Some(start - Duration::minutes(31)),
            start + Duration::seconds(5),
            &sched,
        );
        assert_eq!(due, vec![WebhookEvent::Reminder, WebhookEvent::Started]);
    }

    #[test]
    fn test_ended_fires_at_end_boundary() {
        let start = Utc::now();
        let sched = schedule(start);
        let due = due_events(
            Some(sched.end_time - Duration::seconds(1)),
            sched.end_time,
            &sched,
        );
        assert_eq!(due, vec![WebhookEvent::Ended]);
    }

    struct RecordingSink {
        events: Mutex<Vec<(String, Value)>>,
    }

    impl TrackingSink for RecordingSink {
        fn track(&self, event: &str, payload: Value) {
            self.events.lock().unwrap().push((event.into(), payload));
        }
    }

    #[test]
    fn test_dispatcher_respects_subscriptions() {
        let start = Utc::now();
        let webinar = Webinar::new(
            "launch".into(),
            "Launch".into(),
            Uuid::new_v4(),
            schedule(start),
        );
        let subscribed = Webhook::new(
            webinar.id,
            "https://hooks.example.com/a".into(),
            vec![WebhookEvent::Started],
        );
        let mut disabled = Webhook::new(
            webinar.id,
            "https://hooks.example.com/b".into(),
            vec![WebhookEvent::Started],
        );
        disabled.enabled = false;

        let sink = Arc::new(RecordingSink {
            events: Mutex::new(Vec::new()),
        });
        let mut dispatcher =
            WebhookDispatcher::new(webinar.clone(), vec![subscribed, disabled], sink.clone());

        dispatcher.on_tick(start - Duration::seconds(1));
        dispatcher.on_tick(start + Duration::seconds(1));

        let events = sink.events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].0, "webinar.started");
        assert_eq!(
            events[0].1["webinar"]["slug"],
            Value::String("launch".into())
        );
        assert_eq!(events[0].1["url"], "https://hooks.example.com/a");
    }

    #[test]
    fn test_dispatcher_mounted_mid_webinar_stays_quiet() {
        let start = Utc::now() - Duration::minutes(10);
        let webinar = Webinar::new(
            "running".into(),
            "Running".into(),
            Uuid::new_v4(),
            schedule(start),
        );
        let hook = Webhook::new(
            webinar.id,
            "https://hooks.example.com".into(),
            vec![
                WebhookEvent::Reminder,
                WebhookEvent::Started,
                WebhookEvent::Ended,
            ],
        );

        let sink = Arc::new(RecordingSink {
            events: Mutex::new(Vec::new()),
        });
        let mut dispatcher = WebhookDispatcher::new(webinar, vec![hook], sink.clone());

        // Mounted ten minutes in: reminder and start are in the past
        dispatcher.on_tick(Utc::now());
        dispatcher.on_tick(Utc::now() + Duration::seconds(1));
        assert!(sink.events.lock().unwrap().is_empty());
    }
}
