//! Viewer playback session
//!
//! Wires the core projector to the shared tick source. Each tick the session
//! re-derives window state, visible events, and analytics from the clock
//! sample, pushes deltas to its observer, and advances the media driver.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use stagecast_core::{
    classify, elapsed_minutes, elapsed_seconds, project_analytics, visible_intervals,
    visible_messages, AnalyticsSnapshot, CountdownTimer, CtaButton, Database, MediaDriver,
    MediaElement, MediaPlaybackState, MediaTransition, Result, ScriptedMessage, Webinar,
    WindowState,
};
use tracing::warn;
use uuid::Uuid;

use crate::ticker::TickSubscriber;
use crate::tracking::TrackingSink;

/// Everything a session needs about one webinar, loaded up front.
/// The script never changes while the session runs.
#[derive(Debug, Clone)]
pub struct WebinarScript {
    pub webinar: Webinar,
    pub messages: Vec<ScriptedMessage>,
    pub ctas: Vec<CtaButton>,
    pub timers: Vec<CountdownTimer>,
}

impl WebinarScript {
    pub fn load_by_slug(db: &Database, slug: &str) -> Result<Option<Self>> {
        let Some(webinar) = db.webinars().find_by_slug(slug)? else {
            return Ok(None);
        };
        let messages = db.messages().list_for_webinar(webinar.id)?;
        let ctas = db.events().list_ctas(webinar.id)?;
        let timers = db.events().list_timers(webinar.id)?;
        Ok(Some(Self {
            webinar,
            messages,
            ctas,
            timers,
        }))
    }
}

/// Receives per-tick deltas from the session. The presentation layer
/// implements whichever callbacks it renders.
pub trait SessionObserver: Send {
    fn window_changed(&mut self, _state: WindowState) {}
    fn messages_revealed(&mut self, _messages: &[ScriptedMessage]) {}
    fn ctas_changed(&mut self, _visible: &[CtaButton]) {}
    fn timers_changed(&mut self, _visible: &[CountdownTimer]) {}
    fn analytics_updated(&mut self, _snapshot: AnalyticsSnapshot) {}
    fn playback_started(&mut self) {}
    fn playback_ended(&mut self) {}
}

pub struct PlaybackSession<M, O> {
    script: WebinarScript,
    driver: MediaDriver<M>,
    observer: O,
    sink: Arc<dyn TrackingSink>,
    window: Option<WindowState>,
    revealed_messages: usize,
    visible_cta_ids: Vec<Uuid>,
    visible_timer_ids: Vec<Uuid>,
    analytics: Option<AnalyticsSnapshot>,
}

impl<M: MediaElement + Send, O: SessionObserver> PlaybackSession<M, O> {
    pub fn new(
        script: WebinarScript,
        driver: MediaDriver<M>,
        observer: O,
        sink: Arc<dyn TrackingSink>,
    ) -> Self {
        Self {
            script,
            driver,
            observer,
            sink,
            window: None,
            revealed_messages: 0,
            visible_cta_ids: Vec::new(),
            visible_timer_ids: Vec::new(),
            analytics: None,
        }
    }

    pub fn script(&self) -> &WebinarScript {
        &self.script
    }

    pub fn window(&self) -> Option<WindowState> {
        self.window
    }

    pub fn media_state(&self) -> MediaPlaybackState {
        self.driver.state()
    }

    /// Record a viewer click on a visible CTA
    pub fn cta_clicked(&self, cta_id: Uuid) {
        let Some(button) = self.script.ctas.iter().find(|c| c.id == cta_id) else {
            warn!(%cta_id, "Click on unknown CTA");
            return;
        };
        self.sink.track(
            "cta.clicked",
            json!({
                "timestamp": Utc::now(),
                "webinar_id": self.script.webinar.id,
                "cta_id": button.id,
                "label": button.label,
                "url": button.url,
            }),
        );
    }

    /// End-of-stream signal from the media element
    pub fn media_ended(&mut self) {
        if self.driver.on_media_ended().is_some() {
            self.observer.playback_ended();
            self.sink
                .track("playback.ended", self.event_payload(Utc::now()));
        }
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    fn event_payload(&self, now: DateTime<Utc>) -> Value {
        json!({
            "timestamp": now,
            "webinar_id": self.script.webinar.id,
            "slug": self.script.webinar.slug,
        })
    }
}

impl<M: MediaElement + Send, O: SessionObserver> TickSubscriber for PlaybackSession<M, O> {
    fn on_tick(&mut self, now: DateTime<Utc>) {
        let schedule = self.script.webinar.schedule;

        let window = classify(now, &schedule);
        if self.window != Some(window) {
            self.window = Some(window);
            self.observer.window_changed(window);
        }

        let elapsed = elapsed_seconds(now, &schedule);

        // Messages are stored offset-ordered, so the visible set is a prefix
        // and the delta since last tick is a contiguous slice.
        let visible = visible_messages(elapsed, &self.script.messages).len();
        if visible > self.revealed_messages {
            let newly = self.script.messages[self.revealed_messages..visible].to_vec();
            self.revealed_messages = visible;
            self.observer.messages_revealed(&newly);
        }

        let ctas: Vec<CtaButton> = visible_intervals(elapsed, &self.script.ctas)
            .into_iter()
            .cloned()
            .collect();
        let cta_ids: Vec<Uuid> = ctas.iter().map(|c| c.id).collect();
        if cta_ids != self.visible_cta_ids {
            self.visible_cta_ids = cta_ids;
            self.observer.ctas_changed(&ctas);
        }

        let timers: Vec<CountdownTimer> = visible_intervals(elapsed, &self.script.timers)
            .into_iter()
            .cloned()
            .collect();
        let timer_ids: Vec<Uuid> = timers.iter().map(|t| t.id).collect();
        if timer_ids != self.visible_timer_ids {
            self.visible_timer_ids = timer_ids;
            self.observer.timers_changed(&timers);
        }

        match self.driver.tick(now, window) {
            Some(MediaTransition::Started) => {
                self.observer.playback_started();
                self.sink.track("playback.started", self.event_payload(now));
            }
            Some(MediaTransition::Unmuted) => {}
            Some(MediaTransition::Ended) => {
                self.observer.playback_ended();
                self.sink.track("playback.ended", self.event_payload(now));
            }
            None => {}
        }

        let has_ended = window == WindowState::Ended
            || self.driver.state() == MediaPlaybackState::Ended;
        let snapshot = project_analytics(elapsed_minutes(now, &schedule), has_ended);
        if self.analytics != Some(snapshot) {
            self.analytics = Some(snapshot);
            self.observer.analytics_updated(snapshot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use stagecast_core::{AutoplayRejected, Schedule};
    use std::sync::Mutex;

    struct FakeMedia;

    impl MediaElement for FakeMedia {
        fn play(&mut self) -> std::result::Result<(), AutoplayRejected> {
            Ok(())
        }

        fn pause(&mut self) {}

        fn set_muted(&mut self, _muted: bool) {}
    }

    #[derive(Clone, Default)]
    struct RecordingObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl RecordingObserver {
        fn log(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }

        fn push(&self, event: String) {
            self.events.lock().unwrap().push(event);
        }
    }

    impl SessionObserver for RecordingObserver {
        fn window_changed(&mut self, state: WindowState) {
            self.push(format!("window:{:?}", state));
        }

        fn messages_revealed(&mut self, messages: &[ScriptedMessage]) {
            for m in messages {
                self.push(format!("msg:{}", m.offset_seconds));
            }
        }

        fn ctas_changed(&mut self, visible: &[CtaButton]) {
            self.push(format!("ctas:{}", visible.len()));
        }

        fn timers_changed(&mut self, visible: &[CountdownTimer]) {
            self.push(format!("timers:{}", visible.len()));
        }

        fn analytics_updated(&mut self, snapshot: AnalyticsSnapshot) {
            self.push(format!("analytics:{}", snapshot.views));
        }

        fn playback_started(&mut self) {
            self.push("started".into());
        }

        fn playback_ended(&mut self) {
            self.push("ended".into());
        }
    }

    struct RecordingSink {
        events: Mutex<Vec<String>>,
    }

    impl TrackingSink for RecordingSink {
        fn track(&self, event: &str, _payload: Value) {
            self.events.lock().unwrap().push(event.into());
        }
    }

    fn demo_script(start: DateTime<Utc>) -> WebinarScript {
        let schedule = Schedule::new(start, start + Duration::hours(1)).unwrap();
        let webinar = Webinar::new("demo".into(), "Demo".into(), Uuid::new_v4(), schedule);
        let messages = vec![
            ScriptedMessage::new(webinar.id, "host".into(), "welcome".into(), 0),
            ScriptedMessage::new(webinar.id, "guest".into(), "nice".into(), 300),
            ScriptedMessage::new(webinar.id, "guest".into(), "thanks".into(), 600),
        ];
        let ctas = vec![CtaButton::new(
            webinar.id,
            "Offer".into(),
            "https://example.com".into(),
            0,
            60,
        )];
        let timers = vec![CountdownTimer::new(webinar.id, 30, 60)];
        WebinarScript {
            webinar,
            messages,
            ctas,
            timers,
        }
    }

    fn session(
        start: DateTime<Utc>,
    ) -> (
        PlaybackSession<FakeMedia, RecordingObserver>,
        RecordingObserver,
        Arc<RecordingSink>,
    ) {
        let observer = RecordingObserver::default();
        let sink = Arc::new(RecordingSink {
            events: Mutex::new(Vec::new()),
        });
        let session = PlaybackSession::new(
            demo_script(start),
            MediaDriver::new(FakeMedia),
            observer.clone(),
            sink.clone(),
        );
        (session, observer, sink)
    }

    #[test]
    fn test_upcoming_tick_shows_nothing() {
        let start = Utc::now() + Duration::minutes(5);
        let (mut session, observer, sink) = session(start);

        session.on_tick(start - Duration::seconds(10));

        assert_eq!(session.window(), Some(WindowState::Upcoming));
        assert_eq!(session.media_state(), MediaPlaybackState::NotStarted);
        // Initial render: window and a zero analytics snapshot, nothing else
        assert_eq!(observer.log(), vec!["window:Upcoming", "analytics:0"]);
        assert!(sink.events.lock().unwrap().is_empty());
    }

    #[test]
    fn test_live_tick_reveals_script_and_starts_playback() {
        let start = Utc::now();
        let (mut session, observer, sink) = session(start);

        session.on_tick(start);

        let log = observer.log();
        assert!(log.contains(&"window:Live".to_string()));
        assert!(log.contains(&"msg:0".to_string()));
        assert!(log.contains(&"ctas:1".to_string()));
        assert!(log.contains(&"started".to_string()));
        assert_eq!(
            sink.events.lock().unwrap().as_slice(),
            &["playback.started"]
        );
    }

    #[test]
    fn test_deltas_only_fire_on_change() {
        let start = Utc::now();
        let (mut session, observer, _sink) = session(start);

        session.on_tick(start + Duration::seconds(10));
        let after_first = observer.log().len();

        // Same visible sets ten seconds later, apart from the unmute
        session.on_tick(start + Duration::seconds(20));
        assert_eq!(observer.log().len(), after_first);
    }

    #[test]
    fn test_interval_events_expire() {
        let start = Utc::now();
        let (mut session, observer, _sink) = session(start);

        session.on_tick(start + Duration::seconds(10));
        session.on_tick(start + Duration::seconds(45));
        session.on_tick(start + Duration::seconds(95));

        let log = observer.log();
        // CTA [0, 60): shown then hidden. Timer [30, 90): shown then hidden.
        assert!(log.contains(&"ctas:1".to_string()));
        assert!(log.contains(&"ctas:0".to_string()));
        assert!(log.contains(&"timers:1".to_string()));
        assert!(log.contains(&"timers:0".to_string()));
    }

    #[test]
    fn test_messages_reveal_incrementally_and_persist() {
        let start = Utc::now();
        let (mut session, observer, _sink) = session(start);

        session.on_tick(start);
        session.on_tick(start + Duration::seconds(300));
        session.on_tick(start + Duration::seconds(700));

        let msgs: Vec<_> = observer
            .log()
            .into_iter()
            .filter(|e| e.starts_with("msg:"))
            .collect();
        assert_eq!(msgs, vec!["msg:0", "msg:300", "msg:600"]);
    }

    #[test]
    fn test_window_end_finishes_session() {
        let start = Utc::now() - Duration::hours(2);
        let (mut session, observer, sink) = session(start);

        session.on_tick(start + Duration::minutes(30));
        session.on_tick(start + Duration::hours(1) + Duration::seconds(1));

        assert_eq!(session.window(), Some(WindowState::Ended));
        assert_eq!(session.media_state(), MediaPlaybackState::Ended);
        assert!(observer.log().contains(&"ended".to_string()));
        assert!(sink
            .events
            .lock()
            .unwrap()
            .contains(&"playback.ended".to_string()));

        // Ended analytics pin watch time to the cap: views stay, ended flag set
        let snap = project_analytics(60, true);
        assert!(observer
            .log()
            .contains(&format!("analytics:{}", snap.views)));
    }

    #[test]
    fn test_media_end_signal_is_terminal() {
        let start = Utc::now();
        let (mut session, observer, _sink) = session(start);

        session.on_tick(start);
        session.media_ended();
        assert_eq!(session.media_state(), MediaPlaybackState::Ended);

        // Still Live, but playback never restarts
        session.on_tick(start + Duration::seconds(30));
        let starts = observer
            .log()
            .iter()
            .filter(|e| e.as_str() == "started")
            .count();
        assert_eq!(starts, 1);
    }

    #[test]
    fn test_cta_click_tracked() {
        let start = Utc::now();
        let (session, _observer, sink) = session(start);
        let cta_id = session.script().ctas[0].id;

        session.cta_clicked(cta_id);
        session.cta_clicked(Uuid::new_v4());

        assert_eq!(sink.events.lock().unwrap().as_slice(), &["cta.clicked"]);
    }
}
