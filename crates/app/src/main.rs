//! Stagecast - simulated-live webinar platform
//!
//! Headless runtime: seeds a demo webinar, mounts a playback session on the
//! shared ticker, and runs it to completion, logging everything a UI would
//! render.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stagecast_core::{
    auth, AnalyticsSnapshot, AutoplayRejected, CountdownTimer, CtaButton, MediaDriver,
    MediaElement, ScriptedMessage, WindowState,
};

mod config;
mod playback;
mod seed;
mod state;
mod ticker;
mod tracking;

use playback::{PlaybackSession, SessionObserver, WebinarScript};
use ticker::Ticker;
use tracking::{LogSink, WebhookDispatcher};

/// Media element for the headless runtime: playback is a log line
struct HeadlessMedia {
    muted: bool,
}

impl MediaElement for HeadlessMedia {
    fn play(&mut self) -> Result<(), AutoplayRejected> {
        tracing::info!(muted = self.muted, "Media playing");
        Ok(())
    }

    fn pause(&mut self) {
        tracing::info!("Media paused");
    }

    fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        tracing::info!(muted, "Media mute changed");
    }
}

/// Renders session deltas as log lines and flags completion
struct ConsoleObserver {
    ended: Arc<AtomicBool>,
}

impl SessionObserver for ConsoleObserver {
    fn window_changed(&mut self, state: WindowState) {
        tracing::info!(?state, "Window state changed");
    }

    fn messages_revealed(&mut self, messages: &[ScriptedMessage]) {
        for message in messages {
            tracing::info!(username = %message.username, body = %message.body, "Chat message");
        }
    }

    fn ctas_changed(&mut self, visible: &[CtaButton]) {
        let labels: Vec<&str> = visible.iter().map(|c| c.label.as_str()).collect();
        tracing::info!(?labels, "Visible CTAs changed");
    }

    fn timers_changed(&mut self, visible: &[CountdownTimer]) {
        tracing::info!(count = visible.len(), "Visible timers changed");
    }

    fn analytics_updated(&mut self, snapshot: AnalyticsSnapshot) {
        tracing::info!(
            views = snapshot.views,
            unique_viewers = snapshot.unique_viewers,
            engagement = snapshot.engagement,
            "Analytics updated"
        );
    }

    fn playback_started(&mut self) {
        tracing::info!("Playback started");
    }

    fn playback_ended(&mut self) {
        tracing::info!("Playback ended");
        self.ended.store(true, Ordering::SeqCst);
    }
}

fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Stagecast");

    let config_path =
        std::env::var("STAGECAST_CONFIG").unwrap_or_else(|_| "stagecast.toml".to_string());
    let config = match config::AppConfig::load(&config_path) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    // Initialize application state
    let app_state = match state::AppState::new(&config) {
        Ok(state) => Arc::new(state),
        Err(e) => {
            tracing::error!("Failed to initialize application: {}", e);
            std::process::exit(1);
        }
    };

    let (script, webhooks) = {
        let db = app_state.db.lock().unwrap();

        let slug = match &config.webinar_slug {
            Some(slug) => slug.clone(),
            None => {
                if let Err(e) = seed::seed_demo(&db) {
                    tracing::error!("Failed to seed demo webinar: {}", e);
                    std::process::exit(1);
                }

                // The seeded host doubles as the logged-in demo identity
                match auth::login(&db, "demo-host", "demo") {
                    Ok((user, session)) => {
                        app_state.set_current_user(Some(user.id));
                        app_state.set_current_session(Some(session.id));
                    }
                    Err(e) => tracing::warn!("Demo login failed: {}", e),
                }

                seed::DEMO_SLUG.to_string()
            }
        };

        let script = match WebinarScript::load_by_slug(&db, &slug) {
            Ok(Some(script)) => script,
            Ok(None) => {
                tracing::error!(%slug, "Webinar not found");
                std::process::exit(1);
            }
            Err(e) => {
                tracing::error!("Failed to load webinar: {}", e);
                std::process::exit(1);
            }
        };

        let webhooks = db
            .webhooks()
            .list_for_webinar(script.webinar.id)
            .unwrap_or_default();
        (script, webhooks)
    };

    tracing::info!(
        slug = %script.webinar.slug,
        title = %script.webinar.title,
        start = %script.webinar.schedule.start_time,
        "Mounting playback session"
    );

    let sink = Arc::new(LogSink);
    let ended = Arc::new(AtomicBool::new(false));

    let driver = MediaDriver::with_intervals(
        HeadlessMedia { muted: false },
        chrono::Duration::seconds(config.unmute_delay_secs),
        chrono::Duration::seconds(config.autoplay_retry_secs),
    );
    let session = PlaybackSession::new(
        script.clone(),
        driver,
        ConsoleObserver {
            ended: ended.clone(),
        },
        sink.clone(),
    );
    let dispatcher = WebhookDispatcher::new(script.webinar.clone(), webhooks, sink);

    let mut ticker = Ticker::new(Duration::from_secs(config.tick_interval_secs));
    ticker.subscribe(Box::new(session));
    ticker.subscribe(Box::new(dispatcher));
    ticker.start();

    // Run until the session reports end of playback
    while !ended.load(Ordering::SeqCst) {
        std::thread::sleep(Duration::from_millis(200));
    }
    ticker.stop();

    if let Some(session_id) = app_state.current_session_id() {
        let db = app_state.db.lock().unwrap();
        if let Err(e) = auth::logout(&db, session_id) {
            tracing::warn!("Logout failed: {}", e);
        }
    }

    tracing::info!("Stagecast finished");
}
