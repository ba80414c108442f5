//! Media driver state machine
//!
//! Drives the local video element in reaction to window-state changes.
//! Autoplay starts muted to satisfy player autoplay policies, unmutes
//! shortly after, and retries on rejection while the window stays Live.
//! `Ended` is terminal: a finished session can only restart via a fresh
//! driver (full reload).

use chrono::{DateTime, Duration, Utc};
use thiserror::Error;
use tracing::debug;

use super::window::WindowState;

/// The one anticipated failure mode in this subsystem. Non-fatal; the
/// driver logs and retries.
#[derive(Debug, Error)]
#[error("autoplay rejected by media backend")]
pub struct AutoplayRejected;

/// Seam to the underlying player. The real element (browser video, mpv,
/// whatever hosts the session) is an external collaborator.
pub trait MediaElement {
    fn play(&mut self) -> Result<(), AutoplayRejected>;
    fn pause(&mut self);
    fn set_muted(&mut self, muted: bool);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaPlaybackState {
    NotStarted,
    Playing,
    Paused,
    Ended,
}

/// State-machine transition surfaced to the session for notices/tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaTransition {
    Started,
    Unmuted,
    Ended,
}

pub struct MediaDriver<M> {
    media: M,
    state: MediaPlaybackState,
    unmute_at: Option<DateTime<Utc>>,
    next_retry_at: Option<DateTime<Utc>>,
    unmute_delay: Duration,
    retry_interval: Duration,
}

impl<M: MediaElement> MediaDriver<M> {
    pub fn new(media: M) -> Self {
        Self::with_intervals(media, Duration::seconds(1), Duration::seconds(2))
    }

    pub fn with_intervals(media: M, unmute_delay: Duration, retry_interval: Duration) -> Self {
        Self {
            media,
            state: MediaPlaybackState::NotStarted,
            unmute_at: None,
            next_retry_at: None,
            unmute_delay,
            retry_interval,
        }
    }

    pub fn state(&self) -> MediaPlaybackState {
        self.state
    }

    /// Advance the state machine one polling tick.
    ///
    /// Returns the transition taken this tick, if any.
    pub fn tick(&mut self, now: DateTime<Utc>, window: WindowState) -> Option<MediaTransition> {
        if self.state == MediaPlaybackState::Ended {
            return None;
        }

        match window {
            WindowState::Upcoming => None,
            WindowState::Live => self.tick_live(now),
            WindowState::Ended => {
                self.media.pause();
                self.finish();
                Some(MediaTransition::Ended)
            }
        }
    }

    fn tick_live(&mut self, now: DateTime<Utc>) -> Option<MediaTransition> {
        match self.state {
            MediaPlaybackState::NotStarted => {
                if let Some(retry_at) = self.next_retry_at {
                    if now < retry_at {
                        return None;
                    }
                }
                self.attempt_autoplay(now)
            }
            MediaPlaybackState::Playing => {
                if let Some(unmute_at) = self.unmute_at {
                    if now >= unmute_at {
                        self.unmute_at = None;
                        self.media.set_muted(false);
                        return Some(MediaTransition::Unmuted);
                    }
                }
                None
            }
            // Manual pause: the viewer decides when to resume
            MediaPlaybackState::Paused => None,
            MediaPlaybackState::Ended => None,
        }
    }

    fn attempt_autoplay(&mut self, now: DateTime<Utc>) -> Option<MediaTransition> {
        self.media.set_muted(true);
        match self.media.play() {
            Ok(()) => {
                self.state = MediaPlaybackState::Playing;
                self.next_retry_at = None;
                self.unmute_at = Some(now + self.unmute_delay);
                Some(MediaTransition::Started)
            }
            Err(AutoplayRejected) => {
                debug!("Autoplay rejected, will retry");
                self.next_retry_at = Some(now + self.retry_interval);
                None
            }
        }
    }

    /// End-of-stream signal from the underlying media. Terminal even while
    /// the window classifier still reports Live.
    pub fn on_media_ended(&mut self) -> Option<MediaTransition> {
        if self.state == MediaPlaybackState::Ended {
            return None;
        }
        self.finish();
        Some(MediaTransition::Ended)
    }

    /// Manual pause. Does not affect the terminal state.
    pub fn pause(&mut self) {
        if self.state == MediaPlaybackState::Playing {
            self.media.pause();
            self.state = MediaPlaybackState::Paused;
        }
    }

    /// Manual resume after a manual pause
    pub fn resume(&mut self) {
        if self.state == MediaPlaybackState::Paused {
            match self.media.play() {
                Ok(()) => self.state = MediaPlaybackState::Playing,
                Err(AutoplayRejected) => debug!("Resume rejected by media backend"),
            }
        }
    }

    fn finish(&mut self) {
        self.state = MediaPlaybackState::Ended;
        self.unmute_at = None;
        self.next_retry_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeMedia {
        rejections_left: u32,
        play_attempts: u32,
        pause_calls: u32,
        muted: Option<bool>,
    }

    impl FakeMedia {
        fn rejecting(n: u32) -> Self {
            Self {
                rejections_left: n,
                ..Self::default()
            }
        }
    }

    impl MediaElement for FakeMedia {
        fn play(&mut self) -> Result<(), AutoplayRejected> {
            self.play_attempts += 1;
            if self.rejections_left > 0 {
                self.rejections_left -= 1;
                return Err(AutoplayRejected);
            }
            Ok(())
        }

        fn pause(&mut self) {
            self.pause_calls += 1;
        }

        fn set_muted(&mut self, muted: bool) {
            self.muted = Some(muted);
        }
    }

    fn now() -> DateTime<Utc> {
        Utc::now()
    }

    #[test]
    fn test_no_autoplay_while_upcoming() {
        let mut driver = MediaDriver::new(FakeMedia::default());
        assert_eq!(driver.tick(now(), WindowState::Upcoming), None);
        assert_eq!(driver.media.play_attempts, 0);
        assert_eq!(driver.state(), MediaPlaybackState::NotStarted);
    }

    #[test]
    fn test_autoplay_starts_muted_on_live() {
        let mut driver = MediaDriver::new(FakeMedia::default());
        let t = now();
        assert_eq!(
            driver.tick(t, WindowState::Live),
            Some(MediaTransition::Started)
        );
        assert_eq!(driver.state(), MediaPlaybackState::Playing);
        assert_eq!(driver.media.muted, Some(true));
    }

    #[test]
    fn test_unmute_after_delay() {
        let mut driver = MediaDriver::new(FakeMedia::default());
        let t = now();
        driver.tick(t, WindowState::Live);

        // Before the delay elapses the element stays muted
        assert_eq!(driver.tick(t, WindowState::Live), None);
        assert_eq!(driver.media.muted, Some(true));

        let later = t + Duration::seconds(1);
        assert_eq!(
            driver.tick(later, WindowState::Live),
            Some(MediaTransition::Unmuted)
        );
        assert_eq!(driver.media.muted, Some(false));
    }

    #[test]
    fn test_autoplay_rejection_retries_on_interval() {
        let mut driver = MediaDriver::new(FakeMedia::rejecting(1));
        let t = now();

        assert_eq!(driver.tick(t, WindowState::Live), None);
        assert_eq!(driver.media.play_attempts, 1);
        assert_eq!(driver.state(), MediaPlaybackState::NotStarted);

        // One second later: still inside the retry backoff
        assert_eq!(driver.tick(t + Duration::seconds(1), WindowState::Live), None);
        assert_eq!(driver.media.play_attempts, 1);

        // Two seconds later: retried and succeeded
        assert_eq!(
            driver.tick(t + Duration::seconds(2), WindowState::Live),
            Some(MediaTransition::Started)
        );
        assert_eq!(driver.media.play_attempts, 2);
        assert_eq!(driver.state(), MediaPlaybackState::Playing);
    }

    #[test]
    fn test_window_end_pauses_and_finishes() {
        let mut driver = MediaDriver::new(FakeMedia::default());
        let t = now();
        driver.tick(t, WindowState::Live);

        assert_eq!(
            driver.tick(t + Duration::hours(1), WindowState::Ended),
            Some(MediaTransition::Ended)
        );
        assert_eq!(driver.state(), MediaPlaybackState::Ended);
        assert_eq!(driver.media.pause_calls, 1);
    }

    #[test]
    fn test_ended_is_terminal() {
        let mut driver = MediaDriver::new(FakeMedia::default());
        let t = now();
        driver.tick(t, WindowState::Live);
        driver.tick(t, WindowState::Ended);

        // Even if the window is re-evaluated as Live, no further attempts
        let attempts = driver.media.play_attempts;
        assert_eq!(driver.tick(t + Duration::seconds(5), WindowState::Live), None);
        assert_eq!(driver.media.play_attempts, attempts);
        assert_eq!(driver.state(), MediaPlaybackState::Ended);
    }

    #[test]
    fn test_media_end_signal_terminal_while_live() {
        let mut driver = MediaDriver::new(FakeMedia::default());
        let t = now();
        driver.tick(t, WindowState::Live);

        assert_eq!(driver.on_media_ended(), Some(MediaTransition::Ended));
        assert_eq!(driver.on_media_ended(), None);

        // Window still Live, but the session stays finished
        assert_eq!(driver.tick(t + Duration::seconds(1), WindowState::Live), None);
        assert_eq!(driver.state(), MediaPlaybackState::Ended);
    }

    #[test]
    fn test_manual_pause_resume() {
        let mut driver = MediaDriver::new(FakeMedia::default());
        let t = now();
        driver.tick(t, WindowState::Live);

        driver.pause();
        assert_eq!(driver.state(), MediaPlaybackState::Paused);

        // Ticks while paused do not restart playback
        assert_eq!(driver.tick(t + Duration::seconds(3), WindowState::Live), None);
        assert_eq!(driver.state(), MediaPlaybackState::Paused);

        driver.resume();
        assert_eq!(driver.state(), MediaPlaybackState::Playing);
    }
}
