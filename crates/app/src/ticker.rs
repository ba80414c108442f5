//! Shared tick source
//!
//! One background thread samples the clock and fans the instant out to every
//! subscriber, so all projections within a tick agree on `now`. Subscribers
//! register on session mount and must unregister on unmount.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::debug;

/// Receives the shared clock sample once per tick
pub trait TickSubscriber: Send {
    fn on_tick(&mut self, now: DateTime<Utc>);
}

pub type SubscriberId = u64;

struct TickerInner {
    subscribers: Mutex<Vec<(SubscriberId, Box<dyn TickSubscriber>)>>,
    next_id: AtomicU64,
    running: AtomicBool,
}

impl TickerInner {
    fn dispatch(&self, now: DateTime<Utc>) {
        let mut subscribers = self.subscribers.lock().unwrap();
        for (_, subscriber) in subscribers.iter_mut() {
            subscriber.on_tick(now);
        }
    }
}

pub struct Ticker {
    inner: Arc<TickerInner>,
    interval: Duration,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Self {
            inner: Arc::new(TickerInner {
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                running: AtomicBool::new(false),
            }),
            interval,
            handle: None,
        }
    }

    pub fn subscribe(&self, subscriber: Box<dyn TickSubscriber>) -> SubscriberId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner.subscribers.lock().unwrap().push((id, subscriber));
        debug!(subscriber_id = id, "Tick subscriber registered");
        id
    }

    /// Remove a subscriber; returns false if the id was already gone
    pub fn unsubscribe(&self, id: SubscriberId) -> bool {
        let mut subscribers = self.inner.subscribers.lock().unwrap();
        let before = subscribers.len();
        subscribers.retain(|(sub_id, _)| *sub_id != id);
        subscribers.len() < before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().unwrap().len()
    }

    /// Deliver a single tick synchronously
    pub fn tick_now(&self, now: DateTime<Utc>) {
        self.inner.dispatch(now);
    }

    /// Start the background polling thread
    pub fn start(&mut self) {
        if self.handle.is_some() {
            return;
        }
        self.inner.running.store(true, Ordering::SeqCst);

        let inner = self.inner.clone();
        let interval = self.interval;
        self.handle = Some(std::thread::spawn(move || {
            while inner.running.load(Ordering::SeqCst) {
                inner.dispatch(Utc::now());
                std::thread::sleep(interval);
            }
        }));
    }

    /// Stop the polling thread and wait for it to exit
    pub fn stop(&mut self) {
        self.inner.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Recorder {
        ticks: Arc<Mutex<Vec<DateTime<Utc>>>>,
    }

    impl TickSubscriber for Recorder {
        fn on_tick(&mut self, now: DateTime<Utc>) {
            self.ticks.lock().unwrap().push(now);
        }
    }

    fn recorder() -> (Recorder, Arc<Mutex<Vec<DateTime<Utc>>>>) {
        let ticks = Arc::new(Mutex::new(Vec::new()));
        (
            Recorder {
                ticks: ticks.clone(),
            },
            ticks,
        )
    }

    #[test]
    fn test_tick_now_reaches_all_subscribers() {
        let ticker = Ticker::new(Duration::from_secs(1));
        let (a, a_ticks) = recorder();
        let (b, b_ticks) = recorder();
        ticker.subscribe(Box::new(a));
        ticker.subscribe(Box::new(b));

        let now = Utc::now();
        ticker.tick_now(now);

        // Both subscribers observed the same instant
        assert_eq!(a_ticks.lock().unwrap().as_slice(), &[now]);
        assert_eq!(b_ticks.lock().unwrap().as_slice(), &[now]);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let ticker = Ticker::new(Duration::from_secs(1));
        let (sub, ticks) = recorder();
        let id = ticker.subscribe(Box::new(sub));
        ticker.tick_now(Utc::now());

        assert!(ticker.unsubscribe(id));
        assert!(!ticker.unsubscribe(id));
        assert_eq!(ticker.subscriber_count(), 0);

        ticker.tick_now(Utc::now());
        assert_eq!(ticks.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_background_thread_ticks_and_stops() {
        let mut ticker = Ticker::new(Duration::from_millis(10));
        let (sub, ticks) = recorder();
        ticker.subscribe(Box::new(sub));

        ticker.start();
        std::thread::sleep(Duration::from_millis(100));
        ticker.stop();

        let count = ticks.lock().unwrap().len();
        assert!(count >= 2, "expected at least 2 ticks, got {}", count);

        // No further ticks after stop
        std::thread::sleep(Duration::from_millis(30));
        assert_eq!(ticks.lock().unwrap().len(), count);
    }
}
