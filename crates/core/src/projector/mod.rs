//! Live-window event projector
//!
//! The projector owns no persistent state. Everything here is a pure
//! function of (current time, schedule, event list), re-evaluated on a
//! polling tick by the runtime; the one stateful piece is the media driver,
//! whose side effects are limited to the injected media element.

mod analytics;
mod media;
mod visibility;
mod window;

pub use analytics::{project_analytics, AnalyticsSnapshot};
pub use media::{AutoplayRejected, MediaDriver, MediaElement, MediaPlaybackState, MediaTransition};
pub use visibility::{visible_intervals, visible_messages};
pub use window::{classify, elapsed_minutes, elapsed_seconds, WindowState};
