//! Stagecast Core Library
//!
//! Domain models, the live-window event projector, auth, permissions,
//! and storage for the Stagecast simulated-live webinar platform.

pub mod auth;
pub mod error;
pub mod invariants;
pub mod models;
pub mod permissions;
pub mod projector;
pub mod storage;

pub use error::{Error, Result};
pub use models::*;
pub use permissions::*;
pub use projector::{
    classify, elapsed_minutes, elapsed_seconds, project_analytics, visible_intervals,
    visible_messages, AnalyticsSnapshot, AutoplayRejected, MediaDriver, MediaElement,
    MediaPlaybackState, MediaTransition, WindowState,
};
pub use storage::{
    Database, EventRepository, Storage, UserRepository, WebhookRepository, WebinarRepository,
};
