//! Timed event models for the simulated-live script
//!
//! Scripted messages are instantaneous events: an appearance offset and no
//! expiry. CTA buttons and countdown timers are interval events, visible on
//! the half-open window `[offset, offset + duration)`.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::OverlayPosition;

/// A scripted chat message anchored to the webinar start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedMessage {
    pub id: Uuid,
    pub webinar_id: Uuid,
    /// Display name of the synthetic sender
    pub username: String,
    pub body: String,
    /// Seconds after start at which the message appears
    pub offset_seconds: u32,
}

impl ScriptedMessage {
    pub fn new(webinar_id: Uuid, username: String, body: String, offset_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            webinar_id,
            username,
            body,
            offset_seconds,
        }
    }
}

/// A call-to-action button shown during a scripted window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CtaButton {
    pub id: Uuid,
    pub webinar_id: Uuid,
    pub label: String,
    pub url: String,
    /// CSS color for rendering; the layer above decides how to apply it
    pub color: String,
    pub offset_seconds: u32,
    pub duration_seconds: u32,
    pub position: OverlayPosition,
}

impl CtaButton {
    pub fn new(
        webinar_id: Uuid,
        label: String,
        url: String,
        offset_seconds: u32,
        duration_seconds: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            webinar_id,
            label,
            url,
            color: "#3B82F6".to_string(),
            offset_seconds,
            duration_seconds,
            position: OverlayPosition::Below,
        }
    }
}

/// A countdown timer overlay shown during a scripted window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownTimer {
    pub id: Uuid,
    pub webinar_id: Uuid,
    pub offset_seconds: u32,
    pub duration_seconds: u32,
    pub position: OverlayPosition,
}

impl CountdownTimer {
    pub fn new(webinar_id: Uuid, offset_seconds: u32, duration_seconds: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            webinar_id,
            offset_seconds,
            duration_seconds,
            position: OverlayPosition::Above,
        }
    }
}

/// An event with both an appearance offset and a duration.
///
/// The visibility filter works against this seam so CTA buttons and timers
/// share one interval policy.
pub trait IntervalEvent {
    fn offset_seconds(&self) -> u32;
    fn duration_seconds(&self) -> u32;
}

impl IntervalEvent for CtaButton {
    fn offset_seconds(&self) -> u32 {
        self.offset_seconds
    }

    fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}

impl IntervalEvent for CountdownTimer {
    fn offset_seconds(&self) -> u32 {
        self.offset_seconds
    }

    fn duration_seconds(&self) -> u32 {
        self.duration_seconds
    }
}
