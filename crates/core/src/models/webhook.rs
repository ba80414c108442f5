//! Outbound webhook configuration
//!
//! Webhooks announce schedule milestones to external systems. Stagecast only
//! computes which events are due; delivery transport belongs to the caller.

use base64::Engine;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Schedule milestones a webhook can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookEvent {
    /// 30 minutes before the scheduled start
    Reminder,
    Started,
    Ended,
}

impl WebhookEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            WebhookEvent::Reminder => "webinar.reminder",
            WebhookEvent::Started => "webinar.started",
            WebhookEvent::Ended => "webinar.ended",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value {
            "webinar.reminder" => Some(WebhookEvent::Reminder),
            "webinar.started" => Some(WebhookEvent::Started),
            "webinar.ended" => Some(WebhookEvent::Ended),
            _ => None,
        }
    }
}

/// A webhook endpoint registered for a webinar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webhook {
    pub id: Uuid,
    pub webinar_id: Uuid,
    pub url: String,
    /// Shared signing secret, sent as `X-Webhook-Secret` by the delivery layer
    pub secret: String,
    pub enabled: bool,
    pub events: Vec<WebhookEvent>,
}

impl Webhook {
    pub fn new(webinar_id: Uuid, url: String, events: Vec<WebhookEvent>) -> Self {
        Self {
            id: Uuid::new_v4(),
            webinar_id,
            url,
            secret: generate_secret(),
            enabled: true,
            events,
        }
    }

    pub fn subscribes_to(&self, event: WebhookEvent) -> bool {
        self.enabled && self.events.contains(&event)
    }
}

/// Generate a random signing secret (32 bytes, base64)
fn generate_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}
