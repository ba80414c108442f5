//! Webinar model - the core scheduling unit

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Schedule;

/// A scheduled simulated-live webinar
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Webinar {
    pub id: Uuid,
    /// URL-friendly identifier, unique across the platform
    pub slug: String,
    pub title: String,
    pub description: Option<String>,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub schedule: Schedule,
    /// Resolved playable asset reference; upload/CDN is a collaborator concern
    pub video_url: Option<String>,
    pub is_active: bool,
}

impl Webinar {
    pub fn new(slug: String, title: String, owner_id: Uuid, schedule: Schedule) -> Self {
        Self {
            id: Uuid::new_v4(),
            slug,
            title,
            description: None,
            owner_id,
            created_at: Utc::now(),
            schedule,
            video_url: None,
            is_active: true,
        }
    }

    pub fn with_description(mut self, description: String) -> Self {
        self.description = Some(description);
        self
    }

    pub fn with_video_url(mut self, video_url: String) -> Self {
        self.video_url = Some(video_url);
        self
    }
}
