//! Storage repository traits
//!
//! These traits define the storage interface, allowing for different
//! implementations (SQLite, mock, future hosted backend). The projector
//! itself depends only on snapshots handed to it, never on these traits.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AuthSession, CountdownTimer, CtaButton, Schedule, ScriptedMessage, User, Webhook, Webinar,
};

/// User repository operations
pub trait UserRepository {
    /// Create a new user
    fn create_user(&self, user: &User) -> Result<()>;

    /// Find user by ID
    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Find user by username
    fn find_user_by_username(&self, username: &str) -> Result<Option<User>>;

    /// Update user's last login time
    fn update_last_login(&self, user_id: Uuid) -> Result<()>;

    /// Create a session
    fn create_session(&self, session: &AuthSession) -> Result<()>;

    /// Find a valid (non-expired) session
    fn find_valid_session(&self, session_id: Uuid) -> Result<Option<AuthSession>>;

    /// Delete a session
    fn delete_session(&self, session_id: Uuid) -> Result<()>;

    /// Clean up expired sessions
    fn cleanup_expired_sessions(&self) -> Result<u64>;
}

/// Webinar repository operations
pub trait WebinarRepository {
    /// Create a new webinar
    fn create_webinar(&self, webinar: &Webinar) -> Result<()>;

    /// Find webinar by ID
    fn find_webinar_by_id(&self, id: Uuid) -> Result<Option<Webinar>>;

    /// Find webinar by slug (the viewer-facing lookup)
    fn find_webinar_by_slug(&self, slug: &str) -> Result<Option<Webinar>>;

    /// List webinars owned by a user
    fn list_webinars_for_owner(&self, owner_id: Uuid) -> Result<Vec<Webinar>>;

    /// Update webinar metadata (everything except the schedule)
    fn update_webinar(&self, webinar: &Webinar) -> Result<()>;

    /// Replace the schedule. Rejected once the stored window is Live or
    /// Ended: a running session must not silently re-derive its window.
    fn reschedule_webinar(
        &self,
        webinar_id: Uuid,
        schedule: Schedule,
        now: DateTime<Utc>,
    ) -> Result<()>;

    /// Delete a webinar and its script
    fn delete_webinar(&self, webinar_id: Uuid) -> Result<()>;
}

/// Scripted event repository operations
pub trait EventRepository {
    /// Add a scripted chat message
    fn add_message(&self, message: &ScriptedMessage) -> Result<()>;

    /// List messages for a webinar, ordered by offset
    fn list_messages(&self, webinar_id: Uuid) -> Result<Vec<ScriptedMessage>>;

    /// Delete a scripted message
    fn delete_message(&self, message_id: Uuid) -> Result<()>;

    /// Add a CTA button
    fn add_cta(&self, button: &CtaButton) -> Result<()>;

    /// List CTA buttons for a webinar
    fn list_ctas(&self, webinar_id: Uuid) -> Result<Vec<CtaButton>>;

    /// Delete a CTA button
    fn delete_cta(&self, button_id: Uuid) -> Result<()>;

    /// Add a countdown timer
    fn add_timer(&self, timer: &CountdownTimer) -> Result<()>;

    /// List countdown timers for a webinar
    fn list_timers(&self, webinar_id: Uuid) -> Result<Vec<CountdownTimer>>;

    /// Delete a countdown timer
    fn delete_timer(&self, timer_id: Uuid) -> Result<()>;
}

/// Webhook repository operations
pub trait WebhookRepository {
    /// Register a webhook
    fn add_webhook(&self, webhook: &Webhook) -> Result<()>;

    /// List webhooks for a webinar
    fn list_webhooks(&self, webinar_id: Uuid) -> Result<Vec<Webhook>>;

    /// Enable or disable a webhook
    fn set_webhook_enabled(&self, webhook_id: Uuid, enabled: bool) -> Result<()>;

    /// Delete a webhook
    fn delete_webhook(&self, webhook_id: Uuid) -> Result<()>;
}

/// Combined storage interface
///
/// Provides access to all repository operations.
/// Implementations may be backed by SQLite or mocks.
pub trait Storage: UserRepository + WebinarRepository + EventRepository + WebhookRepository {}

// Blanket implementation: any type implementing all traits implements Storage
impl<T> Storage for T where
    T: UserRepository + WebinarRepository + EventRepository + WebhookRepository
{
}
