//! SQLite storage layer for Stagecast

mod events;
mod messages;
mod migrations;
mod parse;
mod traits;
mod users;
mod webhooks;
mod webinars;

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tracing::instrument;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{
    AuthSession, CountdownTimer, CtaButton, Schedule, ScriptedMessage, User, Webhook, Webinar,
};

pub use events::EventStore;
pub use messages::MessageStore;
pub use traits::{EventRepository, Storage, UserRepository, WebhookRepository, WebinarRepository};
pub use users::UserStore;
pub use webhooks::WebhookStore;
pub use webinars::WebinarStore;

/// Main database handle
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open or create database at the given path
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Open in-memory database (for testing)
    #[instrument]
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON")?;
        let db = Self { conn };
        db.init()?;
        Ok(db)
    }

    /// Initialize database schema via migrations
    fn init(&self) -> Result<()> {
        migrations::run_migrations(&self.conn)?;
        Ok(())
    }

    /// Get current schema version
    pub fn schema_version(&self) -> u32 {
        self.conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap_or(0)
    }

    pub fn users(&self) -> UserStore<'_> {
        UserStore::new(&self.conn)
    }

    pub fn webinars(&self) -> WebinarStore<'_> {
        WebinarStore::new(&self.conn)
    }

    pub fn messages(&self) -> MessageStore<'_> {
        MessageStore::new(&self.conn)
    }

    pub fn events(&self) -> EventStore<'_> {
        EventStore::new(&self.conn)
    }

    pub fn webhooks(&self) -> WebhookStore<'_> {
        WebhookStore::new(&self.conn)
    }
}

// Implement repository traits for Database
// This enables using Database through the trait interface

impl UserRepository for Database {
    fn create_user(&self, user: &User) -> Result<()> {
        self.users().create(user)
    }

    fn find_user_by_id(&self, id: Uuid) -> Result<Option<User>> {
        self.users().find_by_id(id)
    }

    fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.users().find_by_username(username)
    }

    fn update_last_login(&self, user_id: Uuid) -> Result<()> {
        self.users().update_last_login(user_id)
    }

    fn create_session(&self, session: &AuthSession) -> Result<()> {
        self.users().create_session(session)
    }

    fn find_valid_session(&self, session_id: Uuid) -> Result<Option<AuthSession>> {
        self.users().find_valid_session(session_id)
    }

    fn delete_session(&self, session_id: Uuid) -> Result<()> {
        self.users().delete_session(session_id)
    }

    fn cleanup_expired_sessions(&self) -> Result<u64> {
        self.users().cleanup_expired_sessions()
    }
}

impl WebinarRepository for Database {
    fn create_webinar(&self, webinar: &Webinar) -> Result<()> {
        self.webinars().create(webinar)
    }

    fn find_webinar_by_id(&self, id: Uuid) -> Result<Option<Webinar>> {
        self.webinars().find_by_id(id)
    }

    fn find_webinar_by_slug(&self, slug: &str) -> Result<Option<Webinar>> {
        self.webinars().find_by_slug(slug)
    }

    fn list_webinars_for_owner(&self, owner_id: Uuid) -> Result<Vec<Webinar>> {
        self.webinars().list_for_owner(owner_id)
    }

    fn update_webinar(&self, webinar: &Webinar) -> Result<()> {
        self.webinars().update(webinar)
    }

    fn reschedule_webinar(
        &self,
        webinar_id: Uuid,
        schedule: Schedule,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.webinars().reschedule(webinar_id, schedule, now)
    }

    fn delete_webinar(&self, webinar_id: Uuid) -> Result<()> {
        self.webinars().delete(webinar_id)
    }
}

impl EventRepository for Database {
    fn add_message(&self, message: &ScriptedMessage) -> Result<()> {
        self.messages().create(message)
    }

    fn list_messages(&self, webinar_id: Uuid) -> Result<Vec<ScriptedMessage>> {
        self.messages().list_for_webinar(webinar_id)
    }

    fn delete_message(&self, message_id: Uuid) -> Result<()> {
        self.messages().delete(message_id)
    }

    fn add_cta(&self, button: &CtaButton) -> Result<()> {
        self.events().create_cta(button)
    }

    fn list_ctas(&self, webinar_id: Uuid) -> Result<Vec<CtaButton>> {
        self.events().list_ctas(webinar_id)
    }

    fn delete_cta(&self, button_id: Uuid) -> Result<()> {
        self.events().delete_cta(button_id)
    }

    fn add_timer(&self, timer: &CountdownTimer) -> Result<()> {
        self.events().create_timer(timer)
    }

    fn list_timers(&self, webinar_id: Uuid) -> Result<Vec<CountdownTimer>> {
        self.events().list_timers(webinar_id)
    }

    fn delete_timer(&self, timer_id: Uuid) -> Result<()> {
        self.events().delete_timer(timer_id)
    }
}

impl WebhookRepository for Database {
    fn add_webhook(&self, webhook: &Webhook) -> Result<()> {
        self.webhooks().create(webhook)
    }

    fn list_webhooks(&self, webinar_id: Uuid) -> Result<Vec<Webhook>> {
        self.webhooks().list_for_webinar(webinar_id)
    }

    fn set_webhook_enabled(&self, webhook_id: Uuid, enabled: bool) -> Result<()> {
        self.webhooks().set_enabled(webhook_id, enabled)
    }

    fn delete_webhook(&self, webhook_id: Uuid) -> Result<()> {
        self.webhooks().delete(webhook_id)
    }
}
