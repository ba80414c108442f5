//! Webhook storage operations

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{events_from_string, events_to_string, parse_uuid};
use crate::error::Result;
use crate::models::Webhook;

pub struct WebhookStore<'a> {
    conn: &'a Connection,
}

impl<'a> WebhookStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Register a webhook
    #[instrument(skip(self, webhook), fields(webinar_id = %webhook.webinar_id))]
    pub fn create(&self, webhook: &Webhook) -> Result<()> {
        self.conn.execute(
            "INSERT INTO webhooks (id, webinar_id, url, secret, enabled, events)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                webhook.id.to_string(),
                webhook.webinar_id.to_string(),
                webhook.url,
                webhook.secret,
                webhook.enabled as i32,
                events_to_string(&webhook.events),
            ],
        )?;
        Ok(())
    }

    /// List webhooks for a webinar
    #[instrument(skip(self))]
    pub fn list_for_webinar(&self, webinar_id: Uuid) -> Result<Vec<Webhook>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, webinar_id, url, secret, enabled, events
             FROM webhooks WHERE webinar_id = ?1",
        )?;

        let webhooks = stmt
            .query_map(params![webinar_id.to_string()], |row| {
                Ok(Webhook {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    webinar_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    url: row.get(2)?,
                    secret: row.get(3)?,
                    enabled: row.get::<_, i32>(4)? != 0,
                    events: events_from_string(&row.get::<_, String>(5)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(webhooks)
    }

    /// Enable or disable a webhook
    pub fn set_enabled(&self, webhook_id: Uuid, enabled: bool) -> Result<()> {
        self.conn.execute(
            "UPDATE webhooks SET enabled = ?1 WHERE id = ?2",
            params![enabled as i32, webhook_id.to_string()],
        )?;
        Ok(())
    }

    /// Delete a webhook
    pub fn delete(&self, webhook_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM webhooks WHERE id = ?1",
            params![webhook_id.to_string()],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::super::Database;
    use super::*;
    use crate::models::{Schedule, User, UserRole, Webhook, WebhookEvent, Webinar};
    use chrono::{Duration, Utc};

    fn setup_webinar() -> (Database, Uuid) {
        let db = Database::open_in_memory().unwrap();
        let user = User::new("prod".into(), "hash".into(), UserRole::Producer);
        db.users().create(&user).unwrap();

        let start = Utc::now() + Duration::hours(1);
        let schedule = Schedule::new(start, start + Duration::hours(1)).unwrap();
        let webinar = Webinar::new("launch".into(), "Launch".into(), user.id, schedule);
        db.webinars().create(&webinar).unwrap();
        (db, webinar.id)
    }

    #[test]
    fn test_round_trip() {
        let (db, webinar_id) = setup_webinar();
        let webhook = Webhook::new(
            webinar_id,
            "https://hooks.example.com/stagecast".into(),
            vec![WebhookEvent::Started, WebhookEvent::Ended],
        );
        db.webhooks().create(&webhook).unwrap();

        let found = db.webhooks().list_for_webinar(webinar_id).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].secret, webhook.secret);
        assert_eq!(
            found[0].events,
            vec![WebhookEvent::Started, WebhookEvent::Ended]
        );
        assert!(found[0].enabled);
    }

    #[test]
    fn test_disable() {
        let (db, webinar_id) = setup_webinar();
        let webhook = Webhook::new(
            webinar_id,
            "https://hooks.example.com/stagecast".into(),
            vec![WebhookEvent::Started],
        );
        db.webhooks().create(&webhook).unwrap();

        db.webhooks().set_enabled(webhook.id, false).unwrap();
        let found = db.webhooks().list_for_webinar(webinar_id).unwrap();
        assert!(!found[0].enabled);
        assert!(!found[0].subscribes_to(WebhookEvent::Started));
    }
}
