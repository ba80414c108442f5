//! Scripted message storage operations
//!
//! Messages are read back in offset order so display order matches the
//! scheduled order; the visibility filter never re-sorts.

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::parse_uuid;
use crate::error::Result;
use crate::models::ScriptedMessage;

pub struct MessageStore<'a> {
    conn: &'a Connection,
}

impl<'a> MessageStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Add a scripted message
    #[instrument(skip(self, message), fields(webinar_id = %message.webinar_id))]
    pub fn create(&self, message: &ScriptedMessage) -> Result<()> {
        self.conn.execute(
            "INSERT INTO scripted_messages (id, webinar_id, username, body, offset_seconds)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                message.id.to_string(),
                message.webinar_id.to_string(),
                message.username,
                message.body,
                message.offset_seconds,
            ],
        )?;
        Ok(())
    }

    /// List messages for a webinar, ordered by offset ascending
    #[instrument(skip(self))]
    pub fn list_for_webinar(&self, webinar_id: Uuid) -> Result<Vec<ScriptedMessage>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, webinar_id, username, body, offset_seconds
             FROM scripted_messages WHERE webinar_id = ?1
             ORDER BY offset_seconds ASC",
        )?;

        let messages = stmt
            .query_map(params![webinar_id.to_string()], |row| {
                Ok(ScriptedMessage {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    webinar_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    username: row.get(2)?,
                    body: row.get(3)?,
                    offset_seconds: row.get(4)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(messages)
    }

    /// Update a message's text and offset
    pub fn update(&self, message: &ScriptedMessage) -> Result<()> {
        self.conn.execute(
            "UPDATE scripted_messages SET username = ?1, body = ?2, offset_seconds = ?3 WHERE id = ?4",
            params![
                message.username,
                message.body,
                message.offset_seconds,
                message.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a message
    pub fn delete(&self, message_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM scripted_messages WHERE id = ?1",
            params![message_id.to_string()],
        )?;
        Ok(())
    }
}
