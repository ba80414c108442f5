//! Interval event storage (CTA buttons and countdown timers)
//!
//! Zero durations are rejected at creation; the visibility filter does not
//! defend against them.

use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::parse_uuid;
use crate::error::{Error, Result};
use crate::models::{CountdownTimer, CtaButton, IntervalEvent, OverlayPosition};

pub struct EventStore<'a> {
    conn: &'a Connection,
}

impl<'a> EventStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn check_duration<E: IntervalEvent>(event: &E, kind: &str) -> Result<()> {
        if event.duration_seconds() == 0 {
            return Err(Error::InvalidOperation(format!(
                "{} must have a duration of at least 1 second",
                kind
            )));
        }
        Ok(())
    }

    /// Add a CTA button
    #[instrument(skip(self, button), fields(webinar_id = %button.webinar_id))]
    pub fn create_cta(&self, button: &CtaButton) -> Result<()> {
        Self::check_duration(button, "CTA button")?;
        self.conn.execute(
            "INSERT INTO cta_buttons (id, webinar_id, label, url, color, offset_seconds, duration_seconds, position)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                button.id.to_string(),
                button.webinar_id.to_string(),
                button.label,
                button.url,
                button.color,
                button.offset_seconds,
                button.duration_seconds,
                button.position.as_str(),
            ],
        )?;
        Ok(())
    }

    /// List CTA buttons for a webinar
    #[instrument(skip(self))]
    pub fn list_ctas(&self, webinar_id: Uuid) -> Result<Vec<CtaButton>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, webinar_id, label, url, color, offset_seconds, duration_seconds, position
             FROM cta_buttons WHERE webinar_id = ?1
             ORDER BY offset_seconds ASC",
        )?;

        let buttons = stmt
            .query_map(params![webinar_id.to_string()], |row| {
                Ok(CtaButton {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    webinar_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    label: row.get(2)?,
                    url: row.get(3)?,
                    color: row.get(4)?,
                    offset_seconds: row.get(5)?,
                    duration_seconds: row.get(6)?,
                    position: OverlayPosition::from_str_lossy(&row.get::<_, String>(7)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(buttons)
    }

    /// Delete a CTA button
    pub fn delete_cta(&self, button_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM cta_buttons WHERE id = ?1",
            params![button_id.to_string()],
        )?;
        Ok(())
    }

    /// Add a countdown timer
    #[instrument(skip(self, timer), fields(webinar_id = %timer.webinar_id))]
    pub fn create_timer(&self, timer: &CountdownTimer) -> Result<()> {
        Self::check_duration(timer, "Countdown timer")?;
        self.conn.execute(
            "INSERT INTO countdown_timers (id, webinar_id, offset_seconds, duration_seconds, position)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                timer.id.to_string(),
                timer.webinar_id.to_string(),
                timer.offset_seconds,
                timer.duration_seconds,
                timer.position.as_str(),
            ],
        )?;
        Ok(())
    }

    /// List countdown timers for a webinar
    #[instrument(skip(self))]
    pub fn list_timers(&self, webinar_id: Uuid) -> Result<Vec<CountdownTimer>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, webinar_id, offset_seconds, duration_seconds, position
             FROM countdown_timers WHERE webinar_id = ?1
             ORDER BY offset_seconds ASC",
        )?;

        let timers = stmt
            .query_map(params![webinar_id.to_string()], |row| {
                Ok(CountdownTimer {
                    id: parse_uuid(&row.get::<_, String>(0)?)?,
                    webinar_id: parse_uuid(&row.get::<_, String>(1)?)?,
                    offset_seconds: row.get(2)?,
                    duration_seconds: row.get(3)?,
                    position: OverlayPosition::from_str_lossy(&row.get::<_, String>(4)?),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(timers)
    }

    /// Delete a countdown timer
    pub fn delete_timer(&self, timer_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM countdown_timers WHERE id = ?1",
            params![timer_id.to_string()],
        )?;
        Ok(())
    }
}
