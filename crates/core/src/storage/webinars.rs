//! Webinar storage operations

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::instrument;
use uuid::Uuid;

use super::parse::{parse_datetime, parse_uuid, OptionalExt};
use crate::error::{Error, Result};
use crate::models::{Schedule, Webinar};
use crate::projector::{classify, WindowState};

pub struct WebinarStore<'a> {
    conn: &'a Connection,
}

impl<'a> WebinarStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create a new webinar
    #[instrument(skip(self, webinar), fields(slug = %webinar.slug))]
    pub fn create(&self, webinar: &Webinar) -> Result<()> {
        webinar.schedule.validate()?;
        self.conn.execute(
            "INSERT INTO webinars (id, slug, title, description, owner_id, created_at, start_time, end_time, video_url, is_active)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                webinar.id.to_string(),
                webinar.slug,
                webinar.title,
                webinar.description,
                webinar.owner_id.to_string(),
                webinar.created_at.to_rfc3339(),
                webinar.schedule.start_time.to_rfc3339(),
                webinar.schedule.end_time.to_rfc3339(),
                webinar.video_url,
                webinar.is_active as i32,
            ],
        )?;
        Ok(())
    }

    /// Find webinar by ID
    #[instrument(skip(self))]
    pub fn find_by_id(&self, id: Uuid) -> Result<Option<Webinar>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, title, description, owner_id, created_at, start_time, end_time, video_url, is_active
             FROM webinars WHERE id = ?1",
        )?;

        let webinar = stmt
            .query_row(params![id.to_string()], Self::map_webinar)
            .optional()?;

        Ok(webinar)
    }

    /// Find webinar by slug
    #[instrument(skip(self))]
    pub fn find_by_slug(&self, slug: &str) -> Result<Option<Webinar>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, title, description, owner_id, created_at, start_time, end_time, video_url, is_active
             FROM webinars WHERE slug = ?1",
        )?;

        let webinar = stmt
            .query_row(params![slug], Self::map_webinar)
            .optional()?;

        Ok(webinar)
    }

    /// List webinars owned by a user, newest first
    #[instrument(skip(self))]
    pub fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Webinar>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, slug, title, description, owner_id, created_at, start_time, end_time, video_url, is_active
             FROM webinars WHERE owner_id = ?1
             ORDER BY created_at DESC",
        )?;

        let webinars = stmt
            .query_map(params![owner_id.to_string()], Self::map_webinar)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(webinars)
    }

    fn map_webinar(row: &rusqlite::Row<'_>) -> rusqlite::Result<Webinar> {
        Ok(Webinar {
            id: parse_uuid(&row.get::<_, String>(0)?)?,
            slug: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            owner_id: parse_uuid(&row.get::<_, String>(4)?)?,
            created_at: parse_datetime(&row.get::<_, String>(5)?)?,
            schedule: Schedule {
                start_time: parse_datetime(&row.get::<_, String>(6)?)?,
                end_time: parse_datetime(&row.get::<_, String>(7)?)?,
            },
            video_url: row.get(8)?,
            is_active: row.get::<_, i32>(9)? != 0,
        })
    }

    /// Update webinar metadata. The schedule is deliberately excluded;
    /// use [`WebinarStore::reschedule`].
    #[instrument(skip(self, webinar), fields(webinar_id = %webinar.id))]
    pub fn update(&self, webinar: &Webinar) -> Result<()> {
        self.conn.execute(
            "UPDATE webinars SET slug = ?1, title = ?2, description = ?3, video_url = ?4, is_active = ?5
             WHERE id = ?6",
            params![
                webinar.slug,
                webinar.title,
                webinar.description,
                webinar.video_url,
                webinar.is_active as i32,
                webinar.id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Replace the schedule of an upcoming webinar.
    ///
    /// Once the stored window is Live or Ended the schedule is locked: a
    /// running session projects everything from the start time, and editing
    /// it mid-session would silently rewrite what viewers see.
    #[instrument(skip(self, schedule))]
    pub fn reschedule(&self, webinar_id: Uuid, schedule: Schedule, now: DateTime<Utc>) -> Result<()> {
        schedule.validate()?;

        let current = self
            .find_by_id(webinar_id)?
            .ok_or_else(|| Error::NotFound(format!("Webinar {}", webinar_id)))?;

        match classify(now, &current.schedule) {
            WindowState::Upcoming => {}
            state => {
                return Err(Error::InvalidOperation(format!(
                    "Cannot reschedule webinar {}: window is {:?}",
                    webinar_id, state
                )));
            }
        }

        self.conn.execute(
            "UPDATE webinars SET start_time = ?1, end_time = ?2 WHERE id = ?3",
            params![
                schedule.start_time.to_rfc3339(),
                schedule.end_time.to_rfc3339(),
                webinar_id.to_string(),
            ],
        )?;
        Ok(())
    }

    /// Delete a webinar; the script cascades
    #[instrument(skip(self))]
    pub fn delete(&self, webinar_id: Uuid) -> Result<()> {
        self.conn.execute(
            "DELETE FROM webinars WHERE id = ?1",
            params![webinar_id.to_string()],
        )?;
        Ok(())
    }
}
