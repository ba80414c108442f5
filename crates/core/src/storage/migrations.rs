//! Database migration system
//!
//! Tracks schema versions and applies migrations in order.

use rusqlite::Connection;
use tracing::{info, instrument};

use crate::error::Result;

/// A database migration
pub struct Migration {
    /// Version number (must be sequential starting from 1)
    pub version: u32,
    /// Description of what this migration does
    pub description: &'static str,
    /// SQL to run for this migration
    pub sql: &'static str,
}

/// All migrations in order
const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema",
        sql: r#"
            -- Users table
            CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role INTEGER NOT NULL,
                created_at TEXT NOT NULL,
                last_login TEXT
            );

            -- Sessions table
            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                expires_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
            );

            -- Webinars table
            CREATE TABLE IF NOT EXISTS webinars (
                id TEXT PRIMARY KEY,
                slug TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                description TEXT,
                owner_id TEXT NOT NULL,
                created_at TEXT NOT NULL,
                start_time TEXT NOT NULL,
                end_time TEXT NOT NULL,
                video_url TEXT,
                is_active INTEGER NOT NULL DEFAULT 1,
                FOREIGN KEY (owner_id) REFERENCES users(id)
            );

            -- Scripted chat messages (instantaneous events)
            CREATE TABLE IF NOT EXISTS scripted_messages (
                id TEXT PRIMARY KEY,
                webinar_id TEXT NOT NULL,
                username TEXT NOT NULL,
                body TEXT NOT NULL,
                offset_seconds INTEGER NOT NULL,
                FOREIGN KEY (webinar_id) REFERENCES webinars(id) ON DELETE CASCADE
            );

            -- CTA buttons (interval events)
            CREATE TABLE IF NOT EXISTS cta_buttons (
                id TEXT PRIMARY KEY,
                webinar_id TEXT NOT NULL,
                label TEXT NOT NULL,
                url TEXT NOT NULL,
                color TEXT NOT NULL,
                offset_seconds INTEGER NOT NULL,
                duration_seconds INTEGER NOT NULL,
                position TEXT NOT NULL,
                FOREIGN KEY (webinar_id) REFERENCES webinars(id) ON DELETE CASCADE
            );

            -- Countdown timers (interval events)
            CREATE TABLE IF NOT EXISTS countdown_timers (
                id TEXT PRIMARY KEY,
                webinar_id TEXT NOT NULL,
                offset_seconds INTEGER NOT NULL,
                duration_seconds INTEGER NOT NULL,
                position TEXT NOT NULL,
                FOREIGN KEY (webinar_id) REFERENCES webinars(id) ON DELETE CASCADE
            );

            -- Outbound webhooks
            CREATE TABLE IF NOT EXISTS webhooks (
                id TEXT PRIMARY KEY,
                webinar_id TEXT NOT NULL,
                url TEXT NOT NULL,
                secret TEXT NOT NULL,
                enabled INTEGER NOT NULL DEFAULT 1,
                -- Comma-separated list of subscribed event names
                events TEXT NOT NULL DEFAULT '',
                FOREIGN KEY (webinar_id) REFERENCES webinars(id) ON DELETE CASCADE
            );
        "#,
    },
    Migration {
        version: 2,
        description: "Add indexes for query performance",
        sql: r#"
            -- Session indexes
            CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id);
            CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions(expires_at);

            -- Webinar indexes
            CREATE INDEX IF NOT EXISTS idx_webinars_slug ON webinars(slug);
            CREATE INDEX IF NOT EXISTS idx_webinars_owner ON webinars(owner_id);

            -- Script event indexes; messages are read in offset order
            CREATE INDEX IF NOT EXISTS idx_messages_webinar_offset
                ON scripted_messages(webinar_id, offset_seconds);
            CREATE INDEX IF NOT EXISTS idx_cta_webinar ON cta_buttons(webinar_id);
            CREATE INDEX IF NOT EXISTS idx_timers_webinar ON countdown_timers(webinar_id);

            -- Webhook indexes
            CREATE INDEX IF NOT EXISTS idx_webhooks_webinar ON webhooks(webinar_id);
        "#,
    },
];

/// Initialize the migrations table
fn init_migrations_table(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            description TEXT NOT NULL,
            applied_at TEXT NOT NULL
        )",
        [],
    )?;
    Ok(())
}

/// Get the current schema version
fn get_current_version(conn: &Connection) -> Result<u32> {
    let version: Option<u32> = conn
        .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    Ok(version.unwrap_or(0))
}

/// Record that a migration was applied
fn record_migration(conn: &Connection, migration: &Migration) -> Result<()> {
    conn.execute(
        "INSERT INTO schema_migrations (version, description, applied_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![
            migration.version,
            migration.description,
            chrono::Utc::now().to_rfc3339()
        ],
    )?;
    Ok(())
}

/// Run all pending migrations
#[instrument(skip(conn))]
pub fn run_migrations(conn: &Connection) -> Result<()> {
    init_migrations_table(conn)?;

    let current_version = get_current_version(conn)?;
    info!(current_version, "Checking for pending migrations");

    for migration in MIGRATIONS {
        if migration.version > current_version {
            info!(
                version = migration.version,
                description = migration.description,
                "Applying migration"
            );

            conn.execute_batch(migration.sql)?;
            record_migration(conn, migration)?;

            info!(version = migration.version, "Migration complete");
        }
    }

    let new_version = get_current_version(conn)?;
    if new_version > current_version {
        info!(
            from = current_version,
            to = new_version,
            "Database schema updated"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Get the latest migration version (test helper)
    fn latest_version() -> u32 {
        MIGRATIONS.last().map(|m| m.version).unwrap_or(0)
    }

    #[test]
    fn test_migrations_run() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_idempotent() {
        let conn = Connection::open_in_memory().unwrap();

        // Run twice
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        let version = get_current_version(&conn).unwrap();
        assert_eq!(version, latest_version());
    }

    #[test]
    fn test_migrations_sequential() {
        // Verify migrations are numbered sequentially
        for (i, migration) in MIGRATIONS.iter().enumerate() {
            assert_eq!(
                migration.version as usize,
                i + 1,
                "Migration {} should have version {}",
                migration.description,
                i + 1
            );
        }
    }
}
