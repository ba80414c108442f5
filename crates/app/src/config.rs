//! Application configuration
//!
//! Loaded from a TOML file when one exists; every field has a default so a
//! bare install runs without any config on disk.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use stagecast_core::Result;
use tracing::info;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Polling interval for the shared tick source
    pub tick_interval_secs: u64,
    /// Delay between muted autoplay and unmute
    pub unmute_delay_secs: i64,
    /// Backoff between autoplay attempts after a rejection
    pub autoplay_retry_secs: i64,
    /// Override the database location (defaults to the platform data dir)
    pub database_path: Option<PathBuf>,
    /// Play this webinar instead of the seeded demo
    pub webinar_slug: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            tick_interval_secs: 1,
            unmute_delay_secs: 1,
            autoplay_retry_secs: 2,
            database_path: None,
            webinar_slug: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from `path`, falling back to defaults when the
    /// file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&raw).map_err(|e| {
            stagecast_core::Error::InvalidOperation(format!(
                "Failed to parse config {}: {}",
                path.display(),
                e
            ))
        })?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }
}
