//! Application state management

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;
use stagecast_core::{Database, Error, Result};
use uuid::Uuid;

use crate::config::AppConfig;

/// Main application state
pub struct AppState {
    pub db: Arc<Mutex<Database>>,
    pub current_user_id: Arc<Mutex<Option<Uuid>>>,
    pub current_session_id: Arc<Mutex<Option<Uuid>>>,
}

impl AppState {
    pub fn new(config: &AppConfig) -> Result<Self> {
        let db_path = match &config.database_path {
            Some(path) => path.clone(),
            None => Self::data_path()?.join("stagecast.db"),
        };

        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&db_path)?;

        Ok(Self {
            db: Arc::new(Mutex::new(db)),
            current_user_id: Arc::new(Mutex::new(None)),
            current_session_id: Arc::new(Mutex::new(None)),
        })
    }

    fn data_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "stagecast", "stagecast").ok_or_else(|| {
            Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine data directory",
            ))
        })?;

        Ok(dirs.data_dir().to_path_buf())
    }

    pub fn set_current_user(&self, user_id: Option<Uuid>) {
        *self.current_user_id.lock().unwrap() = user_id;
    }

    pub fn set_current_session(&self, session_id: Option<Uuid>) {
        *self.current_session_id.lock().unwrap() = session_id;
    }

    pub fn current_user_id(&self) -> Option<Uuid> {
        *self.current_user_id.lock().unwrap()
    }

    pub fn current_session_id(&self) -> Option<Uuid> {
        *self.current_session_id.lock().unwrap()
    }

    /// Get current username for the logged-in user
    pub fn current_username(&self) -> Option<String> {
        let user_id = self.current_user_id()?;
        let db = self.db.lock().unwrap();
        db.users()
            .find_by_id(user_id)
            .ok()
            .flatten()
            .map(|u| u.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stagecast_core::{auth, UserRole};

    fn state_with_temp_db() -> (tempfile::TempDir, AppState) {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            database_path: Some(dir.path().join("test.db")),
            ..AppConfig::default()
        };
        let state = AppState::new(&config).unwrap();
        (dir, state)
    }

    #[test]
    fn test_opens_db_at_configured_path() {
        let (dir, _state) = state_with_temp_db();
        assert!(dir.path().join("test.db").exists());
    }

    #[test]
    fn test_current_username_follows_login() {
        let (_dir, state) = state_with_temp_db();
        assert!(state.current_username().is_none());

        let user = {
            let db = state.db.lock().unwrap();
            auth::register(&db, "host", "secret", UserRole::Producer).unwrap()
        };
        state.set_current_user(Some(user.id));
        assert_eq!(state.current_username().as_deref(), Some("host"));

        state.set_current_user(None);
        assert!(state.current_username().is_none());
    }
}
