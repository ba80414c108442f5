//! Authentication: password hashing and session management

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use tracing::info;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::{AuthSession, User, UserRole};
use crate::storage::Database;

/// Session lifetime for logged-in users
const SESSION_HOURS: i64 = 24;

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| Error::Authentication(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Register a new user account
pub fn register(db: &Database, username: &str, password: &str, role: UserRole) -> Result<User> {
    if username.trim().is_empty() {
        return Err(Error::InvalidOperation("Username must not be empty".into()));
    }
    if db.users().find_by_username(username)?.is_some() {
        return Err(Error::InvalidOperation(format!(
            "Username '{}' is already taken",
            username
        )));
    }

    let user = User::new(username.to_string(), hash_password(password)?, role);
    db.users().create(&user)?;
    info!(username = %user.username, "Registered user");
    Ok(user)
}

/// Log in and open a session
pub fn login(db: &Database, username: &str, password: &str) -> Result<(User, AuthSession)> {
    let user = db
        .users()
        .find_by_username(username)?
        .ok_or_else(|| Error::Authentication("Unknown username or password".into()))?;

    if !verify_password(password, &user.password_hash) {
        return Err(Error::Authentication("Unknown username or password".into()));
    }

    let session = AuthSession::new(user.id, SESSION_HOURS);
    db.users().create_session(&session)?;
    db.users().update_last_login(user.id)?;
    info!(username = %user.username, "User logged in");

    Ok((user, session))
}

/// Close a session
pub fn logout(db: &Database, session_id: Uuid) -> Result<()> {
    db.users().delete_session(session_id)
}
