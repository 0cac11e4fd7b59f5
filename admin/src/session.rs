//! Login session.
//!
//! The bearer token is an explicit [`Session`] value handed to the calls that
//! need it, never ambient state. [`SessionStore`] keeps it on disk between
//! CLI invocations: written on login, removed on logout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::HttpContentApi;
use crate::error::{SessionError, SessionResult};

/// An authenticated admin session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Bearer token issued by `/auth/login`.
    pub token: String,
    /// Who logged in.
    pub username: String,
    /// When the token was obtained.
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new(token: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            logged_in_at: Utc::now(),
        }
    }
}

/// File-backed session storage.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, if any. A corrupt file is an error, a missing one is not.
    pub fn load(&self) -> SessionResult<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// The stored session, or [`SessionError::NotLoggedIn`].
    pub fn require(&self) -> SessionResult<Session> {
        self.load()?.ok_or(SessionError::NotLoggedIn)
    }

    pub fn save(&self, session: &Session) -> SessionResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(session)?)?;
        log::debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    /// Forget the session. Returns whether there was one.
    pub fn clear(&self) -> SessionResult<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        Ok(true)
    }
}

/// Log in and persist the new session.
pub async fn login(
    api: &HttpContentApi,
    store: &SessionStore,
    username: &str,
    password: &str,
) -> SessionResult<Session> {
    let response = api.login(username, password).await?;
    let session = Session::new(response.token, username);
    store.save(&session)?;
    log::info!("Logged in as {}", username);
    Ok(session)
}

/// Change the password of the logged-in user.
///
/// `new_password` and `confirm` must match; that is checked before any request.
pub async fn change_password(
    api: &HttpContentApi,
    session: &Session,
    current_password: &str,
    new_password: &str,
    confirm: &str,
) -> SessionResult<()> {
    check_new_password(new_password, confirm)?;
    api.change_password(Some(session), current_password, new_password)
        .await?;
    log::info!("Password changed for {}", session.username);
    Ok(())
}

fn check_new_password(new_password: &str, confirm: &str) -> SessionResult<()> {
    if new_password != confirm {
        return Err(SessionError::PasswordMismatch);
    }
    Ok(())
}
