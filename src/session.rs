//! # Session Context
//!
//! The credentials the API client attaches to requests. The client never looks
//! them up from ambient state: a [`SessionContext`] is injected when the
//! system is built and read each time a request is constructed, so a sign-in
//! or sign-out takes effect on the very next call.

use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, warn};

/// Read access to the persisted auth token and display name.
pub trait SessionContext: Send + Sync {
    /// Bearer token, if signed in. Empty tokens read as absent.
    fn token(&self) -> Option<String>;

    fn display_name(&self) -> Option<String>;
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Persisted client state, stored under the same keys the web client uses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

impl SessionState {
    fn token(&self) -> Option<String> {
        self.user_token.clone().filter(|t| !t.is_empty())
    }
}

/// In-memory session, for tests and embedding.
#[derive(Debug, Default)]
pub struct MemorySession {
    state: RwLock<SessionState>,
}

impl MemorySession {
    /// A signed-out session.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(token: impl Into<String>, name: impl Into<String>) -> Self {
        let session = Self::new();
        session.sign_in(token, name);
        session
    }

    pub fn sign_in(&self, token: impl Into<String>, name: impl Into<String>) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.user_token = Some(token.into());
        state.user_name = Some(name.into());
    }

    pub fn sign_out(&self) {
        let mut state = self.state.write().unwrap_or_else(|e| e.into_inner());
        state.user_token = None;
    }
}

impl SessionContext for MemorySession {
    fn token(&self) -> Option<String> {
        self.state.read().unwrap_or_else(|e| e.into_inner()).token()
    }

    fn display_name(&self) -> Option<String> {
        self.state
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .user_name
            .clone()
    }
}

/// Session persisted as a small JSON file (`{"userToken": ..., "userName": ...}`).
///
/// The file is re-read on every access; a missing file is a signed-out session.
/// On unix the file is kept readable by its owner only.
#[derive(Debug, Clone)]
pub struct FileSession {
    path: PathBuf,
}

impl FileSession {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<SessionState, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) if text.trim().is_empty() => Ok(SessionState::default()),
            Ok(text) => Ok(serde_json::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SessionState::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, state: &SessionState) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(state)?;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            options.mode(0o600);
            // `mode` only applies when the file is created.
            if self.path.exists() {
                std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
            }
        }
        let mut file = options.open(&self.path)?;
        file.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn sign_in(&self, token: &str, name: &str) -> Result<(), SessionError> {
        let state = SessionState {
            user_token: Some(token.to_string()),
            user_name: Some(name.to_string()),
        };
        self.store(&state)?;
        debug!(path = %self.path.display(), "Session stored");
        Ok(())
    }

    /// Drops the token and keeps the display name, like the navigation bar's logout.
    pub fn sign_out(&self) -> Result<(), SessionError> {
        let mut state = self.load()?;
        state.user_token = None;
        self.store(&state)
    }

    fn read(&self) -> SessionState {
        self.load().unwrap_or_else(|e| {
            warn!(path = %self.path.display(), error = %e, "Unreadable session, treating as signed out");
            SessionState::default()
        })
    }
}

impl SessionContext for FileSession {
    fn token(&self) -> Option<String> {
        self.read().token()
    }

    fn display_name(&self) -> Option<String> {
        self.read().user_name
    }
}
