//! Persisted auth session.
//!
//! The session is an explicit value handed to whatever needs identity,
//! backed by a small JSON file (the device-local-storage analog):
//! written on login/register, removed on logout, read-only everywhere
//! else. Absence of the file means logged out.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use tracemark_core::error::CoreError;
use tracemark_core::types::UserId;

/// An authenticated user, as cached on device.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Session {
    pub uid: UserId,
    pub email: String,
    /// Provider access token, when the provider issued one. Used only
    /// for best-effort server-side logout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// File-backed store for the current [`Session`].
#[derive(Debug, Clone)]
pub struct SessionCache {
    path: PathBuf,
}

impl SessionCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cached session, or `None` when logged out. A corrupt cache
    /// file reads as logged out rather than erroring.
    pub fn load(&self) -> Option<Session> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Discarding corrupt session cache");
                None
            }
        }
    }

    /// Persist a session (login / register).
    pub fn store(&self, session: &Session) -> Result<(), CoreError> {
        let raw = serde_json::to_string_pretty(session)
            .map_err(|e| CoreError::Internal(format!("Failed to encode session: {e}")))?;
        std::fs::write(&self.path, raw)
            .map_err(|e| CoreError::Internal(format!("Failed to write session cache: {e}")))
    }

    /// Remove the cached session (logout). Clearing an absent cache is
    /// fine.
    pub fn clear(&self) -> Result<(), CoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CoreError::Internal(format!(
                "Failed to clear session cache: {e}"
            ))),
        }
    }
}
