//! Persistence for the bearer token between invocations.

use std::fs;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{AppError, Result};

/// Storage backend for the session token.
pub trait TokenStore: Send + Sync {
    /// Read the stored token, if any.
    ///
    /// # Errors
    /// Returns error if the backend exists but cannot be read.
    fn load(&self) -> Result<Option<String>>;

    /// Replace the stored token.
    ///
    /// # Errors
    /// Returns error if the token cannot be persisted.
    fn save(&self, token: &str) -> Result<()>;

    /// Forget the stored token. Clearing an empty store succeeds.
    ///
    /// # Errors
    /// Returns error if the backend cannot be modified.
    fn clear(&self) -> Result<()>;
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    token: String,
    saved_at: DateTime<Utc>,
}

/// Token kept in a JSON file inside the data directory.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)
            .map_err(|e| AppError::io(format!("Failed to read {}", self.path.display()), e))?;

        match serde_json::from_str::<StoredSession>(&content) {
            Ok(session) if !session.token.is_empty() => {
                tracing::debug!(saved_at = %session.saved_at, "Loaded stored session");
                Ok(Some(session.token))
            }
            Ok(_) => Ok(None),
            Err(e) => {
                tracing::warn!("Ignoring unreadable session file: {}", e);
                Ok(None)
            }
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| AppError::io("Failed to create data directory", e))?;
        }

        let session = StoredSession {
            token: token.to_string(),
            saved_at: Utc::now(),
        };
        let content = serde_json::to_string_pretty(&session).map_err(AppError::json_parse)?;

        fs::write(&self.path, content)
            .map_err(|e| AppError::io(format!("Failed to write {}", self.path.display()), e))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| AppError::io("Failed to restrict session file permissions", e))?;
        }

        tracing::debug!(path = %self.path.display(), "Session saved");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "Session removed");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::io(
                format!("Failed to remove {}", self.path.display()),
                e,
            )),
        }
    }
}

/// Process-local token storage.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

#[cfg(test)]
impl MemoryTokenStore {
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.token
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

#[cfg(test)]
impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot().clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot() = None;
        Ok(())
    }
}
