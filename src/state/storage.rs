//! Durable storage for the session record.
//!
//! SYSTEM CONTEXT
//! ==============
//! The store keeps one JSON record under the well-known `auth-storage` key, in
//! the same `{"state": ..., "version": 0}` envelope the browser front end kept
//! in `localStorage`, so a record copied out of a browser rehydrates here.
//!
//! TRADE-OFFS
//! ==========
//! Storage is best-effort. Callers log and swallow failures; a session that is
//! not remembered across restarts is preferable to a crash.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

use super::role::Role;

pub const PERSIST_VERSION: u32 = 0;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("session storage io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("session record is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Identity as persisted alongside the token.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedUser {
    pub id: String,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// The persisted session fields.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub user: Option<PersistedUser>,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Versioned envelope written to storage.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSession {
    pub state: PersistedState,
    #[serde(default)]
    pub version: u32,
}

impl PersistedSession {
    #[must_use]
    pub fn new(state: PersistedState) -> Self {
        Self { state, version: PERSIST_VERSION }
    }
}

/// Backing store for the session record.
pub trait SessionStorage: Send + Sync {
    /// Load the stored record, or `None` when nothing has been saved yet.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the record exists but cannot be read.
    fn load(&self) -> Result<Option<PersistedSession>, StorageError>;

    /// Replace the stored record.
    ///
    /// # Errors
    ///
    /// Returns a [`StorageError`] when the record cannot be written.
    fn save(&self, session: &PersistedSession) -> Result<(), StorageError>;
}

/// Process-lifetime storage. Used by tests and by callers that opt out of
/// remembering sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    record: Mutex<Option<PersistedSession>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_record(record: PersistedSession) -> Self {
        Self { record: Mutex::new(Some(record)) }
    }

    /// Current stored record, for assertions.
    #[must_use]
    pub fn record(&self) -> Option<PersistedSession> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl SessionStorage for MemoryStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        Ok(self.record())
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        *self.record.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }
}

/// JSON file storage, one record per file.
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileStorage {
    fn load(&self) -> Result<Option<PersistedSession>, StorageError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&self, session: &PersistedSession) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(session)?;
        // Readers see the old record or the new one, never a partial write.
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, raw)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
