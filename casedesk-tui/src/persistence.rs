//! Persistence for lightweight UI state and the signed-in session.

use crate::nav::View;
use casedesk_core::{RecordKind, Session, SessionProvider};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub active_view: View,
    /// Last search query per list.
    #[serde(default)]
    pub queries: HashMap<RecordKind, String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Session store is unavailable")]
    Poisoned,
}

pub fn load(path: &Path) -> Result<Option<PersistedState>, PersistenceError> {
    read_json(path)
}

pub fn save(path: &Path, state: &PersistedState) -> Result<(), PersistenceError> {
    write_json(path, state)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    if !path.exists() {
        return Ok(None);
    }
    let contents = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&contents)?))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), PersistenceError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let contents = serde_json::to_string_pretty(value)?;
    std::fs::write(path, contents)?;
    Ok(())
}

/// JSON-file backed session store.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    session: RwLock<Option<Session>>,
}

impl FileSessionStore {
    /// Open the store at `path`; a missing file means signed out.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let path = path.into();
        let session = read_json::<Session>(&path)?;
        Ok(Self {
            path,
            session: RwLock::new(session),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the session and write it through to disk.
    pub fn sign_in(&self, session: Session) -> Result<(), PersistenceError> {
        write_json(&self.path, &session)?;
        let mut guard = self.session.write().map_err(|_| PersistenceError::Poisoned)?;
        *guard = Some(session);
        tracing::info!(path = %self.path.display(), "session stored");
        Ok(())
    }

    pub fn sign_out(&self) -> Result<(), PersistenceError> {
        if self.path.exists() {
            std::fs::remove_file(&self.path)?;
        }
        let mut guard = self.session.write().map_err(|_| PersistenceError::Poisoned)?;
        *guard = None;
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.current_session().is_none()
    }
}

impl SessionProvider for FileSessionStore {
    fn current_session(&self) -> Option<Session> {
        self.session
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .filter(Session::is_valid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_state_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("absent.json")).unwrap().is_none());
    }

    #[test]
    fn test_session_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/session.json");
        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.is_empty());

        store.sign_in(Session::new("42", "tok")).unwrap();
        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.current_session().unwrap().user_id, "42");

        reopened.sign_out().unwrap();
        assert!(!path.exists());
        assert!(reopened.is_empty());
    }

    #[test]
    fn test_blank_stored_session_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, r#"{"user_id": "", "token": "t"}"#).unwrap();
        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.current_session().is_none());
    }
}
