//! Local session persistence.
//!
//! A session is two strings kept in a tiny key-value store: the id the lobby
//! service handed out on join and the username it was issued for. They are
//! written once after a successful join and never removed by the client.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parking_lot::Mutex;
use tracing::debug;

use crate::error::{LobbyError, Result};

pub const SESSION_ID_KEY: &str = "lobby_session_id";
pub const USERNAME_KEY: &str = "lobby_username";

const STORAGE_FILE: &str = "storage.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub session_id: String,
    pub username: String,
}

impl Session {
    pub fn new(session_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            username: username.into(),
        }
    }

    /// Reads both keys. Missing or empty values mean there is no session.
    pub fn load<S: SessionStore + ?Sized>(store: &S) -> Option<Session> {
        let session_id = store.get(SESSION_ID_KEY).filter(|v| !v.is_empty())?;
        let username = store.get(USERNAME_KEY).filter(|v| !v.is_empty())?;
        Some(Session {
            session_id,
            username,
        })
    }

    /// Writes both keys in one go, so they never belong to different joins.
    pub fn persist<S: SessionStore + ?Sized>(&self, store: &S) -> Result<()> {
        store.set_all(&[
            (SESSION_ID_KEY, self.session_id.as_str()),
            (USERNAME_KEY, self.username.as_str()),
        ])
    }
}

/// Durable string key-value storage.
pub trait SessionStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Option<String>;

    /// Stores every entry or none of them.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()>;

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.set_all(&[(key, value)])
    }
}

// Process-local store, nothing survives a restart
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut values = self.values.lock();
        for (key, value) in entries {
            values.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

/// Flat JSON object on disk, rewritten on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    values: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Opens `storage.json` under `dir`. The directory is created on first write.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::open(dir.as_ref().join(STORAGE_FILE))
    }

    /// Opens the store in the OS data directory for this application.
    pub fn open_default() -> Result<Self> {
        Self::in_dir(default_data_dir()?)
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };

        debug!("💾 Opened session store at {}", path.display());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<()> {
        let mut values = self.values.lock();
        let mut updated = values.clone();
        for (key, value) in entries {
            updated.insert(key.to_string(), value.to_string());
        }

        // memory only changes once the file holds the new values
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&updated)?)?;
        *values = updated;
        Ok(())
    }
}

pub fn default_data_dir() -> Result<PathBuf> {
    ProjectDirs::from("quest", "cyberlobby", "cyber-lobby")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or(LobbyError::NoDataDirectory)
}
