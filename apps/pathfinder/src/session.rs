use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use tracing::debug;

use crate::api_client::types::UserInfo;
use crate::errors::AppError;

pub const TOKEN_KEY: &str = "token";
pub const USER_KEY: &str = "user";

#[derive(Debug)]
enum Backing {
    File(PathBuf),
    Memory,
}

/// Local key-value store for the session token and cached user. String values,
/// persisted as one JSON object when file-backed.
#[derive(Debug)]
pub struct SessionStore {
    backing: Backing,
    entries: Mutex<BTreeMap<String, String>>,
}

impl SessionStore {
    /// Opens (or lazily creates) a file-backed store. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let entries = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&raw)?
            }
        } else {
            BTreeMap::new()
        };
        debug!("Session store opened at {}", path.display());
        Ok(Self {
            backing: Backing::File(path),
            entries: Mutex::new(entries),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            backing: Backing::Memory,
            entries: Mutex::new(BTreeMap::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        match &self.backing {
            Backing::File(path) => Some(path),
            Backing::Memory => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: impl Into<String>) -> Result<(), AppError> {
        let mut entries = self.entries();
        entries.insert(key.to_string(), value.into());
        self.persist(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<(), AppError> {
        let mut entries = self.entries();
        if entries.remove(key).is_some() {
            self.persist(&entries)?;
        }
        Ok(())
    }

    /// Non-blank bearer token, if logged in.
    pub fn token(&self) -> Option<String> {
        self.get(TOKEN_KEY).filter(|t| !t.trim().is_empty())
    }

    pub fn require_token(&self) -> Result<String, AppError> {
        self.token().ok_or(AppError::AuthRequired)
    }

    /// The cached user. An unreadable entry reads as absent.
    pub fn user(&self) -> Option<UserInfo> {
        self.get(USER_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn store_login(&self, token: &str, user: &UserInfo) -> Result<(), AppError> {
        let user = serde_json::to_string(user)?;
        let mut entries = self.entries();
        entries.insert(TOKEN_KEY.to_string(), token.to_string());
        entries.insert(USER_KEY.to_string(), user);
        self.persist(&entries)
    }

    pub fn clear(&self) -> Result<(), AppError> {
        let mut entries = self.entries();
        entries.remove(TOKEN_KEY);
        entries.remove(USER_KEY);
        self.persist(&entries)
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> Result<(), AppError> {
        let Backing::File(path) = &self.backing else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_vec_pretty(entries)?)?;
        Ok(())
    }
}
