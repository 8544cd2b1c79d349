//! Client-side storage for the session token.
//!
//! The token lives under the literal key `access_token`. No expiry is
//! tracked; presence alone is what the session guard looks at.

use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "access_token";

/// Storage for the bearer token. Shared between the UI thread and workers.
pub trait SessionStore: Send + Sync {
    fn get(&self) -> Option<String>;

    fn set(&self, token: &str) -> Result<()>;

    fn clear(&self) -> Result<()>;

    fn has_token(&self) -> bool {
        self.get().is_some()
    }
}

/// Process-local store. Used in tests and when auth is disabled.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<String> {
        self.token.lock().clone()
    }

    fn set(&self, token: &str) -> Result<()> {
        *self.token.lock() = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.token.lock() = None;
        Ok(())
    }
}

/// JSON key/value file, read on every `get` so other instances see changes.
pub struct FileSessionStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .with_context(|| format!("corrupt session file {}", self.path.display())),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e).with_context(|| format!("reading {}", self.path.display())),
        }
    }

    fn save(&self, values: &BTreeMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json = serde_json::to_vec_pretty(values)?;
        fs::write(&self.path, json).with_context(|| format!("writing {}", self.path.display()))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<String> {
        match self.load() {
            Ok(mut values) => values.remove(TOKEN_KEY),
            Err(e) => {
                tracing::warn!("session store unreadable: {:#}", e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<()> {
        let _guard = self.write_lock.lock();
        // A corrupt file is replaced rather than blocking login
        let mut values = self.load().unwrap_or_default();
        values.insert(TOKEN_KEY.to_string(), token.to_string());
        self.save(&values)
    }

    fn clear(&self) -> Result<()> {
        let _guard = self.write_lock.lock();
        let mut values = self.load().unwrap_or_default();
        if values.remove(TOKEN_KEY).is_none() && !self.path.exists() {
            return Ok(());
        }
        self.save(&values)
    }
}
