//! Cached administrator credential with a time-to-live.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// How long a cached credential stays valid unless refreshed.
pub const DEFAULT_TTL_DAYS: u32 = 30;

/// Wall clock used for expiry checks; swapped out in tests.
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub fn system_clock() -> Clock {
    Arc::new(Utc::now)
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("credential file is malformed: {0}")]
    Json(#[from] serde_json::Error),
}

/// A single cached credential string.
pub trait CredentialStore {
    /// The cached value, or None when absent or expired.
    fn get(&mut self) -> Result<Option<String>, StoreError>;

    /// Store (or refresh) the value for `ttl_days`. Last write wins.
    fn set(&mut self, value: &str, ttl_days: u32) -> Result<(), StoreError>;

    fn delete(&mut self) -> Result<(), StoreError>;

    fn exists(&mut self) -> Result<bool, StoreError> {
        Ok(self.get()?.is_some())
    }
}

impl<T: CredentialStore + ?Sized> CredentialStore for Box<T> {
    fn get(&mut self) -> Result<Option<String>, StoreError> {
        (**self).get()
    }

    fn set(&mut self, value: &str, ttl_days: u32) -> Result<(), StoreError> {
        (**self).set(value, ttl_days)
    }

    fn delete(&mut self) -> Result<(), StoreError> {
        (**self).delete()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn new(value: &str, ttl_days: u32, now: DateTime<Utc>) -> Self {
        Self {
            value: value.to_string(),
            expires_at: now + Duration::days(i64::from(ttl_days)),
        }
    }

    fn live(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }
}

/// Process-local store; forgets everything on restart.
pub struct MemoryCredentialStore {
    entry: Option<Entry>,
    clock: Clock,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::with_clock(system_clock())
    }

    pub fn with_clock(clock: Clock) -> Self {
        Self { entry: None, clock }
    }
}

impl Default for MemoryCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&mut self) -> Result<Option<String>, StoreError> {
        let now = (self.clock)();
        if self.entry.as_ref().is_some_and(|e| !e.live(now)) {
            self.entry = None;
        }
        Ok(self.entry.as_ref().map(|e| e.value.clone()))
    }

    fn set(&mut self, value: &str, ttl_days: u32) -> Result<(), StoreError> {
        self.entry = Some(Entry::new(value, ttl_days, (self.clock)()));
        Ok(())
    }

    fn delete(&mut self) -> Result<(), StoreError> {
        self.entry = None;
        Ok(())
    }
}

/// Store backed by a small JSON file, so the credential survives restarts like a browser cookie.
pub struct FileCredentialStore {
    path: PathBuf,
    clock: Clock,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, system_clock())
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Clock) -> Self {
        Self {
            path: path.into(),
            clock,
        }
    }

    fn read(&self) -> Result<Option<Entry>, StoreError> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(serde_json::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&mut self) -> Result<Option<String>, StoreError> {
        let now = (self.clock)();
        match self.read()? {
            Some(e) if e.live(now) => Ok(Some(e.value)),
            Some(_) => {
                log::debug!("cached credential expired, removing {}", self.path.display());
                self.delete()?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn set(&mut self, value: &str, ttl_days: u32) -> Result<(), StoreError> {
        let entry = Entry::new(value, ttl_days, (self.clock)());
        std::fs::write(&self.path, serde_json::to_string(&entry)?)?;
        Ok(())
    }

    fn delete(&mut self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
