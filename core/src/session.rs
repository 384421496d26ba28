//! Session token persistence.
//!
//! # Design
//! The session is a single opaque bearer token, replaced wholesale on login
//! and removed on logout. There is no local expiry check — a 401 from the
//! server is the only invalidation signal. Stores are handed to `ApiClient`
//! as an explicit `Arc<dyn SessionStore>` handle; nothing here is global.
//!
//! Concurrent `save`/`clear` calls are last-write-wins. Callers are expected
//! not to run login and logout concurrently.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::TOKEN_FILE;
use crate::error::ApiError;

/// Durable key-value persistence of the current session token.
///
/// Failures are `ErrorKind::Storage`. The request pipeline degrades a failed
/// `read` to "no token" when dispatching; direct callers of `save`/`clear`
/// see the error as-is.
pub trait SessionStore: Send + Sync {
    /// Overwrite any existing token. Subsequent requests authenticate as
    /// this token.
    fn save(&self, token: &str) -> Result<(), ApiError>;

    /// Current token, or `None` if never set or cleared.
    fn read(&self) -> Result<Option<String>, ApiError>;

    /// Remove the token. Clearing an absent token succeeds.
    fn clear(&self) -> Result<(), ApiError>;
}

/// File-backed store: the token lives in a single file under a
/// caller-supplied directory.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(TOKEN_FILE),
        }
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, token: &str) -> Result<(), ApiError> {
        fs::write(&self.path, token)?;
        log::debug!("session token saved ({})", mask_token(token));
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, ApiError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.is_empty() => Ok(None),
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn clear(&self) -> Result<(), ApiError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                log::debug!("session token cleared");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn save(&self, token: &str) -> Result<(), ApiError> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| ApiError::storage("session store lock poisoned"))?;
        *slot = Some(token.to_string());
        Ok(())
    }

    fn read(&self) -> Result<Option<String>, ApiError> {
        let slot = self
            .token
            .lock()
            .map_err(|_| ApiError::storage("session store lock poisoned"))?;
        Ok(slot.clone())
    }

    fn clear(&self) -> Result<(), ApiError> {
        let mut slot = self
            .token
            .lock()
            .map_err(|_| ApiError::storage("session store lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}

/// Shorten a token for log output. The full value must never reach a log
/// line.
pub fn mask_token(token: &str) -> String {
    let prefix: String = token.chars().take(8).collect();
    if prefix.len() < token.len() {
        format!("{prefix}***")
    } else {
        "***".to_string()
    }
}
