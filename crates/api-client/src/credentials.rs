//! Durable credential storage
//!
//! The session lives in a small key-value store under three fixed keys.
//! Reads and writes are synchronous: they never suspend a request.

use crate::error::{ApiError, ApiResult};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Session file mode on Unix: owner read/write only
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Key of the access token
pub const ACCESS_TOKEN_KEY: &str = "token";

/// Key of the refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// Key of the cached user profile (opaque)
pub const USER_KEY: &str = "user";

/// Every key cleared by a logout
pub const SESSION_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USER_KEY];

/// Process-wide key-value storage for session values
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Read a value
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value
    fn set(&self, key: &str, value: &str) -> ApiResult<()>;

    /// Delete a value; deleting a missing key succeeds
    fn remove(&self, key: &str) -> ApiResult<()>;

    /// Stored access token, if any
    fn access_token(&self) -> Option<String> {
        self.get(ACCESS_TOKEN_KEY)
    }

    /// Stored refresh token, if any
    fn refresh_token(&self) -> Option<String> {
        self.get(REFRESH_TOKEN_KEY)
    }
}

// =============================================================================
// Memory Store
// =============================================================================

/// In-memory store for tests and embedding
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with a credential pair
    #[must_use]
    pub fn with_tokens(access_token: Option<&str>, refresh_token: Option<&str>) -> Self {
        let mut entries = BTreeMap::new();
        if let Some(token) = access_token {
            entries.insert(ACCESS_TOKEN_KEY.to_string(), token.to_string());
        }
        if let Some(token) = refresh_token {
            entries.insert(REFRESH_TOKEN_KEY.to_string(), token.to_string());
        }
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Whether nothing is stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl CredentialStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

// =============================================================================
// File Store
// =============================================================================

/// JSON-file store that survives restarts
///
/// Values are cached in memory and written through on every change. The
/// cache only takes a change once the file write succeeded, and on Unix the
/// file is readable by its owner only.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Default session file: `<data dir>/menu-display/session.json`
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from(".local/share"))
            .join("menu-display")
            .join("session.json")
    }

    /// Open the store at the default location
    pub fn open_default() -> ApiResult<Self> {
        Self::open(Self::default_path())
    }

    /// Open (or lazily create) the store at `path`
    ///
    /// A missing file is an empty session. A corrupt file is logged and
    /// treated as empty; it is overwritten on the next write.
    pub fn open(path: impl Into<PathBuf>) -> ApiResult<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "Session file is corrupt, starting empty");
                BTreeMap::new()
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(ApiError::storage(format!(
                    "Failed to read {}: {e}",
                    path.display()
                )));
            }
        };

        debug!(path = %path.display(), keys = entries.len(), "Opened session store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    /// Location of the session file
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> ApiResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ApiError::storage(format!("Failed to create {}: {e}", parent.display()))
            })?;
        }
        let json = serde_json::to_string_pretty(entries)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, json)
            .map_err(|e| ApiError::storage(format!("Failed to write {}: {e}", temp_path.display())))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&temp_path, fs::Permissions::from_mode(FILE_MODE)).map_err(|e| {
                ApiError::storage(format!("Failed to restrict {}: {e}", temp_path.display()))
            })?;
        }

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(ApiError::storage(format!(
                "Failed to write {}: {e}",
                self.path.display()
            )));
        }
        Ok(())
    }
}

impl CredentialStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> ApiResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let mut next = entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    fn remove(&self, key: &str) -> ApiResult<()> {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}
