//! Credential storage
//!
//! A thin pass-through over a persistent key-value store holding the two
//! opaque platform tokens. No parsing, validation, or expiry logic lives
//! here; tokens are read fresh per request because a refresh may replace
//! them between requests.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Key of the short-lived access token
pub const ACCESS_TOKEN_KEY: &str = "token";

/// Key of the longer-lived refresh token
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";

/// The stored token pair as read at a single point in time
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenPair {
    pub token: Option<String>,
    pub refresh_token: Option<String>,
}

/// Pass-through accessor over a persistent key-value credential store
///
/// Mutations are immediate and infallible from the caller's perspective,
/// matching the semantics of a browser cookie jar.
pub trait CredentialStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);

    /// Read both tokens at once
    fn token_pair(&self) -> TokenPair {
        TokenPair {
            token: self.get(ACCESS_TOKEN_KEY),
            refresh_token: self.get(REFRESH_TOKEN_KEY),
        }
    }

    /// Store a freshly issued token pair
    fn store_pair(&self, token: &str, refresh_token: &str) {
        self.set(ACCESS_TOKEN_KEY, token);
        self.set(REFRESH_TOKEN_KEY, refresh_token);
    }

    /// Remove both tokens
    fn clear(&self) {
        self.remove(ACCESS_TOKEN_KEY);
        self.remove(REFRESH_TOKEN_KEY);
    }
}

/// In-memory credential store, the default for native processes and tests
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .expect("Failed to acquire credential store lock")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .expect("Failed to acquire credential store lock")
            .insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.values
            .write()
            .expect("Failed to acquire credential store lock")
            .remove(key);
    }
}

/// File-backed credential store, persisting tokens as a small JSON map
///
/// The file is read once at open and rewritten on every mutation. A failed
/// rewrite is logged and otherwise ignored; the store contract has no error
/// surface, like the cookie jar it replaces.
#[derive(Debug)]
pub struct FileCredentialStore {
    path: PathBuf,
    values: RwLock<HashMap<String, String>>,
}

impl FileCredentialStore {
    /// Open a store at `path`, loading any previously persisted tokens
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> crate::CoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = if path.exists() {
            let contents = std::fs::read_to_string(&path)?;
            serde_json::from_str(&contents)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    fn persist(&self, values: &HashMap<String, String>) {
        let serialized = match serde_json::to_string_pretty(values) {
            Ok(s) => s,
            Err(error) => {
                tracing::warn!(%error, "failed to serialize credential store");
                return;
            }
        };
        if let Err(error) = std::fs::write(&self.path, serialized) {
            tracing::warn!(%error, path = %self.path.display(), "failed to persist credential store");
        }
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .expect("Failed to acquire credential store lock")
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self
            .values
            .write()
            .expect("Failed to acquire credential store lock");
        values.insert(key.to_string(), value.to_string());
        self.persist(&values);
    }

    fn remove(&self, key: &str) {
        let mut values = self
            .values
            .write()
            .expect("Failed to acquire credential store lock");
        values.remove(key);
        self.persist(&values);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trips() {
        let store = MemoryCredentialStore::new();
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);

        store.set(ACCESS_TOKEN_KEY, "t1");
        store.set(REFRESH_TOKEN_KEY, "r1");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("t1"));

        let pair = store.token_pair();
        assert_eq!(pair.token.as_deref(), Some("t1"));
        assert_eq!(pair.refresh_token.as_deref(), Some("r1"));

        store.remove(ACCESS_TOKEN_KEY);
        assert_eq!(store.get(ACCESS_TOKEN_KEY), None);
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("r1"));
    }

    #[test]
    fn pair_helpers_store_and_clear_both_keys() {
        let store = MemoryCredentialStore::new();
        store.store_pair("t2", "r2");
        assert_eq!(store.get(ACCESS_TOKEN_KEY).as_deref(), Some("t2"));
        assert_eq!(store.get(REFRESH_TOKEN_KEY).as_deref(), Some("r2"));

        store.clear();
        assert_eq!(store.token_pair(), TokenPair::default());
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        {
            let store = FileCredentialStore::open(&path).unwrap();
            store.store_pair("t3", "r3");
        }

        let reopened = FileCredentialStore::open(&path).unwrap();
        assert_eq!(reopened.get(ACCESS_TOKEN_KEY).as_deref(), Some("t3"));
        assert_eq!(reopened.get(REFRESH_TOKEN_KEY).as_deref(), Some("r3"));

        reopened.clear();
        let cleared = FileCredentialStore::open(&path).unwrap();
        assert_eq!(cleared.token_pair(), TokenPair::default());
    }
}
