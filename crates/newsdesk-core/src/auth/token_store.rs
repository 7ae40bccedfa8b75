use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use anyhow::{Context, Result};
use tracing::{debug, warn};

/// Name of the single durable slot holding the raw bearer token.
pub const TOKEN_KEY: &str = "newsapp_access_token";

/// Durable backend for the access token.
pub trait TokenStorage: Send + Sync {
    fn load(&self) -> Result<Option<String>>;
    fn save(&self, token: &str) -> Result<()>;
    fn remove(&self) -> Result<()>;
}

/// Current access token, kept in memory and written through to storage.
///
/// Persistence is best effort: a failing backend is logged and the store
/// keeps working from memory.
#[derive(Clone)]
pub struct TokenStore {
    current: Arc<RwLock<Option<String>>>,
    storage: Arc<dyn TokenStorage>,
}

impl TokenStore {
    /// Open the store, reading any previously persisted token.
    pub fn open(storage: Arc<dyn TokenStorage>) -> Self {
        let persisted = match storage.load() {
            Ok(token) => token.filter(|t| !t.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read persisted token");
                None
            }
        };
        debug!(has_token = persisted.is_some(), "Token store opened");

        Self {
            current: Arc::new(RwLock::new(persisted)),
            storage,
        }
    }

    /// In-memory token. Never touches storage.
    pub fn get(&self) -> Option<String> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the token. `None` or an empty token removes the stored entry.
    pub fn set(&self, token: Option<String>) {
        let token = token.filter(|t| !t.is_empty());
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);

        let persisted = match token {
            Some(ref t) => self.storage.save(t),
            None => self.storage.remove(),
        };
        if let Err(e) = persisted {
            warn!(error = %e, "Failed to persist access token, continuing in memory");
        }

        *current = token;
    }

    pub fn clear(&self) {
        self.set(None);
    }
}

/// Token kept in process memory only.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryTokenStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(token.into())),
        }
    }

    /// Raw value of the slot.
    pub fn stored(&self) -> Option<String> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl TokenStorage for MemoryTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.stored())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = Some(token.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// Token stored as a plain file named after [`TOKEN_KEY`] in the cache directory.
pub struct FileTokenStorage {
    cache_dir: PathBuf,
}

impl FileTokenStorage {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self { cache_dir }
    }

    fn token_path(&self) -> PathBuf {
        self.cache_dir.join(TOKEN_KEY)
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        let path = self.token_path();
        if !path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).context("Failed to read token file")?;
        let token = contents.trim();
        Ok((!token.is_empty()).then(|| token.to_string()))
    }

    fn save(&self, token: &str) -> Result<()> {
        std::fs::create_dir_all(&self.cache_dir).context("Failed to create cache directory")?;
        std::fs::write(self.token_path(), token).context("Failed to write token file")?;
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        let path = self.token_path();
        if path.exists() {
            std::fs::remove_file(path).context("Failed to remove token file")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct BrokenStorage;

    impl TokenStorage for BrokenStorage {
        fn load(&self) -> Result<Option<String>> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn save(&self, _token: &str) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }

        fn remove(&self) -> Result<()> {
            Err(anyhow::anyhow!("disk on fire"))
        }
    }

    #[test]
    fn test_open_reads_persisted_token() {
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let store = TokenStore::open(storage);
        assert_eq!(store.get().as_deref(), Some("stored"));
    }

    #[test]
    fn test_set_writes_through() {
        let storage = Arc::new(MemoryTokenStorage::new());
        let store = TokenStore::open(storage.clone());

        store.set(Some("abc".to_string()));
        assert_eq!(store.get().as_deref(), Some("abc"));
        assert_eq!(storage.stored().as_deref(), Some("abc"));

        store.clear();
        assert!(store.get().is_none());
        assert!(storage.stored().is_none());
    }

    #[test]
    fn test_empty_token_removes_entry() {
        let storage = Arc::new(MemoryTokenStorage::with_token("old"));
        let store = TokenStore::open(storage.clone());

        store.set(Some(String::new()));
        assert!(store.get().is_none());
        assert!(storage.stored().is_none());
    }

    #[test]
    fn test_broken_storage_keeps_memory() {
        let store = TokenStore::open(Arc::new(BrokenStorage));
        assert!(store.get().is_none());

        store.set(Some("t".to_string()));
        assert_eq!(store.get().as_deref(), Some("t"));

        store.set(None);
        assert!(store.get().is_none());
    }

    #[test]
    fn test_clones_share_token() {
        let store = TokenStore::open(Arc::new(MemoryTokenStorage::new()));
        let other = store.clone();
        store.set(Some("shared".to_string()));
        assert_eq!(other.get().as_deref(), Some("shared"));
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileTokenStorage::new(dir.path().join("newsdesk"));

        assert!(storage.load().unwrap().is_none());
        storage.save("file-token").unwrap();
        assert_eq!(storage.load().unwrap().as_deref(), Some("file-token"));
        assert_eq!(
            std::fs::read_to_string(dir.path().join("newsdesk").join(TOKEN_KEY)).unwrap(),
            "file-token"
        );

        storage.remove().unwrap();
        assert!(storage.load().unwrap().is_none());
        // Removing twice is fine
        storage.remove().unwrap();
    }

    #[test]
    fn test_file_storage_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let store = TokenStore::open(Arc::new(FileTokenStorage::new(dir.path().to_path_buf())));
        store.set(Some("persisted".to_string()));

        let reopened = TokenStore::open(Arc::new(FileTokenStorage::new(dir.path().to_path_buf())));
        assert_eq!(reopened.get().as_deref(), Some("persisted"));
    }
}
