use crate::error::{RankError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

/// Small string key/value store with an optional byte quota.
pub trait LocalStorage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// Fails with [`RankError::StorageQuotaExceeded`] when the write would
    /// push total usage past the quota. The previous value is kept in that case.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    fn remove_item(&self, key: &str) -> Result<()>;
}

fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(RankError::Storage(format!("Invalid storage key: {:?}", key)));
    }
    Ok(())
}

/// Local storage over a directory, one `<key>.json` file per key.
pub struct FileStorage {
    root: PathBuf,
    quota_bytes: Option<u64>,
}

impl FileStorage {
    /// Opens (and creates if needed) the storage directory.
    pub fn open(root: &Path, quota_bytes: u64) -> Result<Self> {
        std::fs::create_dir_all(root)?;
        Ok(Self {
            root: root.to_path_buf(),
            quota_bytes: (quota_bytes > 0).then_some(quota_bytes),
        })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", key))
    }

    fn usage_excluding(&self, key: &str) -> Result<u64> {
        let skip = self.path_for(key);
        let mut total = 0;
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path == skip || path.extension().map(|e| e != "json").unwrap_or(true) {
                continue;
            }
            total += std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        }
        Ok(total)
    }

    /// Write to a temp file in the same directory, then rename over the target
    fn atomic_write(&self, target_path: &Path, content: &str) -> Result<()> {
        let mut temp_file = NamedTempFile::new_in(&self.root)
            .map_err(|e| RankError::Storage(format!("Failed to create temp file: {}", e)))?;

        use std::io::Write;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| RankError::Storage(format!("Failed to write to temp file: {}", e)))?;

        temp_file
            .as_file()
            .sync_all()
            .map_err(|e| RankError::Storage(format!("Failed to sync temp file: {}", e)))?;

        temp_file
            .persist(target_path)
            .map_err(|e| RankError::Storage(format!("Failed to persist temp file: {}", e)))?;

        Ok(())
    }
}

impl LocalStorage for FileStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        if let Some(quota) = self.quota_bytes {
            let used = self.usage_excluding(key)?;
            if used + value.len() as u64 > quota {
                tracing::warn!(key, used, quota, "Local storage quota exceeded");
                return Err(RankError::StorageQuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        self.atomic_write(&self.path_for(key), value)
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        let path = self.path_for(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Process-local storage. Used when no storage directory is available and in tests.
#[derive(Default)]
pub struct MemoryStorage {
    items: Mutex<HashMap<String, String>>,
    quota_bytes: Option<u64>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            items: Mutex::new(HashMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    fn items(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.items
            .lock()
            .map_err(|_| RankError::Storage("memory storage lock poisoned".to_string()))
    }
}

impl LocalStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        Ok(self.items()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        let mut items = self.items()?;
        if let Some(quota) = self.quota_bytes {
            let used: u64 = items
                .iter()
                .filter(|(k, _)| k.as_str() != key)
                .map(|(_, v)| v.len() as u64)
                .sum();
            if used + value.len() as u64 > quota {
                return Err(RankError::StorageQuotaExceeded {
                    key: key.to_string(),
                });
            }
        }
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        self.items()?.remove(key);
        Ok(())
    }
}
