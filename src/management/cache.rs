use std::{path::PathBuf, time::Duration};

use chrono::Utc;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{config, management::store::KeyValueStore};

/// Seven days.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

const STORAGE_PREFIX: &str = "cache:";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    /// Milliseconds since the Unix epoch at write time.
    pub timestamp: i64,
    pub data: T,
}

impl<T> CacheEntry<T> {
    fn is_expired(&self, ttl: Duration, now: i64) -> bool {
        now.saturating_sub(self.timestamp) > ttl.as_millis() as i64
    }
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Filesystem cache with one JSON file per key.
///
/// Storage failures never reach the caller: reads degrade to a miss and
/// writes to a no-op, both logged.
#[derive(Debug, Clone)]
pub struct FileCache {
    dir: PathBuf,
    ttl: Duration,
}

impl FileCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self::with_ttl(dir, DEFAULT_TTL)
    }

    pub fn with_ttl(dir: impl Into<PathBuf>, ttl: Duration) -> Self {
        Self {
            dir: dir.into(),
            ttl,
        }
    }

    /// Cache under the application data directory.
    pub fn default_location() -> Self {
        Self::new(config::data_dir().join("cache"))
    }

    pub fn entry_path(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("{file_name}.json"))
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.entry_path(key);
        let content = match async_fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    log::warn!("Cache read failed for {}: {}", path.display(), e);
                }
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&content) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Discarding corrupt cache entry {}: {}", path.display(), e);
                return None;
            }
        };

        if entry.is_expired(self.ttl, now_millis()) {
            log::debug!("Cache entry {} expired", key);
            if let Err(e) = async_fs::remove_file(&path).await {
                log::warn!("Failed to evict {}: {}", path.display(), e);
            }
            return None;
        }

        Some(entry.data)
    }

    pub async fn set<T: Serialize>(&self, key: &str, data: &T) {
        self.set_with_timestamp(key, data, now_millis()).await
    }

    /// Writes an entry stamped with an explicit time.
    pub async fn set_with_timestamp<T: Serialize>(&self, key: &str, data: &T, timestamp: i64) {
        let path = self.entry_path(key);
        let json = match serde_json::to_string(&CacheEntry { timestamp, data }) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot serialize cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = async_fs::create_dir_all(&self.dir).await {
            log::warn!("Cannot create cache directory {}: {}", self.dir.display(), e);
            return;
        }
        if let Err(e) = async_fs::write(&path, json).await {
            log::warn!("Cache write failed for {}: {}", path.display(), e);
        }
    }
}

/// Cache kept inside a [`KeyValueStore`], under keys prefixed with `cache:`.
pub struct StorageCache<S> {
    store: S,
    ttl: Duration,
}

impl<S: KeyValueStore> StorageCache<S> {
    pub fn new(store: S) -> Self {
        Self::with_ttl(store, DEFAULT_TTL)
    }

    pub fn with_ttl(store: S, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    fn storage_key(key: &str) -> String {
        format!("{STORAGE_PREFIX}{key}")
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let storage_key = Self::storage_key(key);
        let raw = self.store.get_item(&storage_key)?;

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Discarding corrupt cache entry {}: {}", key, e);
                return None;
            }
        };

        if entry.is_expired(self.ttl, now_millis()) {
            log::debug!("Cache entry {} expired", key);
            if let Err(e) = self.store.remove_item(&storage_key).await {
                log::warn!("Failed to evict {}: {}", key, e);
            }
            return None;
        }

        Some(entry.data)
    }

    pub async fn set<T: Serialize>(&self, key: &str, data: &T) {
        self.set_with_timestamp(key, data, now_millis()).await
    }

    pub async fn set_with_timestamp<T: Serialize>(&self, key: &str, data: &T, timestamp: i64) {
        let json = match serde_json::to_string(&CacheEntry { timestamp, data }) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot serialize cache entry {}: {}", key, e);
                return;
            }
        };

        if let Err(e) = self.store.set_item(&Self::storage_key(key), &json).await {
            log::warn!("Cache write failed for {}: {}", key, e);
        }
    }

    /// Returns whether a raw entry exists for `key`, expired or not.
    pub fn contains_raw(&self, key: &str) -> bool {
        self.store.get_item(&Self::storage_key(key)).is_some()
    }
}
