use std::{
    collections::BTreeMap,
    io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};

use async_trait::async_trait;

/// String keyed persistent storage.
///
/// Mirrors the browser's local storage: values are plain strings and reads
/// never fail. Reads are served from memory; writes may touch the disk and
/// may fail.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Option<String>;
    fn keys(&self) -> Vec<String>;

    /// Applies several sets (`Some`) and removals (`None`) as one write.
    async fn apply(&self, changes: &[(&str, Option<&str>)]) -> io::Result<()>;

    async fn set_item(&self, key: &str, value: &str) -> io::Result<()> {
        self.apply(&[(key, Some(value))]).await
    }

    async fn remove_item(&self, key: &str) -> io::Result<()> {
        self.apply(&[(key, None)]).await
    }
}

#[async_trait]
impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn keys(&self) -> Vec<String> {
        (**self).keys()
    }

    async fn apply(&self, changes: &[(&str, Option<&str>)]) -> io::Result<()> {
        (**self).apply(changes).await
    }
}

type Items = BTreeMap<String, String>;

fn lock(items: &Mutex<Items>) -> MutexGuard<'_, Items> {
    items.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Applies `changes` and reports whether anything changed.
fn apply_changes(items: &mut Items, changes: &[(&str, Option<&str>)]) -> bool {
    let mut changed = false;
    for (key, value) in changes {
        changed |= match value {
            Some(value) => {
                let previous = items.insert(key.to_string(), value.to_string());
                previous.as_deref() != Some(*value)
            }
            None => items.remove(*key).is_some(),
        };
    }
    changed
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<Items>,
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        lock(&self.items).keys().cloned().collect()
    }

    async fn apply(&self, changes: &[(&str, Option<&str>)]) -> io::Result<()> {
        apply_changes(&mut lock(&self.items), changes);
        Ok(())
    }
}

/// Store kept as a single JSON object on disk, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    items: Mutex<Items>,
    write_lock: tokio::sync::Mutex<()>,
}

impl JsonFileStore {
    /// Opens the store at `path`. A missing file is an empty store; a corrupt
    /// one is logged and treated as empty.
    pub async fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let items = match async_fs::read_to_string(&path).await {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                log::warn!("Ignoring corrupt store {}: {}", path.display(), e);
                BTreeMap::new()
            }),
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                log::warn!("Cannot read store {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };

        Self {
            path,
            items: Mutex::new(items),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        lock(&self.items).get(key).cloned()
    }

    fn keys(&self) -> Vec<String> {
        lock(&self.items).keys().cloned().collect()
    }

    async fn apply(&self, changes: &[(&str, Option<&str>)]) -> io::Result<()> {
        // Held across the write so files land in the order changes were made.
        let _writing = self.write_lock.lock().await;

        let json = {
            let mut items = lock(&self.items);
            if !apply_changes(&mut items, changes) {
                return Ok(());
            }
            serde_json::to_string_pretty(&*items)?
        };

        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        async_fs::write(&self.path, json).await
    }
}
