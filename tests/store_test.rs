//! Tests for the key/value stores and the credential store built on them.

use std::{
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use albumcrate::{
    management::{
        ACCESS_TOKEN_KEY, CredentialStore, JsonFileStore, KeyValueStore, MemoryStore,
        REFRESH_TOKEN_KEY, StoredCredentials,
    },
    types::Credentials,
};
use async_trait::async_trait;
use tempfile::TempDir;

fn pair(access: &str, refresh: Option<&str>) -> Credentials {
    Credentials {
        access_token: access.to_string(),
        refresh_token: refresh.map(str::to_string),
    }
}

/// Memory store that counts write batches.
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

#[async_trait]
impl KeyValueStore for CountingStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.inner.get_item(key)
    }

    fn keys(&self) -> Vec<String> {
        self.inner.keys()
    }

    async fn apply(&self, changes: &[(&str, Option<&str>)]) -> io::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.apply(changes).await
    }
}

mod json_file_store {
    use super::*;

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::open(&path).await;
        store.set_item("a", "1").await.unwrap();
        store.set_item("b", "2").await.unwrap();
        store.remove_item("a").await.unwrap();

        let reopened = JsonFileStore::open(&path).await;
        assert_eq!(reopened.get_item("a"), None);
        assert_eq!(reopened.get_item("b").as_deref(), Some("2"));
        assert_eq!(reopened.keys(), vec!["b".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_file_opens_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, "[1, 2").unwrap();

        let store = JsonFileStore::open(&path).await;
        assert!(store.keys().is_empty());

        store.set_item("k", "v").await.unwrap();
        assert_eq!(
            JsonFileStore::open(&path).await.get_item("k").as_deref(),
            Some("v")
        );
    }

    #[tokio::test]
    async fn test_removing_missing_key_is_ok() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::open(dir.path().join("store.json")).await;

        assert!(store.remove_item("nothing").await.is_ok());
        assert!(!store.path().exists());
    }

    #[tokio::test]
    async fn test_batch_is_applied_together() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");

        let store = JsonFileStore::open(&path).await;
        store.set_item("old", "x").await.unwrap();
        store
            .apply(&[("a", Some("1")), ("b", Some("2")), ("old", None)])
            .await
            .unwrap();

        let reopened = JsonFileStore::open(&path).await;
        assert_eq!(reopened.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[tokio::test]
    async fn test_concurrent_writes_all_land() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        let store = Arc::new(JsonFileStore::open(&path).await);

        let writers: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                tokio::spawn(async move {
                    store
                        .set_item(&format!("key{i}"), &i.to_string())
                        .await
                        .unwrap();
                })
            })
            .collect();
        for writer in writers {
            writer.await.unwrap();
        }

        assert_eq!(JsonFileStore::open(&path).await.keys().len(), 8);
    }
}

mod credentials {
    use super::*;

    #[tokio::test]
    async fn test_set_writes_both_keys() {
        let store = Arc::new(MemoryStore::default());
        let credentials = StoredCredentials::new(store.clone());

        credentials.set(&pair("access", Some("refresh"))).await;

        assert_eq!(store.get_item(ACCESS_TOKEN_KEY).as_deref(), Some("access"));
        assert_eq!(store.get_item(REFRESH_TOKEN_KEY).as_deref(), Some("refresh"));
        assert_eq!(credentials.get(), Some(pair("access", Some("refresh"))));
    }

    #[tokio::test]
    async fn test_set_without_refresh_token_removes_it() {
        let credentials = StoredCredentials::new(MemoryStore::default());

        credentials.set(&pair("one", Some("refresh"))).await;
        credentials.set(&pair("two", None)).await;

        assert_eq!(credentials.access_token().as_deref(), Some("two"));
        assert!(credentials.refresh_token().is_none());
    }

    #[tokio::test]
    async fn test_clear_removes_everything() {
        let credentials = StoredCredentials::new(MemoryStore::default());
        credentials.set(&pair("access", Some("refresh"))).await;

        credentials.clear().await;

        assert!(credentials.get().is_none());
        assert!(credentials.store().keys().is_empty());
    }

    #[tokio::test]
    async fn test_set_and_clear_are_single_writes() {
        let store = Arc::new(CountingStore::default());
        let credentials = StoredCredentials::new(store.clone());

        credentials.set(&pair("access", Some("refresh"))).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);

        credentials.set(&pair("access2", None)).await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 2);

        credentials.clear().await;
        assert_eq!(store.writes.load(Ordering::SeqCst), 3);
        assert!(store.keys().is_empty());
    }

    #[tokio::test]
    async fn test_empty_access_token_is_no_credentials() {
        let store = MemoryStore::default();
        store.set_item(ACCESS_TOKEN_KEY, "").await.unwrap();
        store.set_item(REFRESH_TOKEN_KEY, "refresh").await.unwrap();

        assert!(StoredCredentials::new(store).get().is_none());
    }

    #[tokio::test]
    async fn test_persisted_credentials_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("credentials.json");

        StoredCredentials::new(JsonFileStore::open(&path).await)
            .set(&pair("a", Some("r")))
            .await;
        let reloaded = StoredCredentials::new(JsonFileStore::open(&path).await);

        assert_eq!(reloaded.get(), Some(pair("a", Some("r"))));
    }
}
