use std::path::PathBuf;

use async_trait::async_trait;

use crate::{config, management::store::KeyValueStore, types::Credentials};

pub const ACCESS_TOKEN_KEY: &str = "spotify_access_token";
pub const REFRESH_TOKEN_KEY: &str = "spotify_refresh_token";

/// Holder of the current Spotify token pair.
///
/// The API client reads it before every request and writes it only after a
/// successful refresh. Implementations must be safe to share between tasks.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<Credentials>;
    async fn set(&self, credentials: &Credentials);
    async fn clear(&self);

    fn access_token(&self) -> Option<String> {
        self.get().map(|c| c.access_token)
    }

    fn refresh_token(&self) -> Option<String> {
        self.get().and_then(|c| c.refresh_token)
    }
}

/// Credential store persisted under two string keys of a [`KeyValueStore`].
///
/// Each `set` or `clear` is a single store write.
pub struct StoredCredentials<S> {
    store: S,
}

impl<S: KeyValueStore> StoredCredentials<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

#[async_trait]
impl<S: KeyValueStore> CredentialStore for StoredCredentials<S> {
    fn get(&self) -> Option<Credentials> {
        let access_token = self
            .store
            .get_item(ACCESS_TOKEN_KEY)
            .filter(|t| !t.is_empty())?;
        let refresh_token = self
            .store
            .get_item(REFRESH_TOKEN_KEY)
            .filter(|t| !t.is_empty());

        Some(Credentials {
            access_token,
            refresh_token,
        })
    }

    async fn set(&self, credentials: &Credentials) {
        let changes = [
            (ACCESS_TOKEN_KEY, Some(credentials.access_token.as_str())),
            (REFRESH_TOKEN_KEY, credentials.refresh_token.as_deref()),
        ];
        if let Err(e) = self.store.apply(&changes).await {
            log::warn!("Failed to store tokens: {}", e);
        }
    }

    async fn clear(&self) {
        let changes: [(&str, Option<&str>); 2] =
            [(ACCESS_TOKEN_KEY, None), (REFRESH_TOKEN_KEY, None)];
        if let Err(e) = self.store.apply(&changes).await {
            log::warn!("Failed to remove tokens: {}", e);
        }
    }
}

/// Location of the persistent credential file.
pub fn credentials_path() -> PathBuf {
    config::data_dir().join("credentials.json")
}
