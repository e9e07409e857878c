use std::sync::Arc;

use crate::{
    Error,
    config::ApiConfig,
    error,
    management::{CredentialStore, JsonFileStore, StoredCredentials, credentials_path},
    spotify::SpotifyApi,
};

/// Credential store backed by the credentials file in the data directory.
pub async fn open_credentials() -> Arc<dyn CredentialStore> {
    Arc::new(StoredCredentials::new(
        JsonFileStore::open(credentials_path()).await,
    ))
}

/// API client for commands that talk to Spotify.
pub async fn open_api() -> SpotifyApi {
    match SpotifyApi::new(ApiConfig::from_env(), open_credentials().await) {
        Ok(api) => api,
        Err(e) => error!("Cannot create Spotify client. Err: {}", e),
    }
}

/// Reports a failed command and exits.
///
/// Authentication failures also drop the stored tokens so the next run
/// starts from a clean login.
pub async fn fail<T>(api: &SpotifyApi, context: &str, e: Error) -> T {
    if e.is_auth() {
        api.client().credentials().clear().await;
        error!(
            "{}: {}\nRun `albumcrate auth` to log in again.",
            context, e
        );
    }
    error!("{}: {}", context, e)
}
