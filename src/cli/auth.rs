use std::sync::Arc;

use tokio::sync::Mutex;

use crate::{cli::session, config::ApiConfig, error, info, spotify, success, types::PkceToken};

pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let credentials = session::open_credentials().await;
    info!("Opening Spotify authorization in your browser...");

    let config = ApiConfig::from_env();
    if let Err(e) = spotify::auth::auth(&config, shared_state, credentials.as_ref()).await {
        error!("Login failed: {}", e);
    }
}

pub async fn logout() {
    session::open_credentials().await.clear().await;
    success!("Stored Spotify tokens removed.");
}
