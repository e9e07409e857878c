use axum::{Extension, Router, routing::get};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::sync::Mutex;

use crate::{api, config::ApiConfig, types::PkceToken, warning};

/// Serves the OAuth callback and a health probe on `address`.
///
/// Runs until the process exits. Bind and serve failures are reported and
/// end the server task; the login flow then times out on its own.
pub async fn start_api_server(
    address: String,
    config: ApiConfig,
    state: Arc<Mutex<Option<PkceToken>>>,
) {
    let app = Router::new()
        .route("/health", get(api::health))
        .route("/callback", get(api::callback))
        .layer(Extension(state))
        .layer(Extension(Arc::new(config)));

    let addr = match SocketAddr::from_str(&address) {
        Ok(addr) => addr,
        Err(e) => {
            warning!("Failed to parse server address {}: {}", address, e);
            return;
        }
    };

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            warning!("Cannot listen on {}: {}", addr, e);
            return;
        }
    };

    log::debug!("Callback server listening on {}", addr);
    if let Err(e) = axum::serve(listener, app).await {
        warning!("Callback server stopped: {}", e);
    }
}
