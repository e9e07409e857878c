use std::{sync::Arc, time::Duration};

use reqwest::Client;
use tokio::sync::Mutex;

use crate::{
    config::ApiConfig,
    error::{Error, Result},
    management::CredentialStore,
    server::start_api_server,
    spotify::client::error_message,
    success,
    types::{Credentials, PkceToken, Token},
    utils, warning,
};

/// Runs the OAuth 2.0 PKCE authorization flow and stores the resulting
/// token pair.
///
/// 1. Generates the code verifier and its S256 challenge
/// 2. Starts the local callback server
/// 3. Opens the authorization URL in the browser
/// 4. Waits up to 60 seconds for the callback to exchange the code
/// 5. Writes the token pair to `credentials`
///
/// # Errors
///
/// Returns [`Error::Auth`] when no client id is configured or the flow does
/// not complete in time.
pub async fn auth(
    config: &ApiConfig,
    shared_state: Arc<Mutex<Option<PkceToken>>>,
    credentials: &dyn CredentialStore,
) -> Result<()> {
    let client_id = config
        .client_id
        .clone()
        .ok_or_else(|| Error::Auth("SPOTIFY_API_AUTH_CLIENT_ID is not set".to_string()))?;

    // generate PKCE verifier and challenge
    let code_verifier = utils::generate_code_verifier();
    let code_challenge = utils::generate_code_challenge(&code_verifier);

    // start API server
    let server_state = Arc::clone(&shared_state);
    let server_config = config.clone();
    tokio::spawn(async move {
        start_api_server(crate::config::server_addr(), server_config, server_state).await;
    });

    let auth_url = reqwest::Url::parse_with_params(
        &config.auth_url,
        &[
            ("client_id", client_id.as_str()),
            ("response_type", "code"),
            ("redirect_uri", config.redirect_uri.as_str()),
            ("code_challenge", code_challenge.as_str()),
            ("code_challenge_method", "S256"),
            ("scope", config.scope.as_str()),
        ],
    )
    .map_err(|e| Error::InvalidUrl(format!("{}: {}", config.auth_url, e)))?;

    // Store verifier in shared state before redirect
    {
        let mut lock = shared_state.lock().await;
        *lock = Some(PkceToken {
            code_verifier: code_verifier.clone(),
            token: None,
        });
    }

    if webbrowser::open(auth_url.as_str()).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            auth_url
        )
    }

    match wait_for_token(shared_state).await {
        Some(token) => {
            credentials
                .set(&Credentials {
                    access_token: token.access_token,
                    refresh_token: token.refresh_token,
                })
                .await;
            success!("Authentication successful!");
            Ok(())
        }
        None => Err(Error::Auth(
            "Authentication failed or timed out".to_string(),
        )),
    }
}

/// Polls the shared state once per second for up to 60 seconds until the
/// callback handler has stored a token.
async fn wait_for_token(shared_state: Arc<Mutex<Option<PkceToken>>>) -> Option<Token> {
    use std::time::Instant;

    let max_wait = Duration::from_secs(60);
    let start = Instant::now();

    while start.elapsed() < max_wait {
        let lock = shared_state.lock().await;
        if let Some(pkce_token) = lock.as_ref() {
            if let Some(token) = &pkce_token.token {
                return Some(token.clone());
            }
        }
        drop(lock);
        tokio::time::sleep(Duration::from_secs(1)).await;
    }

    None
}

/// Posts a grant to the token endpoint. Every failure, transport or status,
/// becomes [`Error::Auth`]: the caller cannot make progress without tokens.
async fn request_token(http: &Client, token_url: &str, form: &[(&str, &str)]) -> Result<Token> {
    let response = http
        .post(token_url)
        .form(form)
        .send()
        .await
        .map_err(|e| Error::Auth(format!("Token endpoint unreachable: {}", e)))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| Error::Auth(format!("Failed to read token response: {}", e)))?;

    if !status.is_success() {
        return Err(Error::Auth(error_message(status.as_u16(), &body)));
    }

    let token: Token = serde_json::from_str(&body)
        .map_err(|e| Error::Auth(format!("Malformed token response: {}", e)))?;
    if token.access_token.is_empty() {
        return Err(Error::Auth("Token response without access token".to_string()));
    }
    Ok(token)
}

/// Exchanges a refresh token for a new access token.
///
/// The response may omit `refresh_token`; the returned token then carries
/// `None` and the caller keeps the one it already has.
///
/// # Errors
///
/// [`Error::Auth`] for a missing client id or any non-success response. No
/// retry happens here.
pub async fn refresh_token(http: &Client, config: &ApiConfig, refresh_token: &str) -> Result<Token> {
    let client_id = config
        .client_id
        .as_deref()
        .ok_or_else(|| Error::Auth("SPOTIFY_API_AUTH_CLIENT_ID is not set".to_string()))?;

    log::debug!("Refreshing access token");
    request_token(
        http,
        &config.token_url,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
        ],
    )
    .await
}

/// Exchanges an authorization code plus PKCE verifier for a token pair.
pub async fn exchange_code_pkce(
    http: &Client,
    config: &ApiConfig,
    code: &str,
    verifier: &str,
) -> Result<Token> {
    let client_id = config
        .client_id
        .as_deref()
        .ok_or_else(|| Error::Auth("SPOTIFY_API_AUTH_CLIENT_ID is not set".to_string()))?;

    request_token(
        http,
        &config.token_url,
        &[
            ("grant_type", "authorization_code"),
            ("client_id", client_id),
            ("code", code),
            ("code_verifier", verifier),
            ("redirect_uri", config.redirect_uri.as_str()),
        ],
    )
    .await
}
