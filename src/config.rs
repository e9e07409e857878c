//! Configuration management for Album Crate.
//!
//! This module handles loading and accessing configuration values from environment
//! variables and `.env` files. It provides a centralized way to manage application
//! configuration including Spotify API credentials, endpoint URLs, the local
//! callback server and scraping settings.
//!
//! The configuration system follows a hierarchical approach:
//! 1. Environment variables (highest priority)
//! 2. `.env` file in the local data directory
//! 3. Application defaults (where applicable)

use dotenv;
use std::{env, path::PathBuf, time::Duration};

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_AUTH_URL: &str = "https://accounts.spotify.com/authorize";
const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const DEFAULT_REDIRECT_URI: &str = "http://127.0.0.1:8888/callback";
const DEFAULT_SERVER_ADDRESS: &str = "127.0.0.1:8888";
const DEFAULT_SCOPE: &str = "user-read-private playlist-read-private playlist-modify-private playlist-modify-public";
const DEFAULT_SCRAPE_TIMEOUT_SECS: u64 = 15;

/// Returns the application directory inside the platform data directory.
///
/// - Linux: `~/.local/share/albumcrate`
/// - macOS: `~/Library/Application Support/albumcrate`
/// - Windows: `%LOCALAPPDATA%/albumcrate`
pub fn data_dir() -> PathBuf {
    let mut path = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("albumcrate");
    path
}

/// Loads environment variables from a `.env` file in the local data directory.
///
/// Creates the data directory if it doesn't exist. A missing `.env` file is
/// not an error: every setting can also come from the process environment,
/// and most of them have defaults.
///
/// # Errors
///
/// Returns an error string if the directory cannot be created or an existing
/// `.env` file cannot be parsed.
pub async fn load_env() -> Result<(), String> {
    let path = data_dir().join(".env");
    if let Some(parent) = path.parent() {
        async_fs::create_dir_all(parent)
            .await
            .map_err(|e| e.to_string())?;
    }

    match dotenv::from_path(&path) {
        Ok(()) => Ok(()),
        Err(dotenv::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(format!("{}: {}", path.display(), e)),
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

/// Returns the address the local OAuth callback server binds to.
///
/// Reads `SERVER_ADDRESS`, defaulting to `127.0.0.1:8888`.
pub fn server_addr() -> String {
    var_or("SERVER_ADDRESS", DEFAULT_SERVER_ADDRESS)
}

/// Returns the Spotify API client ID, if configured.
///
/// Reads `SPOTIFY_API_AUTH_CLIENT_ID`. Authorization and token refresh fail
/// with an authentication error when it is missing.
pub fn spotify_client_id() -> Option<String> {
    env::var("SPOTIFY_API_AUTH_CLIENT_ID")
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Returns the Spotify OAuth redirect URI.
///
/// Reads `SPOTIFY_API_REDIRECT_URI`. This must match the redirect URI
/// registered in the Spotify application settings and the address the
/// callback server listens on.
pub fn spotify_redirect_uri() -> String {
    var_or("SPOTIFY_API_REDIRECT_URI", DEFAULT_REDIRECT_URI)
}

/// Returns the space separated OAuth scopes requested during login.
pub fn spotify_scope() -> String {
    var_or("SPOTIFY_API_AUTH_SCOPE", DEFAULT_SCOPE)
}

/// Returns the Spotify OAuth authorization URL (`SPOTIFY_API_AUTH_URL`).
pub fn spotify_apiauth_url() -> String {
    var_or("SPOTIFY_API_AUTH_URL", DEFAULT_AUTH_URL)
}

/// Returns the Spotify Web API base URL (`SPOTIFY_API_URL`).
pub fn spotify_apiurl() -> String {
    var_or("SPOTIFY_API_URL", DEFAULT_API_URL)
}

/// Returns the Spotify token endpoint (`SPOTIFY_API_TOKEN_URL`), used for
/// both the authorization-code and the refresh-token grants.
pub fn spotify_apitoken_url() -> String {
    var_or("SPOTIFY_API_TOKEN_URL", DEFAULT_TOKEN_URL)
}

/// Returns the deadline for a single review site page fetch.
///
/// Reads `SCRAPE_TIMEOUT_SECS`, defaulting to 15 seconds.
pub fn scrape_timeout() -> Duration {
    let secs = env::var("SCRAPE_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_SCRAPE_TIMEOUT_SECS);
    Duration::from_secs(secs)
}

/// Spotify settings handed to the API client.
///
/// Gathering them once keeps the client independent of the process
/// environment, so tests can point it at a mock server.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub api_url: String,
    pub token_url: String,
    pub auth_url: String,
    pub client_id: Option<String>,
    pub redirect_uri: String,
    pub scope: String,
}

impl ApiConfig {
    pub fn from_env() -> Self {
        Self {
            api_url: spotify_apiurl(),
            token_url: spotify_apitoken_url(),
            auth_url: spotify_apiauth_url(),
            client_id: spotify_client_id(),
            redirect_uri: spotify_redirect_uri(),
            scope: spotify_scope(),
        }
    }

    /// Builds a config with explicit endpoints and default OAuth settings.
    pub fn with_endpoints(
        api_url: impl Into<String>,
        token_url: impl Into<String>,
        client_id: Option<String>,
    ) -> Self {
        Self {
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token_url: token_url.into(),
            auth_url: DEFAULT_AUTH_URL.to_string(),
            client_id,
            redirect_uri: DEFAULT_REDIRECT_URI.to_string(),
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}
