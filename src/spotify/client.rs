use std::{sync::Arc, time::Duration};

use reqwest::{Client, Method, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::{
    config::ApiConfig,
    error::{Error, Result},
    management::CredentialStore,
    spotify::auth,
    types::Credentials,
};

/// Builds the message for a failed request from its JSON error body.
///
/// Spotify API errors look like `{"error": {"status": 404, "message": "..."}}`,
/// token endpoint errors like `{"error": "invalid_grant", ...}`. Anything
/// else gets a generic message with the status code.
pub fn error_message(status: u16, body: &str) -> String {
    let parsed: Option<Value> = serde_json::from_str(body).ok();
    let error = parsed.as_ref().and_then(|v| v.get("error"));

    if let Some(message) = error
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
    {
        return message.to_string();
    }

    if let Some(message) = error.and_then(Value::as_str).filter(|m| !m.is_empty()) {
        return message.to_string();
    }

    format!("Request failed with status {status}")
}

/// HTTP client for the Spotify Web API that recovers from expired access
/// tokens.
///
/// Every request reads the access token from the credential store at send
/// time. A 401 triggers one refresh through the token endpoint and one
/// retry with the new token. Whatever the retry returns is final.
///
/// Refreshes are serialized: when several requests are rejected with the same
/// token, the first one refreshes and the others reuse its result.
pub struct SpotifyClient {
    http: Client,
    config: ApiConfig,
    credentials: Arc<dyn CredentialStore>,
    refresh_lock: Mutex<()>,
}

impl SpotifyClient {
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("albumcrate/{}", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            config,
            credentials,
            refresh_lock: Mutex::new(()),
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<dyn CredentialStore> {
        &self.credentials
    }

    /// Performs one authenticated request.
    ///
    /// Returns the parsed JSON body, or `None` when a successful response has
    /// an empty or non-JSON body.
    ///
    /// # Errors
    ///
    /// - [`Error::Auth`] when not logged in or the refresh fails; stored
    ///   tokens are cleared in the latter case
    /// - [`Error::Request`] for any other non-success status, including a
    ///   second 401 after the retry
    /// - [`Error::Http`] for transport failures
    pub async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        let token = self
            .credentials
            .access_token()
            .ok_or_else(|| Error::Auth("Not logged in".to_string()))?;

        let mut response = self.send(&method, url, body, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            log::debug!("{} {} rejected with 401, refreshing token", method, url);
            let fresh_token = self.refresh_after_rejection(&token).await?;
            response = self.send(&method, url, body, &fresh_token).await?;
        }

        Self::read_body(response).await
    }

    /// Like [`execute`](Self::execute) but requires a body matching `T`.
    pub async fn execute_json<T: DeserializeOwned>(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let value = self
            .execute(method, url, body)
            .await?
            .ok_or_else(|| Error::Parse(format!("Empty response from {url}")))?;

        serde_json::from_value(value).map_err(|e| Error::Parse(format!("{url}: {e}")))
    }

    async fn send(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
        token: &str,
    ) -> Result<Response> {
        let mut request = self.http.request(method.clone(), url).bearer_auth(token);
        if let Some(body) = body {
            request = request.json(body);
        }
        Ok(request.send().await?)
    }

    /// Returns an access token to retry with after `rejected` got a 401.
    async fn refresh_after_rejection(&self, rejected: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        let Some(current) = self.credentials.get() else {
            return Err(Error::Auth("Session expired, please log in again".to_string()));
        };

        if current.access_token != rejected {
            log::debug!("Token already refreshed by a concurrent request");
            return Ok(current.access_token);
        }

        let Some(refresh_token) = current.refresh_token else {
            self.credentials.clear().await;
            return Err(Error::Auth("No refresh token available".to_string()));
        };

        match auth::refresh_token(&self.http, &self.config, &refresh_token).await {
            Ok(token) => {
                let access_token = token.access_token;
                self.credentials
                    .set(&Credentials {
                        access_token: access_token.clone(),
                        refresh_token: token.refresh_token.or(Some(refresh_token)),
                    })
                    .await;
                log::info!("Access token refreshed");
                Ok(access_token)
            }
            Err(e) => {
                log::warn!("Token refresh failed: {}", e);
                self.credentials.clear().await;
                Err(if e.is_auth() {
                    e
                } else {
                    Error::Auth(e.to_string())
                })
            }
        }
    }

    async fn read_body(response: Response) -> Result<Option<Value>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(Error::Request {
                status: status.as_u16(),
                message: error_message(status.as_u16(), &text),
            });
        }

        if text.trim().is_empty() {
            return Ok(None);
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                log::debug!("Ignoring non-JSON success body ({} bytes)", text.len());
                Ok(None)
            }
        }
    }
}
