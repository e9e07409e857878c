//! # Spotify Integration Module
//!
//! This module provides the interface to the Spotify Web API used by Album
//! Crate: authentication, catalog search, album and track lookup, and
//! playlist management.
//!
//! ## Architecture
//!
//! ```text
//! Application Layer (CLI, Management)
//!          ↓
//! SpotifyApi (typed operations, URL construction)
//!          ↓
//! SpotifyClient (bearer auth, refresh on 401, single retry)
//!          ↓
//! Spotify Web API
//! ```
//!
//! [`SpotifyApi`] does nothing beyond building URLs and bodies and decoding
//! the typed responses. The failure handling lives in [`client::SpotifyClient`]:
//!
//! - the access token is read from the credential store for every request
//! - a 401 refreshes the token once and retries once; the retry's outcome is
//!   returned as is
//! - a failed refresh clears the stored tokens and yields
//!   [`Error::Auth`](crate::Error::Auth), which callers treat as "log in
//!   again"
//! - any other non-success status yields [`Error::Request`](crate::Error::Request)
//!   with the message from Spotify's error body
//!
//! ## Feature Modules
//!
//! - [`auth`] - PKCE login flow and the token endpoint grants
//! - [`search`] - album and track search with `artist:`/`album:` query tokens
//! - [`albums`] - album tracks and single track lookup
//! - [`playlist`] - playlist creation, listing and item add/remove
//! - [`user`] - the current user's profile
//! - [`pagination`] - cursor bookkeeping across mutations
//!
//! ## API Coverage
//!
//! - `GET /search`
//! - `GET /albums/{id}/tracks`
//! - `GET /tracks/{id}`
//! - `GET /me`, `GET /me/playlists`
//! - `POST /users/{user_id}/playlists`
//! - `GET|POST|DELETE /playlists/{playlist_id}/tracks`
//! - `POST /api/token` (authorization-code and refresh-token grants)

use std::sync::Arc;

use reqwest::{Method, Url};
use serde::de::DeserializeOwned;

use crate::{
    config::ApiConfig,
    error::{Error, Result},
    management::CredentialStore,
    types::Page,
};

pub mod albums;
pub mod auth;
pub mod client;
pub mod pagination;
pub mod playlist;
pub mod search;
pub mod user;

pub use client::SpotifyClient;
pub use pagination::PaginationCursor;
pub use search::build_query;

/// Typed facade over the Spotify Web API.
pub struct SpotifyApi {
    client: SpotifyClient,
}

impl SpotifyApi {
    pub fn new(config: ApiConfig, credentials: Arc<dyn CredentialStore>) -> Result<Self> {
        Ok(Self {
            client: SpotifyClient::new(config, credentials)?,
        })
    }

    pub fn client(&self) -> &SpotifyClient {
        &self.client
    }

    /// Absolute URL for an API path such as `/me`.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.client.config().api_url, path)
    }

    pub(crate) fn endpoint_with_params(&self, path: &str, params: &[(&str, String)]) -> Result<String> {
        let base = self.endpoint(path);
        Url::parse_with_params(&base, params)
            .map(String::from)
            .map_err(|e| Error::InvalidUrl(format!("{base}: {e}")))
    }

    /// Follows a `next` or `previous` URL from an earlier page.
    pub async fn get_page<T: DeserializeOwned>(&self, url: &str) -> Result<Page<T>> {
        Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        self.client.execute_json(Method::GET, url, None).await
    }

    /// Collects every item of a listing by following `next` links.
    pub async fn collect_all<T: DeserializeOwned>(&self, first: Page<T>) -> Result<Vec<T>> {
        let mut next = first.next;
        let mut items = first.items;
        while let Some(url) = next {
            let page: Page<T> = self.get_page(&url).await?;
            items.extend(page.items);
            next = page.next;
        }
        Ok(items)
    }
}
