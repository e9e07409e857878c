use reqwest::Method;

use crate::{
    error::{Error, Result},
    spotify::SpotifyApi,
    types::{
        AddTracksRequest, CreatePlaylistRequest, Page, Playlist, PlaylistItem,
        RemoveTracksRequest, SnapshotResponse, TrackUri,
    },
};

fn to_body<T: serde::Serialize>(request: &T) -> Result<serde_json::Value> {
    serde_json::to_value(request).map_err(|e| Error::Parse(e.to_string()))
}

impl SpotifyApi {
    /// Listing URL of a playlist's items without paging parameters.
    pub fn playlist_items_endpoint(&self, playlist_id: &str) -> String {
        self.endpoint(&format!("/playlists/{playlist_id}/tracks"))
    }

    pub async fn get_playlist_items(
        &self,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<PlaylistItem>> {
        let url = self.endpoint_with_params(
            &format!("/playlists/{playlist_id}/tracks"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )?;
        self.client.execute_json(Method::GET, &url, None).await
    }

    /// Adds tracks by URI, appending unless `position` is given.
    pub async fn add_tracks_to_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
        position: Option<u32>,
    ) -> Result<SnapshotResponse> {
        let body = to_body(&AddTracksRequest {
            uris: uris.to_vec(),
            position,
        })?;
        let url = self.playlist_items_endpoint(playlist_id);
        self.client
            .execute_json(Method::POST, &url, Some(&body))
            .await
    }

    /// Removes every occurrence of the given track URIs.
    ///
    /// Returns the new snapshot when Spotify sends one back.
    pub async fn remove_tracks_from_playlist(
        &self,
        playlist_id: &str,
        uris: &[String],
    ) -> Result<Option<SnapshotResponse>> {
        let body = to_body(&RemoveTracksRequest {
            tracks: uris
                .iter()
                .map(|uri| TrackUri { uri: uri.clone() })
                .collect(),
        })?;
        let url = self.playlist_items_endpoint(playlist_id);
        let response = self
            .client
            .execute(Method::DELETE, &url, Some(&body))
            .await?;

        Ok(response.and_then(|value| serde_json::from_value(value).ok()))
    }

    pub async fn create_playlist(
        &self,
        user_id: &str,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<Playlist> {
        let body = to_body(&CreatePlaylistRequest {
            name: name.to_string(),
            description: description.to_string(),
            public,
        })?;
        let url = self.endpoint(&format!("/users/{user_id}/playlists"));
        self.client
            .execute_json(Method::POST, &url, Some(&body))
            .await
    }

    pub async fn get_current_user_playlists(
        &self,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Playlist>> {
        let url = self.endpoint_with_params(
            "/me/playlists",
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )?;
        self.client.execute_json(Method::GET, &url, None).await
    }
}
