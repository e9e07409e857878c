use reqwest::Method;

use crate::{
    error::Result,
    spotify::SpotifyApi,
    types::{Page, SimplifiedTrack, Track},
};

impl SpotifyApi {
    /// Fetches one page of an album's tracks.
    pub async fn get_album_tracks(
        &self,
        album_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<SimplifiedTrack>> {
        let url = self.endpoint_with_params(
            &format!("/albums/{album_id}/tracks"),
            &[("offset", offset.to_string()), ("limit", limit.to_string())],
        )?;
        self.client.execute_json(Method::GET, &url, None).await
    }

    /// Fetches every track of an album in track order.
    pub async fn get_all_album_tracks(&self, album_id: &str) -> Result<Vec<SimplifiedTrack>> {
        let first = self.get_album_tracks(album_id, 0, 50).await?;
        self.collect_all(first).await
    }

    pub async fn get_track(&self, track_id: &str) -> Result<Track> {
        let url = self.endpoint(&format!("/tracks/{track_id}"));
        self.client.execute_json(Method::GET, &url, None).await
    }
}
