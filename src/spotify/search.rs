use reqwest::Method;

use crate::{
    error::{Error, Result},
    spotify::SpotifyApi,
    types::{Page, SearchResponse, SimplifiedAlbum, Track},
};

/// Builds the Spotify search query for an artist/album pair.
///
/// Spotify treats `artist:` and `album:` as field filters. Blank terms are
/// left out entirely, so `("Pink Floyd", "")` yields `artist:Pink Floyd`.
pub fn build_query(artist: &str, album: &str) -> String {
    let artist = artist.trim();
    let album = album.trim();

    let mut terms = Vec::with_capacity(2);
    if !artist.is_empty() {
        terms.push(format!("artist:{artist}"));
    }
    if !album.is_empty() {
        terms.push(format!("album:{album}"));
    }
    terms.join(" ").trim().to_string()
}

impl SpotifyApi {
    async fn search(
        &self,
        kind: &str,
        artist: &str,
        album: &str,
        offset: u32,
        limit: u32,
    ) -> Result<SearchResponse> {
        let query = build_query(artist, album);
        let url = self.endpoint_with_params(
            "/search",
            &[
                ("q", query),
                ("type", kind.to_string()),
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
            ],
        )?;
        self.client.execute_json(Method::GET, &url, None).await
    }

    pub async fn search_albums(
        &self,
        artist: &str,
        album: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<SimplifiedAlbum>> {
        self.search("album", artist, album, offset, limit)
            .await?
            .albums
            .ok_or_else(|| Error::Parse("Search response without albums".to_string()))
    }

    pub async fn search_tracks(
        &self,
        artist: &str,
        album: &str,
        offset: u32,
        limit: u32,
    ) -> Result<Page<Track>> {
        self.search("track", artist, album, offset, limit)
            .await?
            .tracks
            .ok_or_else(|| Error::Parse("Search response without tracks".to_string()))
    }
}
