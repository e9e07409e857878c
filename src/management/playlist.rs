use crate::{
    error::{Error, Result},
    spotify::{PaginationCursor, SpotifyApi},
    types::{Page, PlaylistItem, SnapshotResponse},
};

/// Outcome of adding an album track by track.
#[derive(Debug)]
pub struct AlbumAddReport {
    pub added: usize,
    pub total: usize,
    /// The failure that stopped the batch, if any.
    pub failure: Option<Error>,
}

impl AlbumAddReport {
    pub fn is_complete(&self) -> bool {
        self.failure.is_none() && self.added == self.total
    }
}

/// Edits one playlist while keeping a pagination cursor in step with the
/// playlist's size.
pub struct PlaylistEditor<'a> {
    api: &'a SpotifyApi,
    playlist_id: String,
    cursor: PaginationCursor,
}

impl<'a> PlaylistEditor<'a> {
    pub fn new(api: &'a SpotifyApi, playlist_id: impl Into<String>, cursor: PaginationCursor) -> Self {
        Self {
            api,
            playlist_id: playlist_id.into(),
            cursor,
        }
    }

    /// Loads one page of the playlist and positions the cursor on it.
    pub async fn open(
        api: &'a SpotifyApi,
        playlist_id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<(Self, Page<PlaylistItem>)> {
        let page = api.get_playlist_items(playlist_id, offset, limit).await?;
        let editor = Self::new(api, playlist_id, PaginationCursor::from_page(&page));
        Ok((editor, page))
    }

    pub fn cursor(&self) -> &PaginationCursor {
        &self.cursor
    }

    pub fn playlist_id(&self) -> &str {
        &self.playlist_id
    }

    fn apply_total(&mut self, total: u32) {
        let endpoint = self.api.playlist_items_endpoint(&self.playlist_id);
        self.cursor.recompute(&endpoint, total);
    }

    /// Appends one track.
    pub async fn add_track(&mut self, uri: &str) -> Result<SnapshotResponse> {
        let snapshot = self
            .api
            .add_tracks_to_playlist(&self.playlist_id, &[uri.to_string()], None)
            .await?;
        let total = self.cursor.total + 1;
        self.apply_total(total);
        Ok(snapshot)
    }

    /// Removes the given tracks. Each URI is counted once against the total.
    pub async fn remove_tracks(&mut self, uris: &[String]) -> Result<()> {
        self.api
            .remove_tracks_from_playlist(&self.playlist_id, uris)
            .await?;
        let total = self.cursor.total.saturating_sub(uris.len() as u32);
        self.apply_total(total);
        Ok(())
    }

    pub async fn remove_track(&mut self, uri: &str) -> Result<()> {
        self.remove_tracks(&[uri.to_string()]).await
    }

    /// Appends every track of an album, one request per track, in album
    /// order.
    ///
    /// Stops at the first failed addition and reports it with the number of
    /// tracks already added; those stay in the playlist and are reflected in
    /// the cursor. Only a failure to list the album's tracks is an `Err`.
    pub async fn add_album(&mut self, album_id: &str) -> Result<AlbumAddReport> {
        let tracks = self.api.get_all_album_tracks(album_id).await?;
        let mut report = AlbumAddReport {
            added: 0,
            total: tracks.len(),
            failure: None,
        };

        for track in &tracks {
            if let Err(e) = self.add_track(&track.uri).await {
                log::warn!(
                    "Adding album {} stopped after {} of {} tracks: {}",
                    album_id,
                    report.added,
                    report.total,
                    e
                );
                report.failure = Some(e);
                break;
            }
            report.added += 1;
        }

        Ok(report)
    }
}
