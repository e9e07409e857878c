use tabled::Table;

use crate::{
    cli::{session, spinner},
    info,
    spotify::PaginationCursor,
    types::{AlbumSearchRow, TrackTableRow},
    utils, warning,
};

pub async fn search_albums(artist: String, album: String, offset: u32, limit: u32) {
    let api = session::open_api().await;
    let pb = spinner("Searching albums...");
    let result = api.search_albums(&artist, &album, offset, limit).await;
    pb.finish_and_clear();

    let page = match result {
        Ok(page) => page,
        Err(e) => session::fail(&api, "Album search failed", e).await,
    };

    if page.items.is_empty() {
        warning!("No albums found for {}", spotify_query(&artist, &album));
        return;
    }

    let cursor = PaginationCursor::from_page(&page);
    let rows: Vec<AlbumSearchRow> = page
        .items
        .into_iter()
        .map(|a| AlbumSearchRow {
            artists: utils::join_artists(&a.artists),
            id: a.id,
            name: utils::truncate(&a.name, 60),
            released: a.release_date,
            tracks: a.total_tracks,
        })
        .collect();

    println!("{}", Table::new(rows));
    print_position(&cursor, "albums");
}

pub async fn search_tracks(artist: String, album: String, offset: u32, limit: u32) {
    let api = session::open_api().await;
    let pb = spinner("Searching tracks...");
    let result = api.search_tracks(&artist, &album, offset, limit).await;
    pb.finish_and_clear();

    let page = match result {
        Ok(page) => page,
        Err(e) => session::fail(&api, "Track search failed", e).await,
    };

    if page.items.is_empty() {
        warning!("No tracks found for {}", spotify_query(&artist, &album));
        return;
    }

    let cursor = PaginationCursor::from_page(&page);
    let rows: Vec<TrackTableRow> = page
        .items
        .into_iter()
        .enumerate()
        .map(|(i, t)| TrackTableRow {
            position: cursor.offset + i as u32 + 1,
            name: utils::truncate(&t.name, 60),
            artists: utils::join_artists(&t.artists),
            uri: t.uri,
        })
        .collect();

    println!("{}", Table::new(rows));
    print_position(&cursor, "tracks");
}

pub async fn album_tracks(album_id: String) {
    let api = session::open_api().await;
    let pb = spinner("Loading album tracks...");
    let result = api.get_all_album_tracks(&album_id).await;
    pb.finish_and_clear();

    let tracks = match result {
        Ok(tracks) => tracks,
        Err(e) => session::fail(&api, "Failed to load album tracks", e).await,
    };

    let rows: Vec<TrackTableRow> = tracks
        .into_iter()
        .map(|t| TrackTableRow {
            position: t.track_number,
            name: utils::truncate(&t.name, 60),
            artists: utils::join_artists(&t.artists),
            uri: t.uri,
        })
        .collect();

    println!("{}", Table::new(rows));
}

fn print_position(cursor: &PaginationCursor, noun: &str) {
    let (current, pages) = cursor.page_position();
    info!("Page {}/{} ({} {})", current, pages, cursor.total, noun);
    if cursor.has_next() {
        info!("Next page: --offset {}", cursor.offset + cursor.limit);
    }
}

fn spotify_query(artist: &str, album: &str) -> String {
    let query = crate::spotify::build_query(artist, album);
    if query.is_empty() {
        "an empty query".to_string()
    } else {
        format!("'{query}'")
    }
}
