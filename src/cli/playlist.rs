use tabled::Table;

use crate::{
    cli::{session, spinner},
    info,
    management::PlaylistEditor,
    success,
    types::{PlaylistItem, PlaylistTableRow, TrackTableRow},
    utils, warning,
};

pub async fn create(name: String, description: Option<String>, public: bool) {
    let api = session::open_api().await;

    let user = match api.get_current_user().await {
        Ok(user) => user,
        Err(e) => session::fail(&api, "Failed to load profile", e).await,
    };

    let description = description.unwrap_or_default();
    match api
        .create_playlist(&user.id, &name, &description, public)
        .await
    {
        Ok(playlist) => success!("Playlist '{}' created ({})", playlist.name, playlist.id),
        Err(e) => session::fail(&api, "Failed to create playlist", e).await,
    }
}

pub async fn list(offset: u32, limit: u32) {
    let api = session::open_api().await;
    let pb = spinner("Loading playlists...");
    let result = api.get_current_user_playlists(offset, limit).await;
    pb.finish_and_clear();

    let page = match result {
        Ok(page) => page,
        Err(e) => session::fail(&api, "Failed to load playlists", e).await,
    };

    if page.items.is_empty() {
        info!("No playlists yet. Create one with `albumcrate playlist create`.");
        return;
    }

    let rows: Vec<PlaylistTableRow> = page
        .items
        .into_iter()
        .map(|p| PlaylistTableRow {
            id: p.id,
            name: utils::truncate(&p.name, 60),
            tracks: p.tracks.map(|t| t.total).unwrap_or(0),
            public: match p.public {
                Some(true) => "yes".to_string(),
                Some(false) => "no".to_string(),
                None => "-".to_string(),
            },
        })
        .collect();

    println!("{}", Table::new(rows));
    if page.next.is_some() {
        info!("More playlists available: --offset {}", offset + limit);
    }
}

fn item_rows(offset: u32, items: Vec<PlaylistItem>) -> Vec<TrackTableRow> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| {
            let track = item.track?;
            Some(TrackTableRow {
                position: offset + i as u32 + 1,
                name: utils::truncate(&track.name, 60),
                artists: utils::join_artists(&track.artists),
                uri: track.uri,
            })
        })
        .collect()
}

pub async fn show(playlist_id: String, offset: u32, limit: u32) {
    let api = session::open_api().await;
    let pb = spinner("Loading playlist...");
    let result = PlaylistEditor::open(&api, &playlist_id, offset, limit).await;
    pb.finish_and_clear();

    let (editor, page) = match result {
        Ok(opened) => opened,
        Err(e) => session::fail(&api, "Failed to load playlist", e).await,
    };

    let cursor = editor.cursor();
    let unavailable = page.items.iter().filter(|i| i.track.is_none()).count();
    let rows = item_rows(cursor.offset, page.items);

    println!("{}", Table::new(rows));
    let (current, pages) = cursor.page_position();
    info!("Page {}/{} ({} tracks)", current, pages, cursor.total);
    if unavailable > 0 {
        warning!("{} unavailable tracks hidden", unavailable);
    }
}

pub async fn add(playlist_id: String, uris: Vec<String>) {
    let api = session::open_api().await;
    let (mut editor, _) = match PlaylistEditor::open(&api, &playlist_id, 0, 1).await {
        Ok(opened) => opened,
        Err(e) => session::fail(&api, "Failed to load playlist", e).await,
    };

    for uri in &uris {
        if let Err(e) = editor.add_track(uri).await {
            return session::fail(&api, &format!("Failed to add {}", uri), e).await;
        }
        success!("Added {}", uri);
    }

    info!("Playlist now has {} tracks", editor.cursor().total);
}

pub async fn add_album(playlist_id: String, album_id: String) {
    let api = session::open_api().await;
    let (mut editor, _) = match PlaylistEditor::open(&api, &playlist_id, 0, 1).await {
        Ok(opened) => opened,
        Err(e) => session::fail(&api, "Failed to load playlist", e).await,
    };

    let pb = spinner("Adding album tracks...");
    let result = editor.add_album(&album_id).await;
    pb.finish_and_clear();

    let report = match result {
        Ok(report) => report,
        Err(e) => session::fail(&api, "Failed to load album tracks", e).await,
    };

    if let Some(e) = report.failure {
        warning!(
            "Stopped after {} of {} tracks.",
            report.added,
            report.total
        );
        return session::fail(&api, "Failed to add album", e).await;
    }

    success!(
        "Added {} tracks. Playlist now has {} tracks",
        report.added,
        editor.cursor().total
    );
}

pub async fn remove(playlist_id: String, uris: Vec<String>) {
    let api = session::open_api().await;
    let (mut editor, _) = match PlaylistEditor::open(&api, &playlist_id, 0, 1).await {
        Ok(opened) => opened,
        Err(e) => session::fail(&api, "Failed to load playlist", e).await,
    };

    if let Err(e) = editor.remove_tracks(&uris).await {
        return session::fail(&api, "Failed to remove tracks", e).await;
    }

    success!(
        "Removed {} tracks. Playlist now has {} tracks",
        uris.len(),
        editor.cursor().total
    );
}
