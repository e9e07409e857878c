use std::path::PathBuf;

use tabled::Table;

use crate::{
    error, info,
    management::favorites::{self, favorites_path},
    success,
    types::{AlbumRecord, AlbumRecordRow},
    utils,
};

fn print_records(records: Vec<AlbumRecord>) {
    let rows: Vec<AlbumRecordRow> = records
        .into_iter()
        .map(|r| AlbumRecordRow {
            artist: r.artist,
            album: r.album,
            year: r.year,
            rating: r.rating,
        })
        .collect();
    println!("{}", Table::new(rows));
}

/// Validates `file` and replaces the stored favorites list with it.
pub async fn import(file: PathBuf) {
    let mut records = match favorites::load_favorites(&file).await {
        Ok(records) => records,
        Err(e) => error!("Cannot import {}. {}", file.display(), e),
    };

    let parsed = records.len();
    utils::dedupe_records(&mut records);
    if records.len() < parsed {
        info!("Dropped {} duplicate rows", parsed - records.len());
    }

    let target = favorites_path();
    if let Err(e) = favorites::write_favorites(&target, &records).await {
        error!("Cannot store favorites at {}. Err: {}", target.display(), e);
    }

    success!("Imported {} favorites", records.len());
    print_records(records);
}

pub async fn list() {
    let path = favorites_path();
    if !path.exists() {
        info!("No favorites imported yet. Run `albumcrate import <file>`.");
        return;
    }

    match favorites::load_favorites(&path).await {
        Ok(records) => print_records(records),
        Err(e) => error!("Stored favorites are unreadable. {}", e),
    }
}

pub async fn export_sample(file: PathBuf) {
    if let Err(e) = favorites::write_favorites(&file, &favorites::sample_records()).await {
        error!("Cannot write {}. Err: {}", file.display(), e);
    }
    success!("Sample favorites written to {}", file.display());
}
