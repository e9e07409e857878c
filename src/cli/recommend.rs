use tabled::Table;

use crate::{
    cli::spinner,
    error, info,
    scrape::{ALL_SOURCES, Recommendations, SourceDescriptor, find_source},
    success,
    types::{AlbumRecord, AlbumRecordRow},
    utils, warning,
};

pub fn sources() {
    for source in ALL_SOURCES {
        info!("{:<12} {} ({})", source.id, source.name, source.url);
    }
}

async fn scrape_one(
    recommendations: &Recommendations,
    source: &SourceDescriptor,
    refresh: bool,
) -> Option<Vec<AlbumRecord>> {
    let pb = spinner(&format!("Fetching {}...", source.name));
    let result = recommendations.albums(source, refresh).await;
    pb.finish_and_clear();

    match result {
        Ok(records) if records.is_empty() => {
            warning!("{} returned no albums", source.name);
            Some(records)
        }
        Ok(records) => {
            success!("{} albums from {}", records.len(), source.name);
            Some(records)
        }
        Err(e) => {
            warning!("Skipping {}: {}", source.name, e);
            None
        }
    }
}

/// Shows recommendations from one source, or from every source when `source`
/// is `None`. A failing source is reported and skipped.
pub async fn recommend(source: Option<String>, refresh: bool) {
    let selected: Vec<SourceDescriptor> = match source {
        Some(id) => match find_source(&id) {
            Some(source) => vec![source],
            None => error!(
                "Unknown source '{}'. Run `albumcrate recommend --list` to see all sources.",
                id
            ),
        },
        None => ALL_SOURCES.to_vec(),
    };

    let recommendations = Recommendations::from_env();
    let mut records = Vec::new();
    for source in &selected {
        if let Some(found) = scrape_one(&recommendations, source, refresh).await {
            records.extend(found);
        }
    }

    utils::dedupe_records(&mut records);
    if records.is_empty() {
        warning!("No recommendations available.");
        return;
    }

    let rows: Vec<AlbumRecordRow> = records
        .into_iter()
        .map(|r| AlbumRecordRow {
            artist: utils::truncate(&r.artist, 40),
            album: utils::truncate(&r.album, 60),
            year: r.year,
            rating: r.rating,
        })
        .collect();

    println!("{}", Table::new(rows));
}
