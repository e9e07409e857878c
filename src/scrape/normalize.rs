use std::sync::LazyLock;

use chrono::{DateTime, Datelike, NaiveDate};
use regex::Regex;

use crate::types::{AlbumRecord, RawScrapeItem};

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(\d{4})\b").expect("year pattern is valid"));

const DATE_FORMATS: [&str; 7] = [
    "%Y-%m-%d",
    "%B %d, %Y",
    "%b %d, %Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d %Y",
    "%m/%d/%Y",
];

/// Extracts the 4-digit year from publish date text.
///
/// Tries a calendar date parse first and falls back to the first standalone
/// four digit number. Returns an empty string when neither works.
pub fn derive_year(publish_date: &str) -> String {
    let text = publish_date.trim();

    if let Ok(date_time) = DateTime::parse_from_rfc3339(text) {
        return date_time.year().to_string();
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return date.year().to_string();
        }
    }

    YEAR.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default()
}

/// Turns a raw scrape item into an album record tagged with `rating`.
pub fn normalize(item: RawScrapeItem, rating: &str) -> AlbumRecord {
    AlbumRecord {
        year: derive_year(&item.publish_date),
        artist: item.artist,
        album: item.album,
        rating: rating.to_string(),
    }
}
