//! HTML parsing for review site listings.
//!
//! One pipeline serves every site; the differences live in
//! [`SourceDescriptor`]. Entries are parsed independently: an entry with a
//! missing or empty field is logged and dropped while the rest of the page
//! is still used.

use scraper::{ElementRef, Html, Selector};

use crate::{
    scrape::{
        normalize::normalize,
        sources::{FieldSelector, SourceDescriptor, TitleRule},
    },
    types::{AlbumRecord, RawScrapeItem},
};

const SEPARATORS: &[char] = &['–', '—', '‒', '―', '-', ':', '|', '·'];

struct CompiledSource {
    entry: Selector,
    artist: CompiledField,
    album: CompiledField,
    date: Option<CompiledField>,
}

struct CompiledField {
    selector: Selector,
    attr: Option<&'static str>,
}

fn compile_field(field: &FieldSelector) -> Result<CompiledField, String> {
    Ok(CompiledField {
        selector: Selector::parse(field.css).map_err(|e| format!("{}: {}", field.css, e))?,
        attr: field.attr,
    })
}

fn compile(source: &SourceDescriptor) -> Result<CompiledSource, String> {
    Ok(CompiledSource {
        entry: Selector::parse(source.entry).map_err(|e| format!("{}: {}", source.entry, e))?,
        artist: compile_field(&source.artist)?,
        album: compile_field(&source.album)?,
        date: source.date.as_ref().map(compile_field).transpose()?,
    })
}

/// Reads a field and collapses its whitespace. Empty values count as
/// missing.
fn extract(entry: &ElementRef, field: &CompiledField) -> Option<String> {
    let element = entry.select(&field.selector).next()?;
    let raw = match field.attr {
        Some(attr) => element.value().attr(attr)?.to_string(),
        None => element.text().collect::<String>(),
    };

    let value = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    (!value.is_empty()).then_some(value)
}

/// Derives the album title from a combined `Artist – Album` heading.
///
/// Splits on the artist's own text first, then strips the separator left at
/// the front of the remainder. A separator counts only when whitespace or
/// the end of the heading follows it, so titles like `-ness` stay intact.
pub fn split_combined_heading(heading: &str, artist: &str) -> Option<String> {
    let (_, rest) = heading.split_once(artist)?;
    let rest = rest.trim_start();
    let stripped = rest.trim_start_matches(SEPARATORS);
    let album = if stripped.len() < rest.len()
        && (stripped.is_empty() || stripped.starts_with(char::is_whitespace))
    {
        stripped.trim()
    } else {
        rest.trim()
    };
    (!album.is_empty()).then(|| album.to_string())
}

fn parse_entry(
    source: &SourceDescriptor,
    compiled: &CompiledSource,
    entry: &ElementRef,
) -> Result<RawScrapeItem, &'static str> {
    let artist = extract(entry, &compiled.artist).ok_or("missing artist")?;
    let album_field = extract(entry, &compiled.album).ok_or("missing album")?;

    let album = match source.title_rule {
        TitleRule::Plain => album_field,
        TitleRule::CombinedHeading => {
            split_combined_heading(&album_field, &artist).ok_or("heading without album title")?
        }
    };

    let publish_date = match &compiled.date {
        Some(field) => extract(entry, field).ok_or("missing publish date")?,
        None => String::new(),
    };

    Ok(RawScrapeItem {
        artist,
        album,
        publish_date,
    })
}

/// Extracts raw items from a parsed page, in document order.
pub fn parse_document(source: &SourceDescriptor, document: &Html) -> Vec<RawScrapeItem> {
    let compiled = match compile(source) {
        Ok(compiled) => compiled,
        Err(e) => {
            log::warn!("Invalid selector for {}: {}", source.id, e);
            return Vec::new();
        }
    };

    let mut items = Vec::new();
    let mut candidates = 0;
    for (index, entry) in document.select(&compiled.entry).enumerate() {
        candidates += 1;
        match parse_entry(source, &compiled, &entry) {
            Ok(item) => items.push(item),
            Err(reason) => log::debug!("Skipping {} entry {}: {}", source.id, index, reason),
        }
    }

    if candidates == 0 {
        log::warn!(
            "No entries matched '{}' on {}; the page layout may have changed",
            source.entry,
            source.id
        );
    }

    log::debug!(
        "Parsed {} of {} {} entries",
        items.len(),
        candidates,
        source.id
    );
    items
}

/// Parses raw page HTML into raw items.
///
/// The document tree lives only for the duration of this call.
pub fn parse_html(source: &SourceDescriptor, html: &str) -> Vec<RawScrapeItem> {
    let document = Html::parse_document(html);
    let items = parse_document(source, &document);
    drop(document);
    items
}

/// Parses raw page HTML straight into normalized album records.
pub fn scrape_html(source: &SourceDescriptor, html: &str) -> Vec<AlbumRecord> {
    parse_html(source, html)
        .into_iter()
        .map(|item| normalize(item, source.rating))
        .collect()
}
