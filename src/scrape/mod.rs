//! # Recommendation Scraping
//!
//! Album recommendations come from public review site listings. Each site is
//! described declaratively by a [`SourceDescriptor`]; a single pipeline
//! fetches the page, parses entries, normalizes them into
//! [`AlbumRecord`]s and caches the result for a week.
//!
//! ```text
//! PageFetcher (deadline, browser headers)
//!      ↓
//! parser (per-entry extraction, malformed entries skipped)
//!      ↓
//! normalize (year derivation, rating tag)
//!      ↓
//! FileCache (scrape-<source id>)
//! ```
//!
//! A failed fetch is an error for that source only; the cache is left
//! untouched so a later run can retry.

mod fetch;
pub mod normalize;
pub mod parser;
pub mod sources;

pub use fetch::PageFetcher;
pub use normalize::{derive_year, normalize};
pub use parser::{parse_html, scrape_html, split_combined_heading};
pub use sources::{
    ALBUM_CHART, ALL_SOURCES, DIY, FieldSelector, PITCHFORK, SourceDescriptor, TitleRule,
    find_source,
};

use crate::{error::Result, management::FileCache, types::AlbumRecord};

/// Cached access to every review site source.
pub struct Recommendations {
    fetcher: PageFetcher,
    cache: FileCache,
}

impl Recommendations {
    pub fn new(fetcher: PageFetcher, cache: FileCache) -> Self {
        Self { fetcher, cache }
    }

    /// Default deadline and the cache under the data directory.
    pub fn from_env() -> Self {
        Self::new(PageFetcher::from_env(), FileCache::default_location())
    }

    pub fn cache(&self) -> &FileCache {
        &self.cache
    }

    /// Albums for `source` from its own listing URL.
    pub async fn albums(&self, source: &SourceDescriptor, refresh: bool) -> Result<Vec<AlbumRecord>> {
        self.albums_at(source, source.url, refresh).await
    }

    /// Albums for `source` fetched from `url`.
    ///
    /// A fresh cache entry short-circuits the fetch unless `refresh` is set.
    /// An empty parse result is cached like any other.
    pub async fn albums_at(
        &self,
        source: &SourceDescriptor,
        url: &str,
        refresh: bool,
    ) -> Result<Vec<AlbumRecord>> {
        let key = source.cache_key();

        if !refresh {
            if let Some(records) = self.cache.get::<Vec<AlbumRecord>>(&key).await {
                log::debug!("Using cached {} albums ({})", source.id, records.len());
                return Ok(records);
            }
        }

        let html = self.fetcher.fetch(url).await?;
        let records = scrape_html(source, &html);
        log::info!("Scraped {} albums from {}", records.len(), source.name);

        self.cache.set(&key, &records).await;
        Ok(records)
    }
}
