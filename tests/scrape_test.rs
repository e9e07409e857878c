//! Tests for the review site scraping pipeline: entry parsing per source,
//! year derivation, fetch deadlines and the cached service.

use std::time::Duration;

use albumcrate::{
    Error, ScrapeError,
    management::FileCache,
    scrape::{
        ALBUM_CHART, DIY, PITCHFORK, PageFetcher, Recommendations, derive_year, find_source,
        parse_html, scrape_html, split_combined_heading,
    },
    types::AlbumRecord,
};
use tempfile::TempDir;
use wiremock::matchers::{header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHART_HTML: &str = r#"
<html><body>
<table class="chart-table">
  <thead><tr><th>Artist</th><th>Album</th><th>Year</th></tr></thead>
  <tbody>
    <tr>
      <td class="chart-artist"><a href="/a/1">Radiohead</a></td>
      <td class="chart-album"><a href="/b/1">OK   Computer</a></td>
      <td class="chart-year">1997</td>
    </tr>
    <tr>
      <td class="chart-artist"><a href="/a/2">The Beatles</a></td>
      <td class="chart-album"><a href="/b/2">Abbey Road</a></td>
      <td class="chart-year">1969</td>
    </tr>
    <tr>
      <td class="chart-artist"><a href="/a/3">Nirvana</a></td>
      <td class="chart-album"></td>
      <td class="chart-year">1991</td>
    </tr>
    <tr>
      <td class="chart-artist"><a href="/a/4">Pink Floyd</a></td>
      <td class="chart-album"><a href="/b/4">The Dark Side of the Moon</a></td>
      <td class="chart-year">1973</td>
    </tr>
  </tbody>
</table>
</body></html>
"#;

const PITCHFORK_HTML: &str = r#"
<html><body>
<div class="SummaryItemWrapper-abc summary-item">
  <div class="SummaryItemSubHed-xyz">Mk.gee</div>
  <h3 class="SummaryItemHed-xyz">Two Star &amp; the Dream Police</h3>
  <time class="PublishDate-123">February 7, 2024</time>
</div>
<div class="SummaryItemWrapper-abc summary-item">
  <div class="SummaryItemSubHed-xyz">Jessica Pratt</div>
  <h3 class="SummaryItemHed-xyz">Here in the Pitch</h3>
  <time class="PublishDate-123">May 3, 2024</time>
</div>
<div class="SummaryItemWrapper-abc summary-item">
  <div class="SummaryItemSubHed-xyz">No Date Band</div>
  <h3 class="SummaryItemHed-xyz">Undated</h3>
</div>
</body></html>
"#;

const DIY_HTML: &str = r#"
<html><body>
<article class="review-card">
  <span class="review-card__artist">Fontaines D.C.</span>
  <h2 class="review-card__title">Fontaines D.C. – Romance</h2>
  <time datetime="2024-08-23T09:00:00+00:00">23rd August 2024</time>
</article>
<article class="review-card">
  <span class="review-card__artist">Beth Gibbons</span>
  <h2 class="review-card__title">Beth Gibbons - Lives Outgrown</h2>
  <time datetime="2024-05-17">17th May 2024</time>
</article>
<article class="review-card">
  <span class="review-card__artist">Someone Else</span>
  <h2 class="review-card__title">A heading without the artist</h2>
  <time datetime="2024-01-01">1st January 2024</time>
</article>
</body></html>
"#;

// =============================================================================
// Parsing
// =============================================================================

mod parsing {
    use super::*;

    #[test]
    fn test_chart_skips_entry_without_album() {
        let records = scrape_html(&ALBUM_CHART, CHART_HTML);

        assert_eq!(
            records,
            vec![
                AlbumRecord::new("Radiohead", "OK Computer", "1997", "Top Rated"),
                AlbumRecord::new("The Beatles", "Abbey Road", "1969", "Top Rated"),
                AlbumRecord::new("Pink Floyd", "The Dark Side of the Moon", "1973", "Top Rated"),
            ]
        );
    }

    #[test]
    fn test_pitchfork_cards() {
        let records = scrape_html(&PITCHFORK, PITCHFORK_HTML);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].artist, "Mk.gee");
        assert_eq!(records[0].album, "Two Star & the Dream Police");
        assert_eq!(records[0].year, "2024");
        assert_eq!(records[0].rating, "8.0+");
        assert_eq!(records[1].album, "Here in the Pitch");
    }

    #[test]
    fn test_diy_splits_combined_heading() {
        let items = parse_html(&DIY, DIY_HTML);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].artist, "Fontaines D.C.");
        assert_eq!(items[0].album, "Romance");
        assert_eq!(items[0].publish_date, "2024-08-23T09:00:00+00:00");
        assert_eq!(items[1].album, "Lives Outgrown");

        let records = scrape_html(&DIY, DIY_HTML);
        assert_eq!(records[0].year, "2024");
        assert_eq!(records[1].rating, "DIY Featured");
    }

    #[test]
    fn test_no_matching_entries_is_empty() {
        let html = "<html><body><p>Page moved</p></body></html>";
        assert!(scrape_html(&ALBUM_CHART, html).is_empty());
        assert!(scrape_html(&PITCHFORK, html).is_empty());
        assert!(scrape_html(&DIY, html).is_empty());
    }

    #[test]
    fn test_source_pages_do_not_cross_match() {
        assert!(scrape_html(&PITCHFORK, CHART_HTML).is_empty());
        assert!(scrape_html(&ALBUM_CHART, DIY_HTML).is_empty());
    }

    #[test]
    fn test_split_combined_heading() {
        assert_eq!(
            split_combined_heading("Burial – Untrue", "Burial").as_deref(),
            Some("Untrue")
        );
        assert_eq!(
            split_combined_heading("Burial: Untrue", "Burial").as_deref(),
            Some("Untrue")
        );
        assert_eq!(
            split_combined_heading("Jay-Z — The Blueprint", "Jay-Z").as_deref(),
            Some("The Blueprint")
        );
        assert_eq!(split_combined_heading("Untrue", "Burial"), None);
        assert_eq!(split_combined_heading("Burial –", "Burial"), None);
    }

    #[test]
    fn test_split_keeps_leading_punctuation_of_title() {
        assert_eq!(
            split_combined_heading("Burial – -Untrue", "Burial").as_deref(),
            Some("-Untrue")
        );
        assert_eq!(
            split_combined_heading("Wire: :Pink Flag", "Wire").as_deref(),
            Some(":Pink Flag")
        );
        assert_eq!(
            split_combined_heading("Gang of Four |Entertainment!", "Gang of Four").as_deref(),
            Some("|Entertainment!")
        );
    }

    #[test]
    fn test_find_source() {
        assert_eq!(find_source("pitchfork").map(|s| s.rating), Some("8.0+"));
        assert_eq!(find_source("DIY").map(|s| s.id), Some("diy"));
        assert!(find_source("rolling-stone").is_none());
        assert_eq!(ALBUM_CHART.cache_key(), "scrape-album-chart");
    }
}

// =============================================================================
// Year derivation
// =============================================================================

mod years {
    use super::*;

    #[test]
    fn test_derive_year_from_dates() {
        assert_eq!(derive_year("2024-08-23T09:00:00+00:00"), "2024");
        assert_eq!(derive_year("2019-03-01"), "2019");
        assert_eq!(derive_year("September 12, 2024"), "2024");
        assert_eq!(derive_year("Sep 12, 2024"), "2024");
        assert_eq!(derive_year("12 September 2023"), "2023");
    }

    #[test]
    fn test_derive_year_falls_back_to_four_digits() {
        assert_eq!(derive_year("1997"), "1997");
        assert_eq!(derive_year("Reviewed in 2018 by staff"), "2018");
        assert_eq!(derive_year("23rd August 2024"), "2024");
    }

    #[test]
    fn test_derive_year_without_year_is_empty() {
        assert_eq!(derive_year(""), "");
        assert_eq!(derive_year("yesterday"), "");
        assert_eq!(derive_year("12345"), "");
    }
}

// =============================================================================
// Fetching
// =============================================================================

mod fetching {
    use super::*;

    #[tokio::test]
    async fn test_fetch_sends_browser_headers() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/chart"))
            .and(header_regex("user-agent", "Mozilla/5.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHART_HTML))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5));
        let body = fetcher
            .fetch(&format!("{}/chart", server.uri()))
            .await
            .unwrap();
        assert!(body.contains("chart-table"));
    }

    #[tokio::test]
    async fn test_fetch_deadline_is_timed_out() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(CHART_HTML)
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_millis(200));
        let result = fetcher.fetch(&server.uri()).await;
        assert!(matches!(result, Err(ScrapeError::TimedOut { .. })));
    }

    #[tokio::test]
    async fn test_deadline_covers_headers_and_body() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;

            tokio::time::sleep(Duration::from_millis(700)).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: text/html\r\ncontent-length: 4\r\n\r\n")
                .await;
            let _ = socket.flush().await;

            tokio::time::sleep(Duration::from_millis(700)).await;
            let _ = socket.write_all(b"html").await;
            let _ = socket.flush().await;
            tokio::time::sleep(Duration::from_secs(1)).await;
        });

        let fetcher = PageFetcher::new(Duration::from_secs(1));
        let started = std::time::Instant::now();
        let result = fetcher.fetch(&format!("http://{}/", addr)).await;

        assert!(matches!(result, Err(ScrapeError::TimedOut { .. })));
        assert!(started.elapsed() < Duration::from_millis(1300));
    }

    #[tokio::test]
    async fn test_fetch_error_status_is_fetch_failed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let fetcher = PageFetcher::new(Duration::from_secs(5));
        match fetcher.fetch(&server.uri()).await {
            Err(ScrapeError::FetchFailed { reason, .. }) => assert!(reason.contains("503")),
            other => panic!("Expected FetchFailed, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_unreachable_host_is_fetch_failed() {
        let fetcher = PageFetcher::new(Duration::from_secs(5));
        let result = fetcher.fetch("http://127.0.0.1:1/").await;
        assert!(matches!(result, Err(ScrapeError::FetchFailed { .. })));
    }
}

// =============================================================================
// Cached recommendations
// =============================================================================

mod service {
    use super::*;

    #[tokio::test]
    async fn test_results_are_cached_until_refresh() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .and(path("/chart"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CHART_HTML))
            .expect(2)
            .mount(&server)
            .await;

        let recommendations = Recommendations::new(
            PageFetcher::new(Duration::from_secs(5)),
            FileCache::new(dir.path()),
        );
        let url = format!("{}/chart", server.uri());

        let first = recommendations.albums_at(&ALBUM_CHART, &url, false).await.unwrap();
        let cached = recommendations.albums_at(&ALBUM_CHART, &url, false).await.unwrap();
        let refreshed = recommendations.albums_at(&ALBUM_CHART, &url, true).await.unwrap();

        assert_eq!(first.len(), 3);
        assert_eq!(first, cached);
        assert_eq!(first, refreshed);
        assert!(recommendations.cache().entry_path("scrape-album-chart").exists());
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_empty() {
        let server = MockServer::start().await;
        let dir = TempDir::new().unwrap();

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let recommendations = Recommendations::new(
            PageFetcher::new(Duration::from_secs(5)),
            FileCache::new(dir.path()),
        );

        let result = recommendations.albums_at(&PITCHFORK, &server.uri(), false).await;
        assert!(matches!(
            result,
            Err(Error::Scrape(ScrapeError::FetchFailed { .. }))
        ));

        let cached: Option<Vec<AlbumRecord>> =
            recommendations.cache().get(&PITCHFORK.cache_key()).await;
        assert!(cached.is_none());
    }
}
