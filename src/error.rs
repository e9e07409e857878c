//! Error types shared by the Spotify client, the scraper and the importer.

use thiserror::Error;

/// Failures while fetching a review site page.
#[derive(Error, Debug)]
pub enum ScrapeError {
    /// The page did not arrive before the fetch deadline.
    #[error("Fetching {url} timed out after {seconds} seconds")]
    TimedOut { url: String, seconds: u64 },

    /// Transport failure or non-success status.
    #[error("Fetching {url} failed: {reason}")]
    FetchFailed { url: String, reason: String },
}

/// Errors that can occur while talking to Spotify, scraping review sites or
/// importing a favorites file.
///
/// [`Error::Auth`] is terminal: stored credentials are cleared and the user
/// has to log in again. Everything else leaves the stored tokens alone.
#[derive(Error, Debug)]
pub enum Error {
    /// Credentials are missing, the refresh was denied, or no client id is
    /// configured.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Spotify answered with a non-success status.
    #[error("Request failed ({status}): {message}")]
    Request { status: u16, message: String },

    /// Network level failure (connect, DNS, TLS, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A request URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A response body did not match the expected schema.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error(transparent)]
    Scrape(#[from] ScrapeError),

    /// Malformed favorites file. Nothing was imported.
    #[error("Import failed: {0}")]
    Import(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

/// Result type for albumcrate operations.
pub type Result<T> = std::result::Result<T, Error>;
