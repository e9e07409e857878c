use std::time::Duration;

use reqwest::{Client, header};

use crate::{config, error::ScrapeError};

/// Desktop Chrome user agent. Review sites serve stripped pages to unknown
/// clients.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/138.0.0.0 Safari/537.36";
const ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Fetches listing pages with a fixed deadline.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    http: Client,
    timeout: Duration,
}

impl PageFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            timeout,
        }
    }

    /// Uses the `SCRAPE_TIMEOUT_SECS` deadline.
    pub fn from_env() -> Self {
        Self::new(config::scrape_timeout())
    }

    /// Downloads `url` and returns the body as text.
    ///
    /// A missed deadline is reported as [`ScrapeError::TimedOut`]; any other
    /// failure, including a non-success status, as
    /// [`ScrapeError::FetchFailed`].
    pub async fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let timed_out = || ScrapeError::TimedOut {
            url: url.to_string(),
            seconds: self.timeout.as_secs(),
        };
        let failed = |reason: String| ScrapeError::FetchFailed {
            url: url.to_string(),
            reason,
        };

        log::debug!("Fetching {}", url);
        let download = async {
            let response = self
                .http
                .get(url)
                .header(header::USER_AGENT, USER_AGENT)
                .header(header::ACCEPT, ACCEPT)
                .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                return Ok(Err(status.as_u16()));
            }
            let body = response.text().await?;
            Ok::<_, reqwest::Error>(Ok(body))
        };

        // One deadline covers connecting, headers and the whole body.
        match tokio::time::timeout(self.timeout, download).await {
            Err(_) => Err(timed_out()),
            Ok(Err(e)) if e.is_timeout() => Err(timed_out()),
            Ok(Err(e)) => Err(failed(e.to_string())),
            Ok(Ok(Err(status))) => Err(failed(format!("status {}", status))),
            Ok(Ok(Ok(body))) => Ok(body),
        }
    }
}
