use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::header::{self, HeaderMap, HeaderValue};
use thiserror::Error;
use tracing::debug;

use crate::config::Settings;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Fetches one page body. Implementations own timeouts and headers; callers
/// never retry.
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .default_headers(browser_headers())
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

// Accept-Encoding is negotiated by reqwest's gzip/brotli/deflate features.
fn browser_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_static(
            "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
        ),
    );
    headers.insert(
        header::ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let start = Instant::now();
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "Fetch rejected");
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;
        debug!(
            url,
            bytes = body.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched page"
        );
        Ok(body)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_default_settings() {
        assert!(HttpFetcher::new(&Settings::default()).is_ok());
    }

    #[test]
    fn browser_headers_present() {
        let headers = browser_headers();
        assert!(headers.contains_key(header::ACCEPT));
        assert!(headers.contains_key(header::ACCEPT_LANGUAGE));
    }

    #[tokio::test]
    async fn static_fetcher_404s_unknown_urls() {
        let fetcher = testing::StaticFetcher::default().with_page("https://a/x", "<p>x</p>");
        assert_eq!(fetcher.fetch("https://a/x").await.unwrap(), "<p>x</p>");
        assert!(matches!(
            fetcher.fetch("https://a/y").await,
            Err(FetchError::Status { status: 404, .. })
        ));
        assert_eq!(fetcher.requested(), vec!["https://a/x", "https://a/y"]);
    }
}
