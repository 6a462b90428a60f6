//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the chef, including:
//! - Building HTTP clients with the configured user agent
//! - Retrying connection and timeout failures with linear backoff
//! - Treating non-success status codes as terminal for that URL
//! - Reporting the post-redirect URL to callers

use crate::config::FetcherConfig;
use reqwest::{Client, Method, StatusCode};
use std::time::Duration;
use url::Url;

/// A successful response, body fully read
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status_code: u16,

    /// Response body
    pub body: Vec<u8>,
}

impl FetchedResponse {
    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Outcome of a single request attempt that did not fail in transport
enum AttemptOutcome {
    Success(FetchedResponse),
    Status(StatusCode),
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed by the client; the landing URL is reported in
/// [`FetchedResponse::final_url`]. Only connection setup is bounded here;
/// whole-request cutoffs are set per attempt by [`Fetcher`].
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(config.timeout_secs))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Delay slept before attempt `attempt + 1`
///
/// Backoff is linear: the n-th retry waits n units.
pub fn backoff_delay(attempt: u32, unit: Duration) -> Duration {
    unit * attempt
}

/// Returns true for failures worth retrying: connection setup and timeouts
fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Failure-tolerant HTTP fetcher
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | Return the response |
/// | Any other status | Log, return `None` |
/// | Connect error / timeout | Retry with linear backoff, `None` once exhausted |
/// | Any other transport error | Log, return `None` |
///
/// `None` means "skip this URL"; the fetcher never returns an error.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    backoff_unit: Duration,
    timeout: Duration,
    download_timeout: Duration,
}

impl Fetcher {
    /// Creates a fetcher around an existing client
    pub fn new(client: Client, max_attempts: u32, backoff_unit: Duration, timeout: Duration) -> Self {
        Self {
            client,
            max_attempts: max_attempts.max(1),
            backoff_unit,
            timeout,
            download_timeout: timeout,
        }
    }

    /// Sets the per-attempt cutoff used by [`Fetcher::download`]
    pub fn with_download_timeout(mut self, download_timeout: Duration) -> Self {
        self.download_timeout = download_timeout;
        self
    }

    /// Creates a fetcher from configuration
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            client,
            config.max_attempts,
            Duration::from_millis(config.backoff_unit_ms),
            Duration::from_secs(config.timeout_secs),
        )
        .with_download_timeout(Duration::from_secs(config.download_timeout_secs)))
    }

    /// Maximum number of attempts per URL
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// GET `url` with the default timeout
    pub async fn get(&self, url: &str) -> Option<FetchedResponse> {
        self.fetch(url, Method::GET, self.timeout).await
    }

    /// GET a document body with the download timeout
    pub async fn download(&self, url: &str) -> Option<FetchedResponse> {
        self.fetch(url, Method::GET, self.download_timeout).await
    }

    /// Fetches a URL, retrying transient transport failures
    ///
    /// # Arguments
    ///
    /// * `url` - The URL to fetch
    /// * `method` - HTTP method
    /// * `timeout` - Hard cutoff for each individual attempt
    ///
    /// # Returns
    ///
    /// * `Some(FetchedResponse)` - A 2xx response with its body
    /// * `None` - The URL should be skipped
    pub async fn fetch(&self, url: &str, method: Method, timeout: Duration) -> Option<FetchedResponse> {
        let mut attempt = 0;

        let outcome = loop {
            attempt += 1;

            match self.attempt(url, method.clone(), timeout).await {
                Ok(outcome) => break outcome,
                Err(e) if is_transient(&e) => {
                    if attempt >= self.max_attempts {
                        tracing::error!(
                            "Failed to retrieve {} after {} attempts: {}",
                            url,
                            attempt,
                            e
                        );
                        return None;
                    }

                    tracing::warn!(
                        "Connection error ('{}'); about to perform retry {} of {}",
                        e,
                        attempt,
                        self.max_attempts - 1
                    );
                    tokio::time::sleep(backoff_delay(attempt, self.backoff_unit)).await;
                }
                Err(e) => {
                    tracing::error!("Request to {} failed: {}", url, e);
                    return None;
                }
            }
        };

        match outcome {
            AttemptOutcome::Success(response) => {
                tracing::debug!("Fetched {} ({} bytes)", response.final_url, response.body.len());
                Some(response)
            }
            AttemptOutcome::Status(status) => {
                tracing::error!("Error {} when getting url={}", status.as_u16(), url);
                None
            }
        }
    }

    /// GETs an HTML page and returns its final URL and markup
    pub async fn fetch_page(&self, url: &str) -> Option<(Url, String)> {
        let response = self.get(url).await?;
        tracing::debug!("Downloaded page {}", url);
        let html = response.text();
        Some((response.final_url, html))
    }

    /// One request, body included
    async fn attempt(
        &self,
        url: &str,
        method: Method,
        timeout: Duration,
    ) -> Result<AttemptOutcome, reqwest::Error> {
        let response = self
            .client
            .request(method, url)
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Ok(AttemptOutcome::Status(status));
        }

        let final_url = response.url().clone();
        let body = response.bytes().await?;

        Ok(AttemptOutcome::Success(FetchedResponse {
            final_url,
            status_code: status.as_u16(),
            body: body.to_vec(),
        }))
    }
}
