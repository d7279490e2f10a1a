//! Resume downloads with retry on transient failures.

use std::time::Duration;

use futures_util::StreamExt;
use reqwest::StatusCode;
use thiserror::Error;
use tracing::{debug, warn};

use rescan_core::models::config::BatchConfig;

/// A failed download attempt.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    /// Rate limiting, server errors, timeouts and connection failures are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Status(status) => {
                *status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
            }
            FetchError::Transport(e) => e.is_timeout() || e.is_connect(),
        }
    }
}

/// Downloads resumes, optionally with a bearer token.
pub struct Downloader {
    client: reqwest::Client,
    bearer: Option<String>,
    max_attempts: u32,
    retry_delay_ms: u64,
}

impl Downloader {
    pub fn new(config: &BatchConfig, bearer: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rescan-cli/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.download_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            bearer,
            max_attempts: config.max_retries.max(1),
            retry_delay_ms: config.retry_delay_ms,
        })
    }

    /// Fetch `url`, retrying transient failures with exponential backoff.
    pub async fn fetch(&self, url: &str) -> anyhow::Result<Vec<u8>> {
        let mut attempt = 0;

        loop {
            match self.fetch_once(url).await {
                Ok(data) => {
                    debug!("Downloaded {} bytes", data.len());
                    return Ok(data);
                }
                Err(e) if e.is_transient() && attempt + 1 < self.max_attempts => {
                    let delay = backoff_delay(self.retry_delay_ms, attempt);
                    warn!(
                        "Download attempt {}/{} failed: {}; retrying in {:?}",
                        attempt + 1,
                        self.max_attempts,
                        e,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    anyhow::bail!("Download failed after {} attempt(s): {}", attempt + 1, e)
                }
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let mut request = self.client.get(url);
        if let Some(token) = &self.bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(FetchError::Status(response.status()));
        }

        let mut data = Vec::with_capacity(response.content_length().unwrap_or(0) as usize);
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            data.extend_from_slice(&chunk?);
        }

        Ok(data)
    }
}

/// `base_ms * 2^attempt`, saturating.
pub fn backoff_delay(base_ms: u64, attempt: u32) -> Duration {
    Duration::from_millis(base_ms.saturating_mul(2u64.saturating_pow(attempt)))
}

/// Last path segment of a URL, without query or fragment.
pub fn filename_from_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next()?;
    let path = path.split_once("://").map_or(path, |(_, rest)| rest);
    let (_, segment) = path.rsplit_once('/')?;

    (!segment.is_empty()).then(|| segment.to_string())
}
