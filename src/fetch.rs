//! Page fetching with timeout and bounded retry.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use thiserror::Error;

use crate::config::FetchSettings;

/// Statuses worth another attempt; everything else fails immediately.
const RETRYABLE_STATUSES: &[u16] = &[408, 413, 429, 500, 502, 503, 504, 521, 522, 524];

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("response status {0}")]
    Status(StatusCode),

    #[error("network error: {0}")]
    Network(String),

    /// Failures another attempt cannot fix: unsupported scheme, redirect
    /// loop, undecodable body.
    #[error("request failed: {0}")]
    Request(String),
}

impl FetchError {
    fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout | FetchError::Network(_) => true,
            FetchError::Status(code) => RETRYABLE_STATUSES.contains(&code.as_u16()),
            FetchError::Request(_) => false,
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if let Some(status) = e.status() {
            FetchError::Status(status)
        } else if e.is_connect() || (e.is_request() && !e.is_builder() && !e.is_redirect()) {
            FetchError::Network(e.to_string())
        } else {
            FetchError::Request(e.to_string())
        }
    }
}

/// Markup plus the URL it was served from after redirects.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: String,
    pub final_url: String,
}

#[derive(Clone)]
pub struct PageFetcher {
    client: Client,
    settings: FetchSettings,
}

impl PageFetcher {
    pub fn new(settings: FetchSettings) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(PageFetcher { client, settings })
    }

    /// GET `url`, following redirects. Transient failures are retried up to
    /// `max_retries` times with exponential backoff.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let mut attempt = 0;
        loop {
            match self.fetch_once(url).await {
                Ok(page) => return Ok(page),
                Err(e) if e.is_retryable() && attempt < self.settings.max_retries => {
                    let delay = backoff_delay(self.settings.retry_backoff, attempt);
                    attempt += 1;
                    tracing::debug!(error = %e, %url, attempt, ?delay, "Retrying page fetch");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn fetch_once(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url).send().await?.error_for_status()?;
        let final_url = response.url().to_string();
        let body = response.text().await?;
        Ok(FetchedPage { body, final_url })
    }
}

/// `base * 2^attempt`, saturating instead of overflowing.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2u32.saturating_pow(attempt))
}
