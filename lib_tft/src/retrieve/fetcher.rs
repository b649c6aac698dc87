//! # HTTP Fetcher
//!
//! A thin wrapper around one shared `reqwest::Client`.
//!
//! `fetch_text` never gives up: every failure (connection error, timeout,
//! non-2xx status) is logged, followed by a fixed cooldown and the same
//! request again. It is driven by a periodic loop, so eventual success matters
//! more than failing fast. The only way out besides success is cancellation.

use std::time::Duration;

use reqwest::header::ACCEPT;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

/// Errors returned by the fetcher.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    /// A one-shot request failed.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    /// The fetch was abandoned because shutdown was requested.
    #[error("fetch cancelled")]
    Cancelled,
}

/// Tunables for the fetcher.
#[derive(Debug, Clone)]
pub struct FetcherOptions {
    /// Wait between two attempts of the same request.
    pub cooldown: Duration,
    /// Per-request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            cooldown: Duration::from_secs(120),
            timeout: Duration::from_secs(30),
            user_agent: concat!("tft-bot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// # Fetcher
///
/// Cheap to share behind an `Arc`; the inner client pools connections.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: reqwest::Client,
    cooldown: Duration,
}

impl Fetcher {
    /// Creates a fetcher from `options`.
    pub fn new(options: FetcherOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(options.timeout)
            .user_agent(options.user_agent)
            .build()
            .map_err(FetchError::Build)?;

        Ok(Self {
            client,
            cooldown: options.cooldown,
        })
    }

    async fn get_once(&self, url: &str) -> Result<String, reqwest::Error> {
        self.client.get(url).send().await?.error_for_status()?.text().await
    }

    /// GETs `url` and returns the body, retrying until it succeeds or `cancel`
    /// fires.
    pub async fn fetch_text(&self, url: &str, cancel: &CancellationToken) -> Result<String, FetchError> {
        let mut attempt: u64 = 0;

        loop {
            if cancel.is_cancelled() {
                return Err(FetchError::Cancelled);
            }
            attempt += 1;

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                result = self.get_once(url) => result,
            };

            match result {
                Ok(body) => {
                    log::debug!("Fetched {} ({} bytes, attempt {})", url, body.len(), attempt);
                    return Ok(body);
                }
                Err(e) => {
                    log::error!(
                        "Bad response from {} (attempt {}): {}. Retrying in {:?}",
                        url,
                        attempt,
                        e,
                        self.cooldown
                    );
                }
            }

            tokio::select! {
                _ = cancel.cancelled() => return Err(FetchError::Cancelled),
                _ = sleep(self.cooldown) => {}
            }
        }
    }

    /// POSTs `form` url-encoded to `url` and decodes the JSON answer.
    ///
    /// Single attempt; the caller decides what a failure means.
    pub async fn post_form_json<F>(&self, url: &str, form: &F) -> Result<Value, FetchError>
    where
        F: Serialize + ?Sized,
    {
        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .form(form)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json::<Value>().await?)
    }
}
