//! HTTP access for discovery: document fetches and existence probes.

use crate::{DiscoveryConfig, DiscoveryResult, ExistenceProbe, with_cache_buster};
use async_trait::async_trait;
use galleria_error::{DiscoveryError, DiscoveryErrorKind, GalleriaResult, HttpError};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use tokio_retry2::strategy::{ExponentialBackoff, jitter};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, instrument, warn};

/// Longest pause between two fetch attempts.
const MAX_RETRY_DELAY: Duration = Duration::from_secs(10);

/// Fetches small text documents (listings and manifests).
#[async_trait]
pub trait RemoteFetcher: Send + Sync {
    /// Body of `url` on a success status, `None` on any other status.
    ///
    /// Errors only when the host could not be reached at all.
    async fn fetch_text(&self, url: &str) -> DiscoveryResult<Option<String>>;
}

/// Fetch a document, retrying while the host is unreachable.
///
/// `attempts` counts the first try. A non-success status is an answer, not a
/// failure, and is returned without retrying.
pub async fn fetch_with_retry<F>(
    fetcher: &F,
    url: &str,
    attempts: u32,
    backoff_ms: u64,
) -> DiscoveryResult<Option<String>>
where
    F: RemoteFetcher + ?Sized,
{
    let retries = attempts.saturating_sub(1) as usize;
    let strategy = ExponentialBackoff::from_millis(backoff_ms.max(1))
        .factor(2)
        .max_delay(MAX_RETRY_DELAY)
        .map(jitter)
        .take(retries);

    Retry::spawn(strategy, || async move {
        match fetcher.fetch_text(url).await {
            Ok(body) => Ok(body),
            Err(e) if e.is_transient() => {
                warn!(url, error = %e, "Fetch failed, will retry");
                Err(RetryError::Transient {
                    err: e,
                    retry_after: None,
                })
            }
            Err(e) => Err(RetryError::Permanent(e)),
        }
    })
    .await
}

/// reqwest-backed fetcher and probe sharing one connection pool.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    probe_timeout: Duration,
    fetch_timeout: Duration,
}

impl HttpClient {
    /// Build a client from discovery settings.
    pub fn new(config: &DiscoveryConfig) -> GalleriaResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent().as_str())
            .build()
            .map_err(|e| HttpError::new(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self {
            client,
            probe_timeout: config.probe_timeout(),
            fetch_timeout: config.fetch_timeout(),
        })
    }
}

#[async_trait]
impl RemoteFetcher for HttpClient {
    #[instrument(skip(self))]
    async fn fetch_text(&self, url: &str) -> DiscoveryResult<Option<String>> {
        match tokio::time::timeout(self.fetch_timeout, self.get_text(url)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(url, timeout = ?self.fetch_timeout, "Fetch timed out");
                Err(DiscoveryError::new(DiscoveryErrorKind::NetworkUnavailable(format!(
                    "no answer from {} within {:?}",
                    url, self.fetch_timeout
                ))))
            }
        }
    }
}

impl HttpClient {
    /// GET without a deadline; `fetch_text` bounds it.
    async fn get_text(&self, url: &str) -> DiscoveryResult<Option<String>> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github.v3+json, application/json, text/plain, */*")
            .send()
            .await
            .map_err(|e| {
                DiscoveryError::new(DiscoveryErrorKind::NetworkUnavailable(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            debug!(status = status.as_u16(), "Fetch answered without content");
            return Ok(None);
        }

        let body = response.text().await.map_err(|e| {
            DiscoveryError::new(DiscoveryErrorKind::NetworkUnavailable(e.to_string()))
        })?;
        debug!(bytes = body.len(), "Fetched document");
        Ok(Some(body))
    }
}

#[async_trait]
impl ExistenceProbe for HttpClient {
    async fn probe(&self, url: &str) -> bool {
        let target = with_cache_buster(url, chrono::Utc::now().timestamp_millis());
        let request = self.client.head(&target).send();

        let response = match tokio::time::timeout(self.probe_timeout, request).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                debug!(url, error = %e, "Probe failed");
                return false;
            }
            Err(_) => {
                debug!(url, timeout = ?self.probe_timeout, "Probe timed out");
                return false;
            }
        };

        let is_image = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.trim().to_ascii_lowercase().starts_with("image/"));

        let found = response.status().is_success() && is_image;
        debug!(url, status = response.status().as_u16(), found, "Probed");
        found
    }
}
