//! Existence probing of candidate image URLs.

use async_trait::async_trait;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Answers whether a URL serves an image right now.
///
/// Implementations never fail: timeouts, network errors, non-success statuses
/// and non-image content types all read as "absent".
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    /// True when the URL answers success with an `image/*` content type.
    async fn probe(&self, url: &str) -> bool;
}

#[async_trait]
impl<P: ExistenceProbe + ?Sized> ExistenceProbe for Arc<P> {
    async fn probe(&self, url: &str) -> bool {
        (**self).probe(url).await
    }
}

/// Append a `t=<millis>` parameter so intermediate caches are bypassed.
///
/// ```
/// use galleria_discovery::with_cache_buster;
///
/// assert_eq!(with_cache_buster("https://x/a.png", 7), "https://x/a.png?t=7");
/// assert_eq!(with_cache_buster("https://x/a.png?v=1", 7), "https://x/a.png?v=1&t=7");
/// ```
pub fn with_cache_buster(url: &str, millis: i64) -> String {
    let separator = if url.contains('?') { '&' } else { '?' };
    format!("{url}{separator}t={millis}")
}

/// First URL in `urls` that the probe confirms, tried in order.
pub async fn probe_first<P, I, S>(probe: &P, urls: I) -> Option<String>
where
    P: ExistenceProbe + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    for url in urls {
        let url = url.into();
        if probe.probe(&url).await {
            return Some(url);
        }
    }
    None
}

/// Probe wrapper that caps the rate of outgoing probes.
pub struct ThrottledProbe<P> {
    inner: P,
    limiter: Arc<DirectRateLimiter>,
}

impl<P: ExistenceProbe> ThrottledProbe<P> {
    /// Allow at most `per_second` probes per second through to `inner`.
    pub fn new(inner: P, per_second: NonZeroU32) -> Self {
        tracing::debug!(per_second = per_second.get(), "Throttling existence probes");
        Self {
            inner,
            limiter: Arc::new(RateLimiter::direct(Quota::per_second(per_second))),
        }
    }
}

#[async_trait]
impl<P: ExistenceProbe> ExistenceProbe for ThrottledProbe<P> {
    async fn probe(&self, url: &str) -> bool {
        self.limiter.until_ready().await;
        self.inner.probe(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct Recording {
        hits: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ExistenceProbe for Recording {
        async fn probe(&self, url: &str) -> bool {
            self.calls.lock().unwrap().push(url.to_string());
            self.hits.iter().any(|hit| *hit == url)
        }
    }

    #[tokio::test]
    async fn test_probe_first_stops_at_first_hit() {
        let probe = Recording {
            hits: vec!["b", "c"],
            calls: Mutex::new(Vec::new()),
        };

        let found = probe_first(&probe, ["a", "b", "c"]).await;

        assert_eq!(found.as_deref(), Some("b"));
        assert_eq!(*probe.calls.lock().unwrap(), vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_probe_first_none() {
        let probe = Recording {
            hits: vec![],
            calls: Mutex::new(Vec::new()),
        };
        assert!(probe_first(&probe, ["a", "b"]).await.is_none());
    }

    #[tokio::test]
    async fn test_throttled_probe_delegates() {
        let probe = ThrottledProbe::new(
            Recording {
                hits: vec!["a"],
                calls: Mutex::new(Vec::new()),
            },
            NonZeroU32::new(100).unwrap(),
        );
        assert!(probe.probe("a").await);
        assert!(!probe.probe("b").await);
    }
}
