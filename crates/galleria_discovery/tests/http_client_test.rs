//! Tests for the HTTP client's failure handling.

use async_trait::async_trait;
use galleria_cache::DiscoveryCacheConfig;
use galleria_core::{SourceCoordinates, StrategyKind};
use galleria_discovery::strategies::{ListingStrategy, ManifestStrategy};
use galleria_discovery::{
    DiscoveryConfig, DiscoveryErrorKind, DiscoveryResult, ExistenceProbe, HttpClient,
    RemoteDiscoveryEngine, RemoteFetcher, fetch_with_retry,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;

/// Accepts connections and never writes a byte. Returns its base URL.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}", addr)
}

#[tokio::test]
async fn test_unreachable_host_reads_as_absent() {
    let client = HttpClient::new(&DiscoveryConfig::default()).unwrap();

    // Nothing listens on the discard port locally.
    assert!(!client.probe("http://127.0.0.1:9/cat.png").await);
}

#[tokio::test]
async fn test_probe_respects_deadline() {
    let config = DiscoveryConfig::default().with_probe_timeout_ms(200);
    let client = HttpClient::new(&config).unwrap();

    // Non-routable address: the connection hangs until the deadline.
    let started = Instant::now();
    assert!(!client.probe("http://10.255.255.1/cat.png").await);
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_fetch_from_silent_host_times_out_as_unavailable() {
    let base = silent_server().await;
    let config = DiscoveryConfig::default().with_fetch_timeout_ms(200);
    let client = HttpClient::new(&config).unwrap();

    let started = Instant::now();
    let err = client
        .fetch_text(&format!("{}/repos/octo/gallery/contents/images", base))
        .await
        .unwrap_err();

    assert!(matches!(err.kind, DiscoveryErrorKind::NetworkUnavailable(_)));
    assert!(err.is_transient());
    assert!(started.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_retried_fetch_from_silent_host_still_ends() {
    let base = silent_server().await;
    let config = DiscoveryConfig::default().with_fetch_timeout_ms(150);
    let client = HttpClient::new(&config).unwrap();

    let started = Instant::now();
    let result = fetch_with_retry(&client, &format!("{}/list", base), 2, 1).await;

    assert!(result.is_err());
    assert!(started.elapsed() < Duration::from_secs(3));
}

/// Listing requests go to a real client; manifests come from memory.
struct SilentListing {
    client: HttpClient,
    api_base: String,
}

#[async_trait]
impl RemoteFetcher for SilentListing {
    async fn fetch_text(&self, url: &str) -> DiscoveryResult<Option<String>> {
        if url.starts_with(&self.api_base) {
            return self.client.fetch_text(url).await;
        }
        Ok(url.ends_with("_files.txt").then(|| "cat.jpg\n".to_string()))
    }
}

struct Everything;

#[async_trait]
impl ExistenceProbe for Everything {
    async fn probe(&self, _url: &str) -> bool {
        true
    }
}

#[tokio::test]
async fn test_hung_listing_falls_back_to_manifest() {
    let api_base = silent_server().await;
    let config = DiscoveryConfig::default()
        .with_api_base(api_base.clone())
        .with_raw_base("https://raw.test".to_string())
        .with_fetch_timeout_ms(200)
        .with_scan_attempts(1);
    let fetcher = SilentListing {
        client: HttpClient::new(&config).unwrap(),
        api_base,
    };
    let engine = RemoteDiscoveryEngine::with_strategies(
        config,
        DiscoveryCacheConfig::default(),
        Arc::new(fetcher),
        Arc::new(Everything),
        vec![Box::new(ListingStrategy), Box::new(ManifestStrategy)],
    );
    let coords = SourceCoordinates::builder()
        .owner("octo")
        .repo("gallery")
        .build()
        .unwrap();

    let records = tokio::time::timeout(Duration::from_secs(5), engine.discover(&coords))
        .await
        .expect("discovery must not hang on a silent listing host")
        .unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "cat.jpg");
    assert_eq!(records[0].strategy(), Some(StrategyKind::Manifest));
}
