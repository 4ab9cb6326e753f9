//! Tests for the discovery chain against a scripted web.

use async_trait::async_trait;
use galleria_cache::DiscoveryCacheConfig;
use galleria_core::{SourceCoordinates, StrategyKind, is_sorted_descending};
use galleria_discovery::{
    DiscoveryConfig, DiscoveryConfigBuilder, DiscoveryError, DiscoveryErrorKind, DiscoveryResult,
    ExistenceProbe, RemoteDiscoveryEngine, RemoteFetcher, SnapshotSource,
};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const LISTING: &str = "https://api.test/repos/octo/gallery/contents/images";
const FILES_TXT: &str = "https://raw.test/octo/gallery/main/images/_files.txt";
const IMAGES_JSON: &str = "https://raw.test/octo/gallery/main/images.json";

fn raw(name: &str) -> String {
    format!("https://raw.test/octo/gallery/main/images/{}", name)
}

fn pages(name: &str) -> String {
    format!("https://octo.github.io/gallery/images/{}", name)
}

fn blob(name: &str) -> String {
    format!("https://web.test/octo/gallery/raw/main/images/{}", name)
}

/// Documents and images served by a fake web, with call recording.
#[derive(Default)]
struct FakeWeb {
    documents: Mutex<HashMap<String, String>>,
    images: Mutex<HashSet<String>>,
    offline: AtomicBool,
    latency: Option<Duration>,
    fetches: Mutex<Vec<String>>,
    probes: Mutex<Vec<String>>,
}

impl FakeWeb {
    fn serve(self, url: &str, body: &str) -> Self {
        self.documents
            .lock()
            .unwrap()
            .insert(url.to_string(), body.to_string());
        self
    }

    fn image(self, url: impl Into<String>) -> Self {
        self.images.lock().unwrap().insert(url.into());
        self
    }

    fn go_offline(&self) {
        self.offline.store(true, Ordering::SeqCst);
    }

    fn fetch_count(&self, url: &str) -> usize {
        self.fetches.lock().unwrap().iter().filter(|u| *u == url).count()
    }

    fn probe_count(&self) -> usize {
        self.probes.lock().unwrap().len()
    }
}

#[async_trait]
impl RemoteFetcher for FakeWeb {
    async fn fetch_text(&self, url: &str) -> DiscoveryResult<Option<String>> {
        self.fetches.lock().unwrap().push(url.to_string());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(DiscoveryError::new(DiscoveryErrorKind::NetworkUnavailable(
                "offline".into(),
            )));
        }
        Ok(self.documents.lock().unwrap().get(url).cloned())
    }
}

#[async_trait]
impl ExistenceProbe for FakeWeb {
    async fn probe(&self, url: &str) -> bool {
        self.probes.lock().unwrap().push(url.to_string());
        !self.offline.load(Ordering::SeqCst) && self.images.lock().unwrap().contains(url)
    }
}

fn config() -> DiscoveryConfig {
    DiscoveryConfigBuilder::default()
        .api_base("https://api.test")
        .raw_base("https://raw.test")
        .web_base("https://web.test")
        .scan_attempts(1u32)
        .retry_backoff_ms(1u64)
        .candidate_limit(40usize)
        .build()
        .unwrap()
}

fn coords() -> SourceCoordinates {
    SourceCoordinates::builder()
        .owner("octo")
        .repo("gallery")
        .build()
        .unwrap()
}

fn engine(web: Arc<FakeWeb>, config: DiscoveryConfig) -> RemoteDiscoveryEngine {
    RemoteDiscoveryEngine::new(config, DiscoveryCacheConfig::default(), web.clone(), web)
}

fn names(records: &[galleria_core::ImageRecord]) -> Vec<&str> {
    records.iter().map(|r| r.name().as_str()).collect()
}

const LISTING_BODY: &str = r#"[
    {"name": "apple.png", "type": "file", "size": 10, "sha": "s1", "download_url": "https://dl.test/apple.png"},
    {"name": "Zebra.jpg", "type": "file", "size": 20, "sha": "s2", "download_url": null},
    {"name": "notes.txt", "type": "file", "size": 5, "sha": "s3"},
    {"name": "thumbs", "type": "dir", "sha": "s4"},
    {"name": "mango.webp", "type": "file", "size": 30, "sha": "s5"}
]"#;

#[tokio::test]
async fn test_listing_success_short_circuits_chain() {
    let web = Arc::new(FakeWeb::default().serve(LISTING, LISTING_BODY));
    let engine = engine(web.clone(), config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["Zebra.jpg", "mango.webp", "apple.png"]);
    assert!(records.iter().all(|r| r.strategy() == Some(StrategyKind::Listing)));
    assert_eq!(records[2].key(), "s1");
    assert_eq!(records[2].display_source(), "https://dl.test/apple.png");
    assert_eq!(records[0].display_source(), raw("Zebra.jpg"));
    assert_eq!(*records[1].size_bytes(), Some(30));

    assert_eq!(web.fetch_count(FILES_TXT), 0);
    assert_eq!(web.probe_count(), 0);
}

#[tokio::test]
async fn test_manifest_used_when_listing_unavailable() {
    let web = Arc::new(
        FakeWeb::default()
            .serve(FILES_TXT, "# images\ncat.jpg\ndog.png https://cdn.test/dog.png\nmissing.gif\nreadme.md\n")
            .image(pages("cat.jpg"))
            .image("https://cdn.test/dog.png"),
    );
    let engine = engine(web.clone(), config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["dog.png", "cat.jpg"]);
    assert_eq!(records[0].display_source(), "https://cdn.test/dog.png");
    assert_eq!(records[1].display_source(), pages("cat.jpg"));
    assert!(records.iter().all(|r| r.strategy() == Some(StrategyKind::Manifest)));
    // The first manifest that answers wins; later locations are never fetched.
    assert_eq!(web.fetch_count(IMAGES_JSON), 0);
}

#[tokio::test]
async fn test_json_manifest_location() {
    let web = Arc::new(
        FakeWeb::default()
            .serve(IMAGES_JSON, r#"["b.png", {"name": "a.png", "size": 4}]"#)
            .image(raw("a.png"))
            .image(raw("b.png")),
    );
    let engine = engine(web, config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["b.png", "a.png"]);
    assert_eq!(*records[1].size_bytes(), Some(4));
}

#[tokio::test]
async fn test_manifest_entries_that_never_probe_are_dropped() {
    let web = Arc::new(
        FakeWeb::default()
            .serve(FILES_TXT, "a.png\nb.png\n")
            .image(raw("a.png")),
    );
    let engine = engine(web.clone(), config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["a.png"]);
    assert_eq!(records[0].strategy(), Some(StrategyKind::Manifest));
    assert!(web.probes.lock().unwrap().iter().any(|u| u.contains("b.png")));
}

#[tokio::test]
async fn test_endpoint_probe_against_pages_mirror() {
    let web = Arc::new(
        FakeWeb::default()
            .image(pages("logo.png"))
            .image(pages("cat.jpg")),
    );
    let engine = engine(web, config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["logo.png", "cat.jpg"]);
    assert!(records.iter().all(|r| r.strategy() == Some(StrategyKind::EndpointProbe)));
}

#[tokio::test]
async fn test_endpoint_probe_falls_back_to_raw_host() {
    let web = Arc::new(
        FakeWeb::default()
            .image(raw("logo.png"))
            .image(pages("cat.jpg")),
    );
    let engine = engine(web.clone(), config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["logo.png", "cat.jpg"]);
    assert!(records.iter().all(|r| r.strategy() == Some(StrategyKind::EndpointProbe)));
    assert_eq!(records[0].display_source(), raw("logo.png"));
    assert_eq!(records[1].display_source(), pages("cat.jpg"));

    // The mirror is asked first; the raw host only when the mirror misses.
    let probes = web.probes.lock().unwrap();
    let mirror = probes.iter().position(|u| *u == pages("logo.png")).unwrap();
    let raw_host = probes.iter().position(|u| *u == raw("logo.png")).unwrap();
    assert!(mirror < raw_host);
    assert!(!probes.contains(&raw("cat.jpg")));
}

#[tokio::test]
async fn test_brute_probe_finds_generated_name() {
    // Listing unavailable, no manifest, nothing on the mirror's short list.
    let web = Arc::new(FakeWeb::default().image(raw("photo_large.jpg")));
    let engine = engine(web, config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name(), "photo_large.jpg");
    assert_eq!(records[0].display_source(), raw("photo_large.jpg"));
    assert_eq!(records[0].strategy(), Some(StrategyKind::BruteProbe));
}

#[tokio::test]
async fn test_brute_probe_falls_through_endpoints() {
    let web = Arc::new(FakeWeb::default().image(blob("image_large.png")));
    let engine = engine(
        web,
        config().with_candidate_limit(200).with_probe_concurrency(4),
    );

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["image_large.png"]);
    assert_eq!(records[0].display_source(), blob("image_large.png"));
}

#[tokio::test]
async fn test_brute_probe_stops_at_max_images() {
    let web = FakeWeb::default()
        .image(raw("photo.jpeg"))
        .image(raw("photo1.jpeg"))
        .image(raw("photo2.jpeg"));
    let web = Arc::new(web);
    let engine = engine(web.clone(), config().with_max_images(2));

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(names(&records), vec!["photo1.jpeg", "photo.jpeg"]);
    // photo2.jpeg comes right after and was never reached.
    assert!(!web.probes.lock().unwrap().contains(&raw("photo2.jpeg")));
}

#[tokio::test]
async fn test_exhausted_chain_is_not_found() {
    let web = Arc::new(FakeWeb::default());
    let engine = engine(web.clone(), config());

    let err = engine.discover(&coords()).await.unwrap_err();

    assert_eq!(
        err.discovery_kind(),
        Some(&DiscoveryErrorKind::NotFound {
            confirmed_empty: false
        })
    );
    assert!(engine.cached(&coords()).is_none());
    // Every fallback ran.
    assert!(web.probe_count() > 0);
}

#[tokio::test]
async fn test_empty_listing_confirms_empty_folder() {
    let body = r#"[{"name": "readme.md", "type": "file", "sha": "x"}]"#;
    let web = Arc::new(FakeWeb::default().serve(LISTING, body));
    let engine = engine(web, config());

    let err = engine.discover(&coords()).await.unwrap_err();

    assert_eq!(
        err.discovery_kind(),
        Some(&DiscoveryErrorKind::NotFound {
            confirmed_empty: true
        })
    );
}

#[tokio::test]
async fn test_malformed_listing_falls_back() {
    let web = Arc::new(
        FakeWeb::default()
            .serve(LISTING, r#"{"message": "Not Found"}"#)
            .image(pages("cover.jpg")),
    );
    let engine = engine(web, config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["cover.jpg"]);
}

#[tokio::test]
async fn test_duplicate_names_collapse() {
    let body = r#"[
        {"name": "Cat.png", "type": "file", "sha": "a"},
        {"name": "cat.png", "type": "file", "sha": "b"},
        {"name": "bird.png", "type": "file", "sha": "c"}
    ]"#;
    let web = Arc::new(FakeWeb::default().serve(LISTING, body));
    let engine = engine(web, config());

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["Cat.png", "bird.png"]);
    assert_eq!(records[0].key(), "a");
    assert!(is_sorted_descending(&records));
}

#[tokio::test]
async fn test_cached_snapshot_served_until_invalidated() {
    let web = Arc::new(FakeWeb::default().serve(LISTING, LISTING_BODY));
    let engine = engine(web.clone(), config());

    engine.discover(&coords()).await.unwrap();
    engine.discover(&coords()).await.unwrap();
    assert_eq!(web.fetch_count(LISTING), 1);

    assert!(engine.invalidate(&coords()));
    engine.discover(&coords()).await.unwrap();
    assert_eq!(web.fetch_count(LISTING), 2);
}

#[tokio::test]
async fn test_concurrent_discoveries_share_one_run() {
    let web = FakeWeb {
        latency: Some(Duration::from_millis(50)),
        ..FakeWeb::default()
    };
    let web = Arc::new(web.serve(LISTING, LISTING_BODY));
    let engine = engine(web.clone(), config());
    let source = coords();

    let (first, second) = tokio::join!(engine.discover(&source), engine.discover(&source));

    assert_eq!(names(&first.unwrap()), names(&second.unwrap()));
    assert_eq!(web.fetch_count(LISTING), 1);
}

#[tokio::test]
async fn test_revalidate_prefers_fresh_snapshot() {
    let web = Arc::new(FakeWeb::default().serve(LISTING, LISTING_BODY));
    let engine = engine(web.clone(), config());
    engine.discover(&coords()).await.unwrap();

    let updated = r#"[{"name": "new.png", "type": "file", "sha": "n"}]"#;
    web.documents
        .lock()
        .unwrap()
        .insert(LISTING.to_string(), updated.to_string());

    let revalidation = engine.revalidate(&coords());
    assert_eq!(revalidation.stale().map(|s| s.len()), Some(3));

    let snapshot = revalidation.settle().await.unwrap();
    assert_eq!(snapshot.source, SnapshotSource::Fresh);
    assert_eq!(names(&snapshot.records), vec!["new.png"]);
    assert_eq!(engine.cached(&coords()).map(|r| r.len()), Some(1));
}

#[tokio::test]
async fn test_stale_snapshot_is_ready_before_slow_refresh_settles() {
    let web = FakeWeb {
        latency: Some(Duration::from_millis(300)),
        ..FakeWeb::default()
    }
    .serve(LISTING, LISTING_BODY);
    let web = Arc::new(web);
    let engine = engine(web.clone(), config());
    engine.discover(&coords()).await.unwrap();

    let revalidation = engine.revalidate(&coords());
    assert_eq!(revalidation.stale().map(|s| s.len()), Some(3));

    // The refresh is still waiting on the network and can be abandoned.
    let waited = tokio::time::timeout(Duration::from_millis(20), revalidation.settle()).await;
    assert!(waited.is_err());
    assert_eq!(engine.cached(&coords()).map(|r| r.len()), Some(3));
}

#[tokio::test]
async fn test_revalidate_keeps_stale_when_refresh_finds_nothing() {
    let web = Arc::new(FakeWeb::default().serve(LISTING, LISTING_BODY));
    let engine = engine(web.clone(), config());
    engine.discover(&coords()).await.unwrap();

    web.go_offline();

    let snapshot = engine.revalidate(&coords()).settle().await.unwrap();
    assert_eq!(snapshot.source, SnapshotSource::Stale);
    assert_eq!(snapshot.records.len(), 3);
}

#[tokio::test]
async fn test_revalidate_without_cache_surfaces_error() {
    let web = Arc::new(FakeWeb::default());
    let engine = engine(web, config());

    let revalidation = engine.revalidate(&coords());
    assert!(revalidation.stale().is_none());

    let err = revalidation.settle().await.unwrap_err();
    assert!(err.discovery_kind().is_some_and(|k| matches!(k, DiscoveryErrorKind::NotFound { .. })));
}

#[tokio::test]
async fn test_throttled_engine_still_discovers() {
    let web = Arc::new(FakeWeb::default().image(pages("image.jpg")));
    let engine = engine(web, config().with_probes_per_second(Some(1_000)));

    let records = engine.discover(&coords()).await.unwrap();

    assert_eq!(names(&records), vec!["image.jpg"]);
}
