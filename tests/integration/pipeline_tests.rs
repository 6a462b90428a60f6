//! Integration tests for the ingestion pipeline
//!
//! These tests use wiremock to serve listing pages and assets and run the
//! coordinator end-to-end with a counting compressor in place of mutool.

use reqwest::Client;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use wande_chef::catalog::ResourceKind;
use wande_chef::config::Config;
use wande_chef::crawler::{Coordinator, Fetcher};
use wande_chef::transcode::{Cache, CompressError, CompressOptions, Compressor, TranscodeGate};
use wande_chef::tree::{Channel, FileRef};
use wande_chef::ChefError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SIZE_LIMIT: u64 = 32;

const DOCUMENT_LISTING: &str = r#"<html><body>
<a href="/docs/big.pdf" data-cat4="ENG" data-label="Big Book" data-cat1="Maths Workbooks" data-cat2="Grade 1" data-cat3="Term 1">Big</a>
<a href="/docs/guide.pdf" data-cat4="ENG" data-label="Guide" data-cat1="Teaching Guides" data-cat2="General" data-cat3="All">Guide</a>
<a href="/docs/guide.pdf" data-cat4="ENG" data-label="Guide Again" data-cat1="Teaching Guides" data-cat2="General" data-cat3="All">Guide</a>
<a href="/docs/sounds.pdf" data-cat4="ENG" data-label="Sounds" data-cat1="Phonics Resources" data-cat2="Grade 1" data-cat3="All">Sounds</a>
<a href="/docs/isixhosa.pdf" data-cat4="XHO" data-label="Incwadi" data-cat1="Maths" data-cat2="Grade 1" data-cat3="All">Incwadi</a>
<a href="/docs/missing.pdf" data-cat4="ENG" data-label="Lost" data-cat1="Maths" data-cat2="Grade 2" data-cat3="All">Lost</a>
</body></html>"#;

const VIDEO_LISTING: &str = r#"<html><body>
<button data-cat4="ENG" onclick="playVideo('/videos/counting.mp4')" data-label="Counting" data-cat1="Maths" data-cat2="Grade 1" data-cat3="All">Play</button>
<button data-cat4="ENG" onclick="playVideo('/videos/intro.mp4')" data-label="Intro" data-cat1="Reading for Meaning Course" data-cat2="Module 1" data-cat3="All">Play</button>
<button data-cat4="ENG" onclick="openNotes('/videos/notes.pdf')" data-label="Notes" data-cat1="Maths" data-cat2="Grade 1" data-cat3="All">Notes</button>
</body></html>"#;

/// Counts calls and writes a fixed small output
#[derive(Default)]
struct CountingCompressor {
    calls: AtomicUsize,
}

impl Compressor for CountingCompressor {
    fn compress(
        &self,
        _source: &Path,
        destination: &Path,
        _options: &CompressOptions,
    ) -> Result<(), CompressError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        std::fs::write(destination, b"compact")?;
        Ok(())
    }
}

fn dir_string(dir: &TempDir, name: &str) -> String {
    dir.path().join(name).to_string_lossy().into_owned()
}

/// Creates a test configuration pointing at the mock server and a scratch dir
fn create_test_config(origin: &str, dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.source.origin = origin.to_string();
    config.fetcher.max_attempts = 2;
    config.fetcher.backoff_unit_ms = 5;
    config.fetcher.timeout_secs = 5;
    config.transcode.size_limit_bytes = SIZE_LIMIT;
    config.cache.raw_dir = dir_string(dir, "raw");
    config.cache.compressed_dir = dir_string(dir, "compressed");
    config.output.manifest_path = dir_string(dir, "channel.json");
    config.output.summary_path = dir_string(dir, "summary.md");
    config
}

fn create_coordinator(config: Config, compressor: Arc<CountingCompressor>) -> Coordinator {
    let fetcher = Fetcher::new(
        Client::new(),
        config.fetcher.max_attempts,
        Duration::from_millis(config.fetcher.backoff_unit_ms),
        Duration::from_secs(config.fetcher.timeout_secs),
    );
    let gate = TranscodeGate::new(
        Cache::from_config(&config.cache),
        fetcher.clone(),
        compressor,
        config.transcode.size_limit_bytes,
    );
    Coordinator::with_gate(config, fetcher, gate).unwrap()
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

async fn mount_asset(server: &MockServer, route: &str, size: usize, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![b'x'; size]))
        .expect(expected)
        .mount(server)
        .await;
}

/// Serves both listings plus the English document assets
async fn start_site(document_downloads: u64) -> MockServer {
    let server = MockServer::start().await;

    mount_page(&server, "/learning-resources", DOCUMENT_LISTING).await;
    mount_page(&server, "/video-resources", VIDEO_LISTING).await;
    mount_asset(&server, "/docs/big.pdf", 64, document_downloads).await;
    mount_asset(&server, "/docs/guide.pdf", 8, document_downloads).await;
    mount_asset(&server, "/docs/sounds.pdf", 8, 0).await;
    mount_asset(&server, "/docs/isixhosa.pdf", 8, 0).await;

    Mock::given(method("GET"))
        .and(path("/docs/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    server
}

fn leaf_titles(channel: &Channel) -> Vec<String> {
    channel.leaves().iter().map(|leaf| leaf.title.clone()).collect()
}

#[tokio::test]
async fn test_full_run_builds_tree() {
    let server = start_site(1).await;
    let dir = TempDir::new().unwrap();
    let compressor = Arc::new(CountingCompressor::default());
    let config = create_test_config(&server.uri(), &dir);

    let channel = create_coordinator(config, Arc::clone(&compressor))
        .run(false)
        .await
        .unwrap();

    // Topics in discovery order, documents first, aliases folded
    let topics: Vec<_> = channel.children.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(
        topics,
        vec!["Maths", "Teaching Guides", "Reading for Meaning Course"]
    );

    // Maths splits by grade; the 404 document never creates a Grade 2 node
    let maths = channel.topic("Maths").unwrap();
    let grades: Vec<_> = maths.subtopics().map(|t| t.title.as_str()).collect();
    assert_eq!(grades, vec!["Grade 1"]);
    let grade_one: Vec<_> = maths.leaves().iter().map(|l| l.kind).collect();
    assert_eq!(grade_one, vec![ResourceKind::Document, ResourceKind::Video]);

    let titles = leaf_titles(&channel);
    assert!(titles.contains(&"Term 1 - Big Book".to_string()));
    assert!(titles.contains(&"Module 1: Intro".to_string()));
    assert!(!titles.iter().any(|t| t.contains("Sounds")));
    assert!(!titles.iter().any(|t| t.contains("Incwadi")));
    assert!(!titles.iter().any(|t| t.contains("Notes")));
    assert!(!titles.iter().any(|t| t.contains("Guide Again")));

    // Only the oversized document went through the engine
    assert_eq!(compressor.calls.load(Ordering::SeqCst), 1);
    let compressed = dir
        .path()
        .join("compressed")
        .join("Maths-Grade_1-Term_1-Big_Book_id.pdf");
    assert_eq!(std::fs::read(&compressed).unwrap(), b"compact");
    let guide = dir
        .path()
        .join("compressed")
        .join("Teaching_Guides-General-All-Guide_id.pdf");
    assert_eq!(std::fs::read(&guide).unwrap().len(), 8);

    // Videos stay remote
    let video = channel
        .leaves()
        .into_iter()
        .find(|l| l.title == "Counting")
        .unwrap();
    assert_eq!(
        video.file,
        FileRef::Url(format!("{}/videos/counting.mp4", server.uri()))
    );

    // Published outputs
    let manifest = std::fs::read_to_string(dir.path().join("channel.json")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    assert_eq!(json["children"][0]["source_id"], "Maths_id");
    let summary = std::fs::read_to_string(dir.path().join("summary.md")).unwrap();
    assert!(summary.contains("| Maths | 1 | 1 | 1 |"));

    server.verify().await;
}

#[tokio::test]
async fn test_rerun_reuses_cache() {
    // Each document is downloaded exactly once across both runs
    let server = start_site(1).await;
    let dir = TempDir::new().unwrap();
    let compressor = Arc::new(CountingCompressor::default());

    let first = create_coordinator(create_test_config(&server.uri(), &dir), Arc::clone(&compressor))
        .run(false)
        .await
        .unwrap();
    let second = create_coordinator(create_test_config(&server.uri(), &dir), Arc::clone(&compressor))
        .run(false)
        .await
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(compressor.calls.load(Ordering::SeqCst), 1);
    server.verify().await;
}

#[tokio::test]
async fn test_dry_run_downloads_and_publishes_nothing() {
    let server = start_site(0).await;
    let dir = TempDir::new().unwrap();
    let compressor = Arc::new(CountingCompressor::default());
    let config = create_test_config(&server.uri(), &dir);

    let channel = create_coordinator(config, Arc::clone(&compressor))
        .run(true)
        .await
        .unwrap();

    // The 404 document is still planned, since nothing was fetched
    let maths = channel.topic("Maths").unwrap();
    assert_eq!(maths.subtopics().count(), 2);

    assert_eq!(compressor.calls.load(Ordering::SeqCst), 0);
    assert!(!dir.path().join("channel.json").exists());
    assert!(!dir.path().join("summary.md").exists());
    server.verify().await;
}

#[tokio::test]
async fn test_unavailable_video_listing_yields_documents_only() {
    let server = MockServer::start().await;
    mount_page(&server, "/learning-resources", DOCUMENT_LISTING).await;
    mount_asset(&server, "/docs/big.pdf", 64, 1).await;
    mount_asset(&server, "/docs/guide.pdf", 8, 1).await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);

    let channel = create_coordinator(config, Arc::new(CountingCompressor::default()))
        .run(false)
        .await
        .unwrap();

    let topics: Vec<_> = channel.children.iter().map(|t| t.title.as_str()).collect();
    assert_eq!(topics, vec!["Maths", "Teaching Guides"]);
    assert!(channel
        .leaves()
        .iter()
        .all(|leaf| leaf.kind == ResourceKind::Document));
}

#[tokio::test]
async fn test_missing_attribute_aborts_run() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/learning-resources",
        r#"<a href="/docs/a.pdf" data-cat4="ENG" data-label="A" data-cat2="Grade 1" data-cat3="All">A</a>"#,
    )
    .await;
    mount_page(&server, "/video-resources", VIDEO_LISTING).await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);

    let result = create_coordinator(config, Arc::new(CountingCompressor::default()))
        .run(false)
        .await;

    match result {
        Err(ChefError::MissingAttribute { attribute, .. }) => assert_eq!(attribute, "data-cat1"),
        other => panic!("expected a missing attribute error, got {:?}", other.map(|_| ())),
    }
    assert!(!dir.path().join("channel.json").exists());
}

#[tokio::test]
async fn test_failed_graded_document_keeps_grade_split() {
    let server = MockServer::start().await;
    mount_page(
        &server,
        "/learning-resources",
        r#"<html><body>
<a href="/docs/g1.pdf" data-cat4="ENG" data-label="Counters" data-cat1="Maths" data-cat2="Grade 1" data-cat3="All">G1</a>
<a href="/docs/g2.pdf" data-cat4="ENG" data-label="Shapes" data-cat1="Maths" data-cat2="Grade 2" data-cat3="All">G2</a>
</body></html>"#,
    )
    .await;
    mount_page(&server, "/video-resources", "<html><body></body></html>").await;
    mount_asset(&server, "/docs/g2.pdf", 8, 1).await;
    Mock::given(method("GET"))
        .and(path("/docs/g1.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = create_test_config(&server.uri(), &dir);

    let channel = create_coordinator(config, Arc::new(CountingCompressor::default()))
        .run(false)
        .await
        .unwrap();

    // The first Maths document is gone, but Maths still splits by grade
    let maths = channel.topic("Maths").unwrap();
    let grades: Vec<_> = maths.subtopics().map(|t| t.title.as_str()).collect();
    assert_eq!(grades, vec!["Grade 2"]);
    assert_eq!(maths.contents().count(), 0);
    assert_eq!(leaf_titles(&channel), vec!["Shapes".to_string()]);
    server.verify().await;
}
