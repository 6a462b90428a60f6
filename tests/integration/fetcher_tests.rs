//! Integration tests for the fetcher
//!
//! These tests run the fetcher against wiremock servers and raw TCP stubs
//! to check the retry contract end-to-end.

use reqwest::Client;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::net::TcpListener;
use wande_chef::crawler::{backoff_delay, Fetcher};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const UNIT: Duration = Duration::from_millis(20);

fn test_fetcher(max_attempts: u32, timeout: Duration) -> Fetcher {
    Fetcher::new(Client::new(), max_attempts, UNIT, timeout)
}

/// Sum of the sleeps between `attempts` attempts
fn total_backoff(attempts: u32) -> Duration {
    (1..attempts).map(|n| backoff_delay(n, UNIT)).sum()
}

/// Accepts connections, counts them, and never answers
async fn stalled_listener() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepted = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepted);

    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            counter.fetch_add(1, Ordering::SeqCst);
            held.push(socket);
        }
    });

    (format!("http://{}/listing", addr), accepted)
}

#[tokio::test]
async fn test_success_reports_final_url_after_redirect() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/old-listing"))
        .respond_with(
            ResponseTemplate::new(301)
                .insert_header("location", format!("{}/learning-resources", mock_server.uri())),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/learning-resources"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>listing</html>"))
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(5, Duration::from_secs(5));
    let (final_url, html) = fetcher
        .fetch_page(&format!("{}/old-listing", mock_server.uri()))
        .await
        .expect("page should be fetched");

    assert_eq!(final_url.path(), "/learning-resources");
    assert_eq!(html, "<html>listing</html>");
}

#[tokio::test]
async fn test_not_found_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/missing.pdf"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(5, Duration::from_secs(5));
    let result = fetcher.get(&format!("{}/missing.pdf", mock_server.uri())).await;

    assert!(result.is_none());
    mock_server.verify().await;
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(5, Duration::from_secs(5));
    let result = fetcher.get(&format!("{}/broken", mock_server.uri())).await;

    assert!(result.is_none());
    mock_server.verify().await;
}

#[tokio::test]
async fn test_body_returned_on_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/doc.pdf"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let fetcher = test_fetcher(5, Duration::from_secs(5));
    let response = fetcher
        .get(&format!("{}/doc.pdf", mock_server.uri()))
        .await
        .unwrap();

    assert_eq!(response.status_code, 200);
    assert_eq!(response.body, b"%PDF-1.7");
}

#[tokio::test]
async fn test_timeouts_retried_until_exhausted() {
    let (url, accepted) = stalled_listener().await;
    let timeout = Duration::from_millis(100);

    let fetcher = test_fetcher(5, timeout);
    let start = Instant::now();
    let result = fetcher.get(&url).await;
    let elapsed = start.elapsed();

    assert!(result.is_none());
    assert_eq!(accepted.load(Ordering::SeqCst), 5);
    assert!(elapsed >= total_backoff(5) + timeout * 5);
}

#[tokio::test]
async fn test_single_attempt_budget() {
    let (url, accepted) = stalled_listener().await;

    let fetcher = test_fetcher(1, Duration::from_millis(100));
    assert!(fetcher.get(&url).await.is_none());

    assert_eq!(accepted.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_refused_connections_retried() {
    // Bind then drop to get a port nothing listens on
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let fetcher = test_fetcher(3, Duration::from_secs(1));
    let start = Instant::now();
    let result = fetcher.get(&format!("http://{}/", addr)).await;

    assert!(result.is_none());
    assert!(start.elapsed() >= total_backoff(3));
}
