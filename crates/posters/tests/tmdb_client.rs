//! Tests for the poster client against local mock metadata services.

use posters::{PlaceholderPosters, PosterConfig, PosterError, PosterLookup, TmdbPosterClient};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

const PLACEHOLDER: &str = "https://placeholder.test/none.png";

// ============================================================================
// Mock Metadata Service
// ============================================================================

/// Serve one canned HTTP response and report the request line it received
async fn start_mock_service(
    status: &'static str,
    body: &'static str,
) -> (String, oneshot::Receiver<String>, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock metadata service");
    let addr = listener.local_addr().expect("Failed to get local address");
    let (tx, rx) = oneshot::channel();

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept failed");

        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = socket.read(&mut buf).await.expect("read failed");
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let request = String::from_utf8_lossy(&request);
        let request_line = request.lines().next().unwrap_or_default().to_string();
        let _ = tx.send(request_line);

        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        socket
            .write_all(response.as_bytes())
            .await
            .expect("write failed");
        let _ = socket.shutdown().await;
    });

    (format!("http://{}", addr), rx, handle)
}

/// Accept connections and never answer them
async fn start_silent_service() -> (String, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind silent service");
    let addr = listener.local_addr().expect("Failed to get local address");

    let handle = tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    (format!("http://{}", addr), handle)
}

fn build_client(api_url: &str, timeout: Duration) -> TmdbPosterClient {
    let config = PosterConfig::new("test-key")
        .with_api_url(api_url)
        .with_image_url("https://images.test")
        .with_placeholder_url(PLACEHOLDER)
        .with_timeout(timeout);
    TmdbPosterClient::new(config).expect("Failed to build poster client")
}

// ============================================================================
// Tests
// ============================================================================

#[tokio::test]
async fn test_fetch_poster_success() {
    let (addr, request_rx, handle) =
        start_mock_service("200 OK", r#"{"id": 19995, "poster_path": "/avatar.jpg"}"#).await;
    let client = build_client(&addr, Duration::from_secs(2));

    let url = client.fetch_poster(19995).await.expect("fetch failed");
    assert_eq!(url, "https://images.test/t/p/w500/avatar.jpg");

    let request_line = request_rx.await.expect("no request captured");
    assert!(request_line.starts_with("GET /movie/19995?"), "{}", request_line);
    assert!(request_line.contains("api_key=test-key"));
    assert!(request_line.contains("language=en-US"));

    handle.abort();
}

#[tokio::test]
async fn test_non_200_maps_to_placeholder() {
    let (addr, _rx, handle) =
        start_mock_service("404 Not Found", r#"{"status_code": 34}"#).await;
    let client = build_client(&addr, Duration::from_secs(2));

    let err = client.fetch_poster(1).await.unwrap_err();
    assert!(matches!(err, PosterError::Status { status: 404, .. }));

    handle.abort();
}

#[tokio::test]
async fn test_missing_poster_path_uses_placeholder() {
    let (addr, _rx, handle) =
        start_mock_service("200 OK", r#"{"id": 7, "poster_path": null}"#).await;
    let client = build_client(&addr, Duration::from_secs(2));

    assert_eq!(client.poster_url(7).await, PLACEHOLDER);

    handle.abort();
}

#[tokio::test]
async fn test_malformed_body_uses_placeholder() {
    let (addr, _rx, handle) = start_mock_service("200 OK", "not json").await;
    let client = build_client(&addr, Duration::from_secs(2));

    assert_eq!(client.poster_url(7).await, PLACEHOLDER);

    handle.abort();
}

#[tokio::test]
async fn test_timeout_uses_placeholder() {
    let (addr, handle) = start_silent_service().await;
    let client = build_client(&addr, Duration::from_millis(200));

    let err = client.fetch_poster(42).await.unwrap_err();
    assert!(matches!(err, PosterError::Timeout(42)), "{:?}", err);
    assert_eq!(client.poster_url(42).await, PLACEHOLDER);

    handle.abort();
}

#[tokio::test]
async fn test_refused_connection_uses_placeholder() {
    // Bind then drop to get a port with nothing listening
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let client = build_client(&addr, Duration::from_secs(2));
    assert_eq!(client.poster_url(1).await, PLACEHOLDER);
}

#[tokio::test]
async fn test_placeholder_posters() {
    let lookup = PlaceholderPosters::new(PLACEHOLDER);
    assert_eq!(lookup.poster_url(19995).await, PLACEHOLDER);
    assert_eq!(lookup.placeholder_url(), PLACEHOLDER);
}
