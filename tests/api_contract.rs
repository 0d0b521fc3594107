//! The authenticated-request contract, exercised against an in-process
//! mock HTTP listener bound to an ephemeral localhost port. Each canned
//! response is served on its own connection (`connection: close`), and
//! every request the client actually sent is captured for assertions.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use fitdesk::api::{ApiClient, ApiError};
use fitdesk::auth::store::{FileTokenBackend, TokenBackend, TokenStore};

// ============================================================================
// Mock server
// ============================================================================

struct MockServer {
    addr: SocketAddr,
    hits: Arc<AtomicUsize>,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl MockServer {
    fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    fn hit_count(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    fn captured_requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

fn http_response(status: u16, reason: &str, body: &str) -> String {
    format!(
        "HTTP/1.1 {} {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    )
}

fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Serve the canned responses in order, one connection per request.
async fn spawn_mock(responses: Vec<String>) -> MockServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind 127.0.0.1:0");
    let addr = listener.local_addr().unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let queue = Arc::new(Mutex::new(VecDeque::from(responses)));

    let task_hits = Arc::clone(&hits);
    let task_requests = Arc::clone(&requests);

    let handle = tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                break;
            };

            // Read the full request: headers, then content-length body
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];
            loop {
                let Ok(n) = stream.read(&mut chunk).await else {
                    break;
                };
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                if let Some(pos) = find_subsequence(&buf, b"\r\n\r\n") {
                    let headers = String::from_utf8_lossy(&buf[..pos]).to_lowercase();
                    let body_len = headers
                        .lines()
                        .find_map(|l| l.strip_prefix("content-length:"))
                        .and_then(|v| v.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= pos + 4 + body_len {
                        break;
                    }
                }
            }

            task_hits.fetch_add(1, Ordering::SeqCst);
            task_requests
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(&buf).to_string());

            let response = task_queue_pop(&queue);
            let _ = stream.write_all(response.as_bytes()).await;
            let _ = stream.shutdown().await;
        }
    });

    MockServer {
        addr,
        hits,
        requests,
        handle,
    }
}

fn task_queue_pop(queue: &Arc<Mutex<VecDeque<String>>>) -> String {
    queue
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or_else(|| http_response(200, "OK", r#"{"status":"success","data":null}"#))
}

// ============================================================================
// Fixtures
// ============================================================================

/// Build an unsigned JWT with the given expiry (seconds since epoch).
fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"sub":"1"}}"#, exp).as_bytes());
    format!("{}.{}.sig", header, payload)
}

struct Fixture {
    client: ApiClient,
    tokens: Arc<TokenStore>,
    primary_dir: TempDir,
    #[allow(dead_code)]
    fallback_dir: TempDir,
}

fn client_against(server: &MockServer) -> Fixture {
    let primary_dir = TempDir::new().unwrap();
    let fallback_dir = TempDir::new().unwrap();
    let tokens = Arc::new(TokenStore::with_backends(
        Box::new(FileTokenBackend::new(primary_dir.path().to_path_buf())),
        Box::new(FileTokenBackend::new(fallback_dir.path().to_path_buf())),
    ));
    let client = ApiClient::new(server.base_url(), Arc::clone(&tokens)).unwrap();
    Fixture {
        client,
        tokens,
        primary_dir,
        fallback_dir,
    }
}

fn live_token() -> String {
    jwt_with_exp(Utc::now().timestamp() + 3600)
}

// ============================================================================
// Pre-flight
// ============================================================================

#[tokio::test]
async fn missing_token_rejects_without_touching_the_network() {
    let server = spawn_mock(vec![]).await;
    let f = client_against(&server);

    let result = f.client.list_exercises().await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(server.hit_count(), 0);
}

#[tokio::test]
async fn expired_token_rejects_and_clears_the_store() {
    let server = spawn_mock(vec![]).await;
    let f = client_against(&server);

    f.tokens.set(&jwt_with_exp(Utc::now().timestamp() - 60));

    let result = f.client.list_exercises().await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(server.hit_count(), 0);
    assert!(f.tokens.get().is_none());
}

// ============================================================================
// Bearer attachment and storage healing
// ============================================================================

#[tokio::test]
async fn valid_token_is_attached_as_bearer_header() {
    let server = spawn_mock(vec![http_response(
        200,
        "OK",
        r#"{"status":"success","data":{"exercises_count":12}}"#,
    )])
    .await;
    let f = client_against(&server);

    let token = live_token();
    f.tokens.set(&token);

    let stats = f.client.statistics().await.expect("statistics call");
    assert_eq!(stats.exercises_count, 12);

    let requests = server.captured_requests();
    assert_eq!(requests.len(), 1);
    let request = requests[0].to_lowercase();
    assert!(
        request.contains(&format!("authorization: bearer {}", token.to_lowercase())),
        "missing bearer header in:\n{}",
        requests[0]
    );
    assert!(request.starts_with("get /statistics"));
}

#[tokio::test]
async fn executor_heals_an_empty_primary_slot() {
    let server = spawn_mock(vec![http_response(
        200,
        "OK",
        r#"{"status":"success","data":[]}"#,
    )])
    .await;
    let f = client_against(&server);

    let token = live_token();
    f.tokens.set(&token);

    // Lose the primary slot; the fallback still has the token
    FileTokenBackend::new(f.primary_dir.path().to_path_buf()).clear();
    assert!(!f.tokens.primary_present());

    f.client.list_meals().await.expect("list call");

    // The executor wrote the token back into the primary slot
    assert!(f.tokens.primary_present());
    assert_eq!(f.tokens.get().as_deref(), Some(token.as_str()));
}

// ============================================================================
// Server-side rejection
// ============================================================================

#[tokio::test]
async fn unauthorized_response_clears_credentials_even_after_passing_preflight() {
    let server = spawn_mock(vec![http_response(401, "Unauthorized", r#"{}"#)]).await;
    let f = client_against(&server);

    // Locally the token still looks fine; the server says no
    f.tokens.set(&live_token());

    let result = f.client.list_users().await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
    assert_eq!(server.hit_count(), 1);
    assert!(f.tokens.get().is_none());
}

// ============================================================================
// Error body handling
// ============================================================================

#[tokio::test]
async fn error_body_message_is_surfaced() {
    let server = spawn_mock(vec![http_response(
        500,
        "Internal Server Error",
        r#"{"message":"boom"}"#,
    )])
    .await;
    let f = client_against(&server);
    f.tokens.set(&live_token());

    let err = f.client.list_programs().await.unwrap_err();
    match err {
        ApiError::Request { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "boom");
        }
        other => panic!("expected request error, got {:?}", other),
    }
}

#[tokio::test]
async fn unparsable_error_body_falls_back_to_templated_message() {
    let server = spawn_mock(vec![http_response(
        500,
        "Internal Server Error",
        "<html>oops</html>",
    )])
    .await;
    let f = client_against(&server);
    f.tokens.set(&live_token());

    let err = f.client.list_programs().await.unwrap_err();
    assert!(err.to_string().contains("500"), "got: {}", err);
}

// ============================================================================
// Anonymous calls
// ============================================================================

#[tokio::test]
async fn login_skips_the_preflight_and_returns_the_token() {
    let server = spawn_mock(vec![http_response(200, "OK", r#"{"token":"tok-123"}"#)]).await;
    let f = client_against(&server);

    // No stored token, yet the call goes through
    let token = f
        .client
        .login("admin@example.com", "hunter22")
        .await
        .expect("login");
    assert_eq!(token, "tok-123");
    assert_eq!(server.hit_count(), 1);

    let requests = server.captured_requests();
    let request = requests[0].to_lowercase();
    assert!(request.starts_with("post /auth/login"));
    assert!(!request.contains("authorization:"));
    assert!(request.contains(r#""email":"admin@example.com""#));
}
