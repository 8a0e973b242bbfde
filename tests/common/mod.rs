//! Shared helpers for integration tests

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Query, State},
    http::{Request, StatusCode},
    routing::post,
    Json, Router,
};
use serde_json::Value;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower::Layer;

pub const IPHONE_UA: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 14_0)";
pub const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 10)";
pub const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64)";

pub const SAMPLE_TABLE: &str = r#"{
    "root": {"pc": "https://example.com/"},
    "promoA": {"ios": "https://example.com/ios", "pc": "https://example.com/"},
    "app": {
        "android": "https://play.example.com/app",
        "ios": "https://apps.example.com/app",
        "pc": "https://example.com/app"
    }
}"#;

/// Peer address injected by [`TestConnectInfoLayer`]
pub const TEST_PEER: ([u8; 4], u16) = ([127, 0, 0, 1], 12345);

static COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Unique path under the system temp directory
pub fn temp_path(label: &str) -> PathBuf {
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    std::env::temp_dir().join(format!("signpost-{}-{}-{}", std::process::id(), label, n))
}

/// Write a redirect table to a fresh temp file
pub fn write_table(contents: &str) -> PathBuf {
    let path = temp_path("table").with_extension("json");
    std::fs::write(&path, contents).unwrap();
    path
}

/// Static directory that does not exist, for tests that never touch `/static`
pub fn no_static_dir() -> PathBuf {
    temp_path("no-static")
}

pub fn get(uri: &str, user_agent: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("user-agent", user_agent)
        .header("host", "go.example.com")
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &axum::response::Response) -> &str {
    response
        .headers()
        .get("location")
        .expect("redirect without Location header")
        .to_str()
        .unwrap()
}

/// Helper layer to inject ConnectInfo for tests
#[derive(Clone)]
pub struct TestConnectInfoLayer;

impl<S> Layer<S> for TestConnectInfoLayer {
    type Service = TestConnectInfoMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        TestConnectInfoMiddleware { inner }
    }
}

#[derive(Clone)]
pub struct TestConnectInfoMiddleware<S> {
    inner: S,
}

impl<S, B> tower::Service<Request<B>> for TestConnectInfoMiddleware<S>
where
    S: tower::Service<Request<B>> + Clone,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = S::Future;

    fn poll_ready(
        &mut self,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut req: Request<B>) -> Self::Future {
        let addr = SocketAddr::from(TEST_PEER);
        req.extensions_mut()
            .insert(axum::extract::connect_info::ConnectInfo(addr));
        self.inner.call(req)
    }
}

/// A request received by the fake collector
#[derive(Debug)]
pub struct CollectedRequest {
    pub query: HashMap<String, String>,
    pub body: Value,
}

struct CollectorState {
    tx: mpsc::UnboundedSender<CollectedRequest>,
    status: StatusCode,
}

async fn collect(
    State(state): State<Arc<CollectorState>>,
    Query(query): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> StatusCode {
    let _ = state.tx.send(CollectedRequest { query, body });
    state.status
}

/// Local stand-in for the Measurement Protocol collector.
///
/// Returns the endpoint URL and a receiver for every request it gets.
pub async fn spawn_collector(
    status: StatusCode,
) -> (String, mpsc::UnboundedReceiver<CollectedRequest>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let state = Arc::new(CollectorState { tx, status });

    let app = Router::new()
        .route("/mp/collect", post(collect))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/mp/collect", addr), rx)
}

pub fn remove(path: &Path) {
    std::fs::remove_file(path).ok();
}
