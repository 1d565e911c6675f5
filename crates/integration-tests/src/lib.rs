//! Integration tests for the order proxy.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p order-proxy-integration-tests
//! ```
//!
//! No external services are needed. Each test starts a mock upstream on an
//! ephemeral loopback port, points a real proxy instance at it and talks to
//! the proxy over HTTP.
//!
//! # Test Categories
//!
//! - `orders` - `/api/orders` contract and failure mapping
//! - `products` - `/api/products` query forwarding
//! - `product` - `/api/product` envelope shapes and validation
//! - `transport` - CORS, method gating, health, fallback

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use order_proxy_core::credentials::{API_KEY_VAR, API_SECRET_VAR, STORE_NAME_VAR};
use order_proxy_server::config::{ProxyConfig, UpstreamConfig};
use order_proxy_server::state::AppState;
use tokio::net::TcpListener;

/// Credentials every test proxy is started with.
pub const STORE_NAME: &str = "demo-store";
pub const API_KEY: &str = "test-key-123";
pub const API_SECRET: &str = "test-secret-456";

/// One request as the mock upstream saw it.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
}

impl RecordedRequest {
    /// Decoded query parameters, in order.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        self.query
            .as_deref()
            .map(|q| {
                reqwest::Url::parse(&format!("http://mock/?{q}"))
                    .map(|url| url.query_pairs().into_owned().collect())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    /// Header value as a string, if present.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    body: Arc<str>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<RecordedRequest>>>,
}

/// A canned upstream that answers every request with one status and body
/// and counts the calls it receives.
pub struct MockUpstream {
    addr: SocketAddr,
    calls: Arc<AtomicUsize>,
    last: Arc<Mutex<Option<RecordedRequest>>>,
}

impl MockUpstream {
    /// Start a mock answering `status` with `body`.
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        Self::start_inner(status, body.into(), None).await
    }

    /// Start a mock that waits `delay` before answering.
    pub async fn start_delayed(status: u16, body: impl Into<String>, delay: Duration) -> Self {
        Self::start_inner(status, body.into(), Some(delay)).await
    }

    /// Start a mock answering `200` with `body` serialized as JSON.
    pub async fn json(body: &serde_json::Value) -> Self {
        Self::start(200, body.to_string()).await
    }

    async fn start_inner(status: u16, body: String, delay: Option<Duration>) -> Self {
        let calls = Arc::new(AtomicUsize::new(0));
        let last = Arc::new(Mutex::new(None));

        let state = MockState {
            status: StatusCode::from_u16(status).expect("valid mock status"),
            body: body.into(),
            delay,
            calls: Arc::clone(&calls),
            last: Arc::clone(&last),
        };

        let app = Router::new().fallback(respond).with_state(state);
        let addr = serve(app).await;

        Self { addr, calls, last }
    }

    /// Base URL to configure the proxy with.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}/v4", self.addr)
    }

    /// Number of requests received so far.
    #[must_use]
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// The most recent request, if any.
    #[must_use]
    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.last.lock().expect("mock lock poisoned").clone()
    }
}

async fn respond(State(mock): State<MockState>, uri: Uri, headers: HeaderMap) -> Response {
    mock.calls.fetch_add(1, Ordering::SeqCst);
    *mock.last.lock().expect("mock lock poisoned") = Some(RecordedRequest {
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
    });

    if let Some(delay) = mock.delay {
        tokio::time::sleep(delay).await;
    }

    (
        mock.status,
        [(header::CONTENT_TYPE, "application/json")],
        mock.body.to_string(),
    )
        .into_response()
}

/// A running proxy bound to an ephemeral port.
pub struct TestProxy {
    addr: SocketAddr,
    pub client: reqwest::Client,
}

impl TestProxy {
    /// Start a proxy in front of `upstream` with default settings.
    pub async fn start(upstream: &MockUpstream) -> Self {
        Self::start_with(upstream, |_| {}).await
    }

    /// Start a proxy, letting the caller adjust the configuration first.
    pub async fn start_with(
        upstream: &MockUpstream,
        adjust: impl FnOnce(&mut ProxyConfig),
    ) -> Self {
        let mut config = test_config(&upstream.base_url());
        adjust(&mut config);

        let state = AppState::new(config).expect("Failed to create application state");
        let addr = serve(order_proxy_server::app(state)).await;

        Self {
            addr,
            client: reqwest::Client::new(),
        }
    }

    /// Absolute URL of a proxy path.
    #[must_use]
    pub fn url(&self, path_and_query: &str) -> String {
        format!("http://{}{path_and_query}", self.addr)
    }

    /// GET a proxy path.
    pub async fn get(&self, path_and_query: &str) -> reqwest::Response {
        self.client
            .get(self.url(path_and_query))
            .send()
            .await
            .expect("Failed to reach proxy")
    }

    /// GET a proxy path and decode the JSON body.
    pub async fn get_json(&self, path_and_query: &str) -> (u16, serde_json::Value) {
        let response = self.get(path_and_query).await;
        let status = response.status().as_u16();
        let body = response.json().await.expect("Proxy returned non-JSON body");
        (status, body)
    }
}

/// Proxy configuration pointing at `base_url` with the test credentials.
///
/// # Panics
///
/// Panics if `base_url` is not a valid upstream URL.
#[must_use]
pub fn test_config(base_url: &str) -> ProxyConfig {
    let mut config = ProxyConfig::from_lookup(|key| match key {
        STORE_NAME_VAR => Some(STORE_NAME.to_string()),
        API_KEY_VAR => Some(API_KEY.to_string()),
        API_SECRET_VAR => Some(API_SECRET.to_string()),
        _ => None,
    })
    .expect("test credentials are valid");

    config.upstream =
        UpstreamConfig::new(base_url, Duration::from_secs(2)).expect("valid upstream URL");
    config
}

/// Serve `app` on an ephemeral loopback port in the background.
async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("listener has an address");

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    addr
}
