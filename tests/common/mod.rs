//! Shared utilities for integration testing.

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use std::collections::HashMap;
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use otp_relay::{HttpServer, RelayConfig, Shutdown};

#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";
pub const UPSTREAM_PATH: &str = "/crapi/dgroup/viewstats";

/// One request as seen by the mock upstream.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub method: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub authorization: Option<String>,
}

type Responder =
    Arc<dyn Fn(Captured) -> Pin<Box<dyn Future<Output = (u16, String)> + Send>> + Send + Sync>;

#[derive(Clone)]
struct MockState {
    responder: Responder,
    requests: Arc<Mutex<Vec<Captured>>>,
}

/// A running mock upstream.
pub struct MockUpstream {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<Captured>>>,
}

#[allow(dead_code)]
impl MockUpstream {
    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, UPSTREAM_PATH)
    }

    pub fn captured(&self) -> Vec<Captured> {
        self.requests.lock().unwrap().clone()
    }
}

async fn mock_handler(
    State(state): State<MockState>,
    method: Method,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let captured = Captured {
        method: method.to_string(),
        query,
        form: url::form_urlencoded::parse(body.as_bytes())
            .into_owned()
            .collect(),
        authorization: headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state.requests.lock().unwrap().push(captured.clone());

    let (status, body) = (state.responder)(captured).await;
    (
        StatusCode::from_u16(status).unwrap(),
        [(header::CONTENT_TYPE, "application/json")],
        body,
    )
        .into_response()
}

/// Start a programmable mock upstream with async support.
pub async fn start_programmable_upstream<F, Fut>(f: F) -> MockUpstream
where
    F: Fn(Captured) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = (u16, String)> + Send + 'static,
{
    let responder: Responder = Arc::new(move |captured| Box::pin(f(captured)));
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        responder,
        requests: requests.clone(),
    };

    let app = Router::new()
        .route(UPSTREAM_PATH, any(mock_handler))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    MockUpstream { addr, requests }
}

/// Start a mock upstream that always answers with the same status and body.
#[allow(dead_code)]
pub async fn start_mock_upstream(status: u16, body: &'static str) -> MockUpstream {
    start_programmable_upstream(move |_| async move { (status, body.to_string()) }).await
}

/// An address nothing is listening on.
#[allow(dead_code)]
pub fn closed_addr() -> SocketAddr {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap()
}

/// A running relay under test.
pub struct Relay {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    _shutdown: Shutdown,
}

#[allow(dead_code)]
impl Relay {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the relay on an ephemeral port, pointed at `upstream_url`.
pub async fn start_relay<F>(upstream_url: String, tweak: F) -> Relay
where
    F: FnOnce(&mut RelayConfig),
{
    let mut config = RelayConfig::default();
    config.listener.host = "127.0.0.1".into();
    config.upstream.url = upstream_url;
    config.upstream.token = TEST_TOKEN.into();
    tweak(&mut config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    let client = reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap();

    Relay {
        addr,
        client,
        _shutdown: shutdown,
    }
}
