//! Shared utilities for integration testing.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Multipart, State},
    http::{StatusCode, Uri},
    routing::{get, post},
    Router,
};
use predict_gateway::config::GatewayConfig;
use predict_gateway::http::HttpServer;
use predict_gateway::lifecycle::Shutdown;
use reqwest::multipart::Part;
use tokio::net::TcpListener;

/// One multipart part as the mock downstream saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedPart {
    pub field: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

/// One call received by the mock downstream.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub path: String,
    pub parts: Vec<RecordedPart>,
}

/// What the mock downstream answers with.
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: MockReply,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    hits: Arc<AtomicUsize>,
}

/// A programmable stand-in for the prediction service.
pub struct MockDownstream {
    pub addr: SocketAddr,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    hits: Arc<AtomicUsize>,
}

impl MockDownstream {
    /// Serve `reply` on `/predict`, `/predict_batch` and `/debug/routes`.
    pub async fn start(reply: MockReply) -> Self {
        let state = MockState {
            reply,
            calls: Arc::new(Mutex::new(Vec::new())),
            hits: Arc::new(AtomicUsize::new(0)),
        };
        let calls = state.calls.clone();
        let hits = state.hits.clone();

        let app = Router::new()
            .route("/predict", post(record_upload))
            .route("/predict_batch", post(record_upload))
            .route("/debug/routes", get(answer_probe))
            .with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, calls, hits }
    }

    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Number of requests received on any route.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }
}

async fn record_upload(State(state): State<MockState>, uri: Uri, mut multipart: Multipart) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);

    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.unwrap() {
        parts.push(RecordedPart {
            field: field.name().unwrap_or_default().to_string(),
            filename: field.file_name().map(str::to_string),
            content_type: field.content_type().map(str::to_string),
            data: field.bytes().await.unwrap().to_vec(),
        });
    }
    state.calls.lock().unwrap().push(RecordedCall {
        path: uri.path().to_string(),
        parts,
    });

    reply(&state.reply).await
}

async fn answer_probe(State(state): State<MockState>) -> (StatusCode, String) {
    state.hits.fetch_add(1, Ordering::SeqCst);
    reply(&state.reply).await
}

async fn reply(reply: &MockReply) -> (StatusCode, String) {
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    (StatusCode::from_u16(reply.status).unwrap(), reply.body.clone())
}

/// An address with nothing listening on it.
pub async fn unused_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

/// A config pointing at `downstream_url`, bound to an ephemeral port.
pub fn config_for(downstream_url: &str) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.downstream.base_url = downstream_url.to_string();
    config
}

/// A gateway running in the background of the test.
pub struct TestGateway {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    shutdown: Shutdown,
}

impl TestGateway {
    pub async fn spawn(config: GatewayConfig) -> Self {
        let server = HttpServer::new(config).expect("gateway should build");
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let shutdown = Shutdown::new();
        let receiver = shutdown.subscribe();
        tokio::spawn(async move {
            let _ = server.run(listener, receiver).await;
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        Self { addr, client, shutdown }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// An image part for outbound test requests.
pub fn image_part(filename: &str, data: &[u8]) -> Part {
    Part::bytes(data.to_vec())
        .file_name(filename.to_string())
        .mime_str("image/jpeg")
        .unwrap()
}
