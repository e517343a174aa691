//! Shared fixtures: an in-process stand-in for the Ollama backend and a
//! helper that runs the gateway on an ephemeral port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use serde_json::Value;
use tokio::net::TcpListener;

use llm_gateway::{BackendConfig, Container, ContainerConfig, RetryPolicy};

pub const GENERATE_PATH: &str = "/api/generate";

struct StubState {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
    calls: AtomicUsize,
    requests: Mutex<Vec<Value>>,
    content_types: Mutex<Vec<String>>,
}

/// Fake backend that answers every generate call with the same canned reply
/// and records what it was sent.
pub struct StubBackend {
    addr: SocketAddr,
    state: Arc<StubState>,
}

impl StubBackend {
    pub async fn start(status: StatusCode, body: impl Into<String>) -> Self {
        Self::spawn(status, body.into(), None).await
    }

    pub async fn ok(body: impl Into<String>) -> Self {
        Self::start(StatusCode::OK, body).await
    }

    /// A backend that accepts connections but never answers in time.
    pub async fn hanging(delay: Duration) -> Self {
        Self::spawn(StatusCode::OK, r#"{"response":"too late"}"#.to_string(), Some(delay)).await
    }

    async fn spawn(status: StatusCode, body: String, delay: Option<Duration>) -> Self {
        let state = Arc::new(StubState {
            status,
            body,
            delay,
            calls: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
            content_types: Mutex::new(Vec::new()),
        });

        let app = axum::Router::new()
            .route(GENERATE_PATH, post(generate))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn url(&self) -> String {
        format!("http://{}{}", self.addr, GENERATE_PATH)
    }

    pub fn calls(&self) -> usize {
        self.state.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<Value> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn content_types(&self) -> Vec<String> {
        self.state.content_types.lock().unwrap().clone()
    }
}

async fn generate(State(state): State<Arc<StubState>>, headers: HeaderMap, body: String) -> Response {
    state.calls.fetch_add(1, Ordering::SeqCst);
    state
        .requests
        .lock()
        .unwrap()
        .push(serde_json::from_str(&body).unwrap_or(Value::Null));
    if let Some(content_type) = headers.get(CONTENT_TYPE).and_then(|v| v.to_str().ok()) {
        state
            .content_types
            .lock()
            .unwrap()
            .push(content_type.to_string());
    }

    if let Some(delay) = state.delay {
        tokio::time::sleep(delay).await;
    }

    (
        state.status,
        [(CONTENT_TYPE, "application/json")],
        state.body.clone(),
    )
        .into_response()
}

/// An address nothing is listening on.
pub async fn unused_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}{GENERATE_PATH}")
}

pub fn backend_config(url: &str) -> BackendConfig {
    BackendConfig::new(url, "deepseek-coder:1.3b", Duration::from_secs(5))
}

/// Three attempts with millisecond backoff, so retry tests stay fast.
pub fn fast_retry_policy() -> RetryPolicy {
    RetryPolicy::new(3, Duration::from_millis(10), 2.0, Duration::from_millis(50)).unwrap()
}

/// Runs the gateway against `backend_url` and returns its base URL.
pub async fn spawn_gateway(backend_url: &str) -> String {
    let container = Container::new(ContainerConfig {
        backend: backend_config(backend_url),
        retry_policy: fast_retry_policy(),
    })
    .unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        llm_gateway::serve(Arc::new(container), listener).await.unwrap();
    });

    format!("http://{addr}")
}
