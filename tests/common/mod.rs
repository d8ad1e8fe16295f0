//! Shared fixtures: a stub waitlist backend and a launchpad instance
//! pointed at it.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use launchpad::config::model::SiteConfig;
use launchpad::config::LoadedConfig;
use launchpad::server::{self, AppState};

pub const TAKEN_EMAIL: &str = "taken@example.com";
pub const BACKEND_TIMEOUT_MS: u64 = 200;

/// What the stub backend saw.
#[derive(Default)]
pub struct Seen {
    pub request_ids: Vec<String>,
    pub bodies: Vec<Value>,
}

pub type SeenLog = Arc<Mutex<Seen>>;

async fn waitlist(
    State(seen): State<SeenLog>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    {
        let mut seen = seen.lock().unwrap();
        if let Some(id) = headers.get("x-request-id").and_then(|v| v.to_str().ok()) {
            seen.request_ids.push(id.to_string());
        }
        seen.bodies.push(body.clone());
    }

    match body.get("email").and_then(Value::as_str) {
        Some(TAKEN_EMAIL) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": "Email already registered" })),
        ),
        Some(email) if email.contains('@') => (
            StatusCode::OK,
            Json(json!({ "message": "Successfully joined waitlist", "email": email })),
        ),
        _ => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "detail": [{ "loc": ["body", "email"], "msg": "value is not a valid email address" }] })),
        ),
    }
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "late": true }))
}

/// Start the stub backend on an ephemeral port.
pub async fn start_backend() -> (SocketAddr, SeenLog) {
    let seen = SeenLog::default();
    let router = Router::new()
        .route("/api/waitlist", post(waitlist))
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/api/items", get(|| async { Json(json!([1, 2, 3])) }))
        .route("/slow", get(slow).post(slow))
        .route("/text", get(|| async { "plain text" }).post(|| async { "plain text" }))
        .with_state(seen.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, seen)
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

pub fn site_config(backend_url: &str) -> SiteConfig {
    let mut config = SiteConfig::default();
    config.proxy.backend_url = backend_url.to_string();
    config.proxy.timeout = BACKEND_TIMEOUT_MS;
    config
}

/// Start launchpad against `backend_url`.
pub async fn start_launchpad_with(
    config: SiteConfig,
) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    let state = Arc::new(AppState::new(
        LoadedConfig::from_config(config),
        PathBuf::from("public"),
    ));
    let router = server::build_router(state, 65_536);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

    tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    (addr, shutdown_tx)
}

pub async fn start_launchpad(backend_url: &str) -> (SocketAddr, tokio::sync::oneshot::Sender<()>) {
    start_launchpad_with(site_config(backend_url)).await
}
