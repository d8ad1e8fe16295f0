//! `GET /health` endpoint handler.
//!
//! Returns a [`HealthResponse`] JSON payload describing this process:
//! version and build, uptime, the backend it proxies to, config source
//! metadata, and cumulative request statistics. It does not call the
//! backend; use `POST /api/proxy {"endpoint": "/health"}` for that.

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::server::AppState;

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub build: BuildInfo,
    pub uptime_seconds: u64,
    pub backend: BackendHealth,
    pub config: ConfigHealth,
    pub stats: StatsResponse,
}

#[derive(Serialize, Deserialize)]
pub struct BuildInfo {
    pub commit: String,
    pub profile: String,
}

#[derive(Serialize, Deserialize)]
pub struct BackendHealth {
    pub url: String,
    pub timeout_ms: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ConfigHealth {
    pub source: String,
    pub version: String,
    pub analytics: bool,
}

#[derive(Serialize, Deserialize)]
pub struct StatsResponse {
    pub requests_forwarded: u64,
    pub requests_failed: u64,
    pub waitlist_signups: u64,
}

#[allow(clippy::cast_possible_truncation)]
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let loaded = &state.config;

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        build: BuildInfo {
            commit: env!("LAUNCHPAD_GIT_SHORT").to_string(),
            profile: env!("LAUNCHPAD_BUILD_PROFILE").to_string(),
        },
        uptime_seconds: state.start_time.elapsed().as_secs(),
        backend: BackendHealth {
            url: state.backend.base_url().to_string(),
            timeout_ms: state.backend.timeout().as_millis() as u64,
        },
        config: ConfigHealth {
            source: loaded.source_name.clone(),
            version: loaded.version.short().to_string(),
            analytics: loaded.config.analytics.is_some(),
        },
        stats: StatsResponse {
            requests_forwarded: state.stats.forwarded.load(Ordering::Relaxed),
            requests_failed: state.stats.failed.load(Ordering::Relaxed),
            waitlist_signups: state.stats.signups.load(Ordering::Relaxed),
        },
    })
}
