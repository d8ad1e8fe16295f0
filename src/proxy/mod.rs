//! The `/api/proxy` route: a stateless JSON request translator.
//!
//! [`proxy_post_handler`] accepts a [`ProxyEnvelope`](envelope::ProxyEnvelope),
//! re-issues it against the configured backend origin with a timeout, and
//! relays the backend's JSON and status. [`proxy_get_handler`] does the
//! same for a `GET` named by the `endpoint` query parameter. Failures are
//! reported as an [`ErrorEnvelope`]. Submodules handle envelope parsing
//! ([`envelope`]) and the outbound call ([`forward`]).

pub mod envelope;
pub mod forward;

use std::sync::atomic::Ordering;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::error::ForwardError;
use crate::server::AppState;
use envelope::{validate_endpoint, EnvelopeError, ProxyEnvelope, HEALTH_ENDPOINT};
use forward::X_REQUEST_ID;

/// Synthesized body for a failed proxy call.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backend_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<bool>,
}

impl ErrorEnvelope {
    fn rejected(err: &EnvelopeError) -> Self {
        Self {
            error: err.to_string(),
            details: err.details(),
            error_code: None,
            backend_url: None,
            retry: None,
        }
    }

    fn backend_failure(err: &ForwardError, backend_url: &str, with_retry: bool) -> Self {
        Self {
            error: "Backend request failed".into(),
            details: Some(err.to_string()),
            error_code: Some(err.code().into()),
            backend_url: Some(backend_url.into()),
            retry: with_retry.then(|| err.status() != StatusCode::BAD_REQUEST),
        }
    }
}

/// Reply to a `/health` envelope: the backend's health payload plus
/// what the proxy observed.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthEnvelope {
    pub status: u16,
    pub ok: bool,
    pub data: serde_json::Value,
    pub timestamp: String,
    pub backend_url: String,
}

#[derive(Debug, Deserialize)]
pub struct ProxyQuery {
    pub endpoint: Option<String>,
}

/// Use the caller's `X-Request-ID` when present, otherwise mint one.
#[must_use]
pub fn request_id(headers: &HeaderMap) -> String {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map_or_else(|| uuid::Uuid::new_v4().to_string(), String::from)
}

fn respond<T: Serialize>(status: StatusCode, body: &T, request_id: &str) -> Response {
    (
        status,
        [(X_REQUEST_ID, request_id.to_string())],
        Json(body),
    )
        .into_response()
}

pub async fn proxy_post_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let request_id = request_id(&headers);
    tracing::info!(request_id = %request_id, "proxy request received");

    let envelope = match ProxyEnvelope::parse(&body) {
        Ok(envelope) => envelope,
        Err(e) => {
            tracing::warn!(
                request_id = %request_id,
                error = %e,
                details = ?e.details(),
                "rejected proxy request"
            );
            return respond(
                StatusCode::BAD_REQUEST,
                &ErrorEnvelope::rejected(&e),
                &request_id,
            );
        }
    };

    if envelope.is_health_check() {
        return health_check(&state, &request_id).await;
    }

    let backend_url = state.backend.url_for(&envelope.endpoint);
    tracing::info!(
        request_id = %request_id,
        method = %envelope.method,
        backend_url = %backend_url,
        "proxying request"
    );

    let result = state
        .backend
        .call(
            envelope.method.clone(),
            &envelope.endpoint,
            envelope.forwarded_body(),
            &request_id,
        )
        .await
        .and_then(|response| response.json().map(|json| (response, json)));

    match result {
        Ok((response, json)) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            if response.status.is_success() {
                tracing::info!(
                    request_id = %request_id,
                    endpoint = %envelope.endpoint,
                    status = response.status.as_u16(),
                    latency_ms = response.latency_ms,
                    "backend responded"
                );
            } else {
                tracing::warn!(
                    request_id = %request_id,
                    endpoint = %envelope.endpoint,
                    status = response.status.as_u16(),
                    latency_ms = response.latency_ms,
                    body = %json,
                    "backend returned an error"
                );
            }
            respond(response.status, &json, &request_id)
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            let forwarded_body = envelope
                .forwarded_body()
                .map(|b| String::from_utf8_lossy(&b).into_owned());
            tracing::error!(
                request_id = %request_id,
                error = %e,
                code = e.code(),
                status = e.status().as_u16(),
                backend_url = %backend_url,
                request_body = ?forwarded_body,
                "proxy request failed"
            );
            respond(
                e.status(),
                &ErrorEnvelope::backend_failure(&e, &backend_url, true),
                &request_id,
            )
        }
    }
}

async fn health_check(state: &AppState, request_id: &str) -> Response {
    let backend_url = state.backend.url_for(HEALTH_ENDPOINT);
    tracing::info!(request_id = %request_id, backend_url = %backend_url, "backend health check");

    let result = state
        .backend
        .call(Method::GET, HEALTH_ENDPOINT, None, request_id)
        .await
        .and_then(|response| {
            if response.status.is_success() {
                response.json().map(|json| (response.status, json))
            } else {
                Err(ForwardError::Status(response.status))
            }
        });

    match result {
        Ok((status, data)) => {
            tracing::info!(request_id = %request_id, status = status.as_u16(), "backend healthy");
            let body = HealthEnvelope {
                status: status.as_u16(),
                ok: status.is_success(),
                data,
                timestamp: chrono::Utc::now()
                    .to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
                backend_url,
            };
            respond(StatusCode::OK, &body, request_id)
        }
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                code = e.code(),
                backend_url = %backend_url,
                "backend health check failed"
            );
            let body = ErrorEnvelope {
                error: "Backend health check failed".into(),
                details: Some(e.to_string()),
                error_code: Some(e.code().into()),
                backend_url: Some(backend_url),
                retry: None,
            };
            respond(StatusCode::SERVICE_UNAVAILABLE, &body, request_id)
        }
    }
}

pub async fn proxy_get_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ProxyQuery>,
    headers: HeaderMap,
) -> Response {
    let request_id = request_id(&headers);
    let endpoint = query
        .endpoint
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| HEALTH_ENDPOINT.to_string());

    tracing::info!(request_id = %request_id, endpoint = %endpoint, "GET proxy request");

    if let Err(e) = validate_endpoint(&endpoint) {
        tracing::warn!(request_id = %request_id, error = %e, "rejected proxy request");
        return respond(
            StatusCode::BAD_REQUEST,
            &ErrorEnvelope::rejected(&e),
            &request_id,
        );
    }

    let backend_url = state.backend.url_for(&endpoint);
    let result = state
        .backend
        .call(Method::GET, &endpoint, None, &request_id)
        .await
        .and_then(|response| {
            if response.status.is_success() {
                response.json()
            } else {
                Err(ForwardError::Status(response.status))
            }
        });

    match result {
        Ok(json) => {
            state.stats.forwarded.fetch_add(1, Ordering::Relaxed);
            respond(StatusCode::OK, &json, &request_id)
        }
        Err(e) => {
            state.stats.failed.fetch_add(1, Ordering::Relaxed);
            tracing::error!(
                request_id = %request_id,
                error = %e,
                code = e.code(),
                status = e.status().as_u16(),
                backend_url = %backend_url,
                "GET proxy request failed"
            );
            respond(
                e.status(),
                &ErrorEnvelope::backend_failure(&e, &backend_url, false),
                &request_id,
            )
        }
    }
}
