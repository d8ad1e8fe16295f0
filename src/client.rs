//! Waitlist API client wrapper.
//!
//! [`WaitlistApi`] is the single user action the form needs. Two
//! implementations exist: [`ProxyClient`] talks HTTP to a running
//! launchpad's `/api/proxy` route (used by `launchpad join` and
//! `launchpad health --backend`), and [`BackendClient`] calls the backend
//! in-process through the same [`Backend`] the proxy route uses (used by
//! the server-rendered form). Both turn non-success replies into a
//! human-readable [`ClientError::Rejected`].

use std::time::Duration;

use async_trait::async_trait;
use axum::http::Method;
use bytes::Bytes;
use serde_json::{json, Value};

use crate::error::{ClientError, ForwardError};
use crate::proxy::envelope::HEALTH_ENDPOINT;
use crate::proxy::forward::{self, Backend, BackendResponse, SendRequest};
use crate::proxy::{ErrorEnvelope, HealthEnvelope};
use crate::server::HttpClient;

pub const WAITLIST_ENDPOINT: &str = "/api/waitlist";
pub const DEFAULT_JOIN_ERROR: &str = "Failed to join waitlist";

// async_trait keeps WaitlistApi object-safe so callers can hold a
// `&dyn WaitlistApi`.
#[async_trait]
pub trait WaitlistApi: Send + Sync {
    async fn join_waitlist(&self, email: &str) -> Result<(), ClientError>;
}

/// Pull a readable message out of an error body.
///
/// Accepts `{"detail": "..."}` and the validation form
/// `{"detail": [{"msg": "..."}]}`; anything else yields `fallback`.
#[must_use]
pub fn error_message(body: &[u8], fallback: &str) -> String {
    let Ok(value) = serde_json::from_slice::<Value>(body) else {
        return fallback.to_string();
    };
    match value.get("detail") {
        Some(Value::String(detail)) if !detail.is_empty() => detail.clone(),
        Some(Value::Array(items)) => items
            .iter()
            .find_map(|item| item.get("msg").and_then(Value::as_str))
            .map_or_else(|| fallback.to_string(), String::from),
        _ => fallback.to_string(),
    }
}

fn join_result(response: &BackendResponse) -> Result<(), ClientError> {
    if response.status.is_success() {
        Ok(())
    } else {
        Err(ClientError::Rejected {
            status: response.status.as_u16(),
            message: error_message(&response.body, DEFAULT_JOIN_ERROR),
        })
    }
}

fn waitlist_body(email: &str) -> Bytes {
    Bytes::from(json!({ "email": email }).to_string())
}

/// HTTP client for a running launchpad instance.
pub struct ProxyClient {
    http: HttpClient,
    base_url: String,
    timeout: Duration,
}

impl ProxyClient {
    #[must_use]
    pub fn new(http: HttpClient, base_url: &str, timeout: Duration) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    fn proxy_url(&self) -> String {
        format!("{}/api/proxy", self.base_url)
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<Bytes>,
    ) -> Result<BackendResponse, ClientError> {
        let request_id = uuid::Uuid::new_v4().to_string();
        forward::send(SendRequest {
            client: &self.http,
            method,
            url,
            body,
            timeout: self.timeout,
            request_id: &request_id,
        })
        .await
        .map_err(|source| ClientError::Transport {
            url: url.to_string(),
            source,
        })
    }

    /// Ask the proxy to check the backend's `/health`.
    pub async fn backend_health(&self) -> Result<HealthEnvelope, ClientError> {
        let url = self.proxy_url();
        let body = json!({ "endpoint": HEALTH_ENDPOINT }).to_string();
        let response = self
            .send(Method::POST, &url, Some(Bytes::from(body)))
            .await?;
        if !response.status.is_success() {
            return Err(ClientError::Rejected {
                status: response.status.as_u16(),
                message: health_failure(&response.body),
            });
        }
        serde_json::from_slice(&response.body).map_err(|e| ClientError::Transport {
            url,
            source: ForwardError::InvalidResponse(e.to_string()),
        })
    }
}

/// `Backend health check failed: <details>` from the proxy's error envelope.
fn health_failure(body: &[u8]) -> String {
    const FALLBACK: &str = "Backend health check failed";
    match serde_json::from_slice::<ErrorEnvelope>(body) {
        Ok(ErrorEnvelope {
            error,
            details: Some(details),
            ..
        }) => format!("{error}: {details}"),
        Ok(envelope) => envelope.error,
        Err(_) => FALLBACK.to_string(),
    }
}

#[async_trait]
impl WaitlistApi for ProxyClient {
    async fn join_waitlist(&self, email: &str) -> Result<(), ClientError> {
        let body = json!({ "endpoint": WAITLIST_ENDPOINT, "email": email }).to_string();
        let response = self
            .send(Method::POST, &self.proxy_url(), Some(Bytes::from(body)))
            .await?;
        join_result(&response)
    }
}

/// In-process client that reaches the backend without going through HTTP
/// to ourselves.
pub struct BackendClient<'a> {
    backend: &'a Backend,
    request_id: &'a str,
}

impl<'a> BackendClient<'a> {
    #[must_use]
    pub const fn new(backend: &'a Backend, request_id: &'a str) -> Self {
        Self {
            backend,
            request_id,
        }
    }
}

#[async_trait]
impl WaitlistApi for BackendClient<'_> {
    async fn join_waitlist(&self, email: &str) -> Result<(), ClientError> {
        let result = self
            .backend
            .call(
                Method::POST,
                WAITLIST_ENDPOINT,
                Some(waitlist_body(email)),
                self.request_id,
            )
            .await;

        match result {
            Ok(response) => join_result(&response),
            // Mirrors what the browser sees from the proxy's error envelope,
            // which carries no `detail`.
            Err(e) => {
                tracing::error!(
                    request_id = %self.request_id,
                    error = %e,
                    code = e.code(),
                    "waitlist submission failed"
                );
                Err(rejected_by_proxy(&e))
            }
        }
    }
}

fn rejected_by_proxy(err: &ForwardError) -> ClientError {
    ClientError::Rejected {
        status: err.status().as_u16(),
        message: DEFAULT_JOIN_ERROR.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_detail_is_used() {
        let body = br#"{"detail": "Email already registered"}"#;
        assert_eq!(error_message(body, DEFAULT_JOIN_ERROR), "Email already registered");
    }

    #[test]
    fn validation_detail_uses_first_msg() {
        let body = br#"{"detail": [{"loc": ["body", "email"], "msg": "value is not a valid email address"}]}"#;
        assert_eq!(
            error_message(body, DEFAULT_JOIN_ERROR),
            "value is not a valid email address"
        );
    }

    #[test]
    fn proxy_envelope_falls_back_to_default() {
        let body = br#"{"error": "Backend request failed", "details": "Request timeout"}"#;
        assert_eq!(error_message(body, DEFAULT_JOIN_ERROR), DEFAULT_JOIN_ERROR);
    }

    #[test]
    fn non_json_falls_back_to_default() {
        assert_eq!(error_message(b"<html>", DEFAULT_JOIN_ERROR), DEFAULT_JOIN_ERROR);
        assert_eq!(error_message(b"", DEFAULT_JOIN_ERROR), DEFAULT_JOIN_ERROR);
    }

    #[test]
    fn health_failure_uses_envelope_details() {
        let body = br#"{"error": "Backend health check failed", "details": "Request timeout", "errorCode": "TIMEOUT"}"#;
        assert_eq!(health_failure(body), "Backend health check failed: Request timeout");
        assert_eq!(health_failure(b"<html>"), "Backend health check failed");
    }

    #[test]
    fn forward_errors_keep_status() {
        let err = rejected_by_proxy(&ForwardError::Timeout { after_ms: 10 });
        assert!(matches!(
            err,
            ClientError::Rejected { status: 504, ref message } if message == DEFAULT_JOIN_ERROR
        ));
    }
}
