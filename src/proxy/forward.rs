//! Single outbound call to the backend with a wall-clock timeout.
//!
//! [`send`] issues one request through the shared hyper client, collects
//! the whole body and classifies every failure into a [`ForwardError`].
//! [`Backend`] binds the client to the configured origin and timeout so
//! the proxy route and the in-process waitlist client share one path.
//! There are no retries: a timeout aborts the call and is reported.

use std::time::{Duration, Instant};

use axum::http::{HeaderValue, Method};
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{ACCEPT, CONTENT_TYPE};
use hyper::StatusCode;

use crate::error::ForwardError;
use crate::server::HttpClient;

pub const X_REQUEST_ID: &str = "x-request-id";

pub struct SendRequest<'a> {
    pub client: &'a HttpClient,
    pub method: Method,
    pub url: &'a str,
    /// JSON body; `None` sends an empty body.
    pub body: Option<Bytes>,
    pub timeout: Duration,
    pub request_id: &'a str,
}

#[derive(Debug)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub body: Bytes,
    pub latency_ms: u64,
}

impl BackendResponse {
    /// Decode the collected body as JSON.
    pub fn json(&self) -> Result<serde_json::Value, ForwardError> {
        serde_json::from_slice(&self.body).map_err(|e| ForwardError::InvalidResponse(e.to_string()))
    }
}

/// Render an error with its source chain, e.g.
/// `client error (Connect): tcp connect error: Connection refused`.
fn describe(err: &(dyn std::error::Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[allow(clippy::cast_possible_truncation)]
pub async fn send(req: SendRequest<'_>) -> Result<BackendResponse, ForwardError> {
    let SendRequest {
        client,
        method,
        url,
        body,
        timeout,
        request_id,
    } = req;

    let uri: hyper::Uri = url.parse().map_err(|e: hyper::http::uri::InvalidUri| {
        ForwardError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        }
    })?;

    let mut builder = hyper::Request::builder()
        .method(method.clone())
        .uri(uri)
        .header(ACCEPT, "application/json");

    if let Ok(value) = HeaderValue::from_str(request_id) {
        builder = builder.header(X_REQUEST_ID, value);
    }

    let body = match body {
        Some(bytes) => {
            builder = builder.header(CONTENT_TYPE, "application/json");
            bytes
        }
        None => Bytes::new(),
    };

    let request = builder
        .body(Full::new(body))
        .map_err(|e| ForwardError::Request(describe(&e)))?;

    tracing::debug!(
        request_id = %request_id,
        method = %method,
        url = %url,
        "sending backend request"
    );

    let start = Instant::now();

    // The timeout covers the body as well as the headers.
    let exchange = async {
        let response = client.request(request).await.map_err(|e| {
            if e.is_connect() {
                ForwardError::Connect(describe(&e))
            } else {
                ForwardError::Request(describe(&e))
            }
        })?;
        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ForwardError::BodyRead(describe(&e)))?
            .to_bytes();
        Ok::<_, ForwardError>((status, body))
    };

    let (status, body) = tokio::time::timeout(timeout, exchange)
        .await
        .map_err(|_| ForwardError::Timeout {
            after_ms: timeout.as_millis() as u64,
        })??;

    Ok(BackendResponse {
        status,
        body,
        latency_ms: start.elapsed().as_millis() as u64,
    })
}

/// The configured backend origin plus the shared client and timeout.
#[derive(Clone)]
pub struct Backend {
    client: HttpClient,
    base_url: String,
    timeout: Duration,
}

impl Backend {
    #[must_use]
    pub fn new(client: HttpClient, base_url: &str, timeout: Duration) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// `endpoint` must start with `/`; the origin part is never taken
    /// from the caller.
    #[must_use]
    pub fn url_for(&self, endpoint: &str) -> String {
        format!("{}{endpoint}", self.base_url)
    }

    pub async fn call(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Bytes>,
        request_id: &str,
    ) -> Result<BackendResponse, ForwardError> {
        let url = self.url_for(endpoint);
        send(SendRequest {
            client: &self.client,
            method,
            url: &url,
            body,
            timeout: self.timeout,
            request_id,
        })
        .await
    }
}
