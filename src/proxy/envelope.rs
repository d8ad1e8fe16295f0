//! Request envelope accepted by `POST /api/proxy`.
//!
//! The body is a flat JSON object: `endpoint` names the backend path,
//! `method` (default `POST`) the HTTP method, and every other field is
//! forwarded verbatim as the backend request body.

use std::str::FromStr;

use axum::http::uri::PathAndQuery;
use axum::http::Method;
use bytes::Bytes;
use serde_json::{Map, Value};

pub const HEALTH_ENDPOINT: &str = "/health";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum EnvelopeError {
    #[error("Invalid request body")]
    InvalidBody(String),

    #[error("Missing endpoint parameter")]
    MissingEndpoint,

    #[error("Invalid endpoint parameter")]
    InvalidEndpoint(String),

    #[error("Invalid method parameter")]
    InvalidMethod(String),
}

impl EnvelopeError {
    /// Extra context for the error envelope's `details` field.
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::InvalidBody(details) => Some(details.clone()),
            Self::MissingEndpoint => None,
            Self::InvalidEndpoint(endpoint) => Some(format!(
                "endpoint '{endpoint}' must be a path starting with '/'"
            )),
            Self::InvalidMethod(method) => {
                Some(format!("'{method}' is not a valid HTTP method"))
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProxyEnvelope {
    pub endpoint: String,
    pub method: Method,
    pub body: Map<String, Value>,
}

/// Accept only origin-relative paths so the backend host can never be
/// chosen by the caller.
pub fn validate_endpoint(endpoint: &str) -> Result<(), EnvelopeError> {
    if !endpoint.starts_with('/') || endpoint.starts_with("//") {
        return Err(EnvelopeError::InvalidEndpoint(endpoint.to_string()));
    }
    PathAndQuery::from_str(endpoint)
        .map(|_| ())
        .map_err(|_| EnvelopeError::InvalidEndpoint(endpoint.to_string()))
}

impl ProxyEnvelope {
    pub fn parse(raw: &[u8]) -> Result<Self, EnvelopeError> {
        let value: Value =
            serde_json::from_slice(raw).map_err(|e| EnvelopeError::InvalidBody(e.to_string()))?;
        let Value::Object(mut body) = value else {
            return Err(EnvelopeError::InvalidBody(
                "expected a JSON object".to_string(),
            ));
        };

        let endpoint = match body.remove("endpoint") {
            Some(Value::String(endpoint)) if !endpoint.is_empty() => endpoint,
            _ => return Err(EnvelopeError::MissingEndpoint),
        };
        validate_endpoint(&endpoint)?;

        let method = match body.remove("method") {
            None | Some(Value::Null) => Method::POST,
            Some(Value::String(m)) if m.is_empty() => Method::POST,
            Some(Value::String(m)) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())
                .map_err(|_| EnvelopeError::InvalidMethod(m))?,
            Some(other) => return Err(EnvelopeError::InvalidMethod(other.to_string())),
        };

        Ok(Self {
            endpoint,
            method,
            body,
        })
    }

    #[must_use]
    pub fn is_health_check(&self) -> bool {
        self.endpoint == HEALTH_ENDPOINT
    }

    /// The forwarded JSON body. Only `POST` carries one.
    #[must_use]
    pub fn forwarded_body(&self) -> Option<Bytes> {
        (self.method == Method::POST)
            .then(|| Bytes::from(Value::Object(self.body.clone()).to_string()))
    }
}
