//! Unified error types for Launchpad.
//!
//! Defines [`LaunchpadError`] (process-level failures surfaced by the
//! CLI), [`ValidationError`] for site config validation, [`ForwardError`]
//! for a single outbound backend call, and [`ClientError`] for the
//! waitlist API client. All use `thiserror` for `Display` and `Error`
//! derives. Error messages include contextual hints to guide the user
//! toward a fix.

use std::path::PathBuf;

use hyper::StatusCode;

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub section: String,
    pub field: String,
    pub message: String,
    pub suggestion: Option<String>,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "  {}.{}: {}", self.section, self.field, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " ({suggestion})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

fn format_errors(errors: &[ValidationError]) -> String {
    use std::fmt::Write;
    let mut buf = String::new();
    for (i, e) in errors.iter().enumerate() {
        if i > 0 {
            buf.push('\n');
        }
        // write! to String is infallible (only fails on OOM which is unrecoverable)
        let _ = write!(buf, "{e}");
    }
    buf
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LaunchpadError {
    #[error("Config file not found: {}", path.display())]
    ConfigFileNotFound { path: PathBuf },

    #[error("Config parse error in {path}:\n  {source}")]
    ConfigParse {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Config validation failed:\n{}", format_errors(.errors))]
    ConfigValidation { errors: Vec<ValidationError> },

    #[error("Unsupported config format: '{0}'")]
    UnsupportedFormat(String),

    #[error("Invalid address: {0}")]
    AddressParse(#[from] std::net::AddrParseError),

    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ForwardError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Health check failed with status {0}")]
    HealthCheckFailed(StatusCode),

    #[error("Could not join the waitlist: {0}")]
    Waitlist(String),
}

/// Failure of one outbound call to the backend.
///
/// Each variant maps to the status code and `errorCode` reported in the
/// proxy's error envelope.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ForwardError {
    #[error("Request timeout")]
    Timeout { after_ms: u64 },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("request failed: {0}")]
    Request(String),

    #[error("failed to read response body: {0}")]
    BodyRead(String),

    #[error("backend returned an invalid JSON body: {0}")]
    InvalidResponse(String),

    #[error("HTTP {}", .0.as_u16())]
    Status(StatusCode),

    #[error("invalid backend URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },
}

impl ForwardError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Timeout { .. } => StatusCode::GATEWAY_TIMEOUT,
            Self::Status(status) => *status,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "TIMEOUT",
            Self::Connect(_) => "CONNECTION_ERROR",
            Self::Request(_) => "REQUEST_ERROR",
            Self::BodyRead(_) => "BODY_READ_ERROR",
            Self::InvalidResponse(_) => "INVALID_RESPONSE",
            Self::Status(_) => "HTTP_ERROR",
            Self::InvalidUrl { .. } => "INVALID_URL",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClientError {
    /// The proxy or backend answered with a non-success status.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The launchpad instance itself could not be reached.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: ForwardError,
    },
}
