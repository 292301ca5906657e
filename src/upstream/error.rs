//! Failure taxonomy for upstream calls.

use axum::http::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Why an upstream call did not produce usable data.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// Upstream answered, but with a non-2xx status or an error marker.
    #[error("upstream responded with status {status}")]
    Http { status: StatusCode, body: Value },

    /// No response was received (connect failure, timeout, dropped connection).
    #[error("no response from upstream: {0}")]
    Unreachable(String),

    /// The request failed locally before any network I/O.
    #[error("request could not be sent: {0}")]
    LocalRequest(String),
}

/// Result type for upstream operations.
pub type UpstreamResult<T> = Result<T, UpstreamError>;

/// Caller-facing message when the upstream could not be reached.
pub const UNREACHABLE_MESSAGE: &str = "Could not reach the OTP panel API";

impl UpstreamError {
    /// Classify a transport error reported by the HTTP client.
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_builder() {
            Self::LocalRequest(err.to_string())
        } else {
            Self::Unreachable(err.to_string())
        }
    }

    /// Short label used for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Http { .. } => "http_error",
            Self::Unreachable(_) => "unreachable",
            Self::LocalRequest(_) => "local_error",
        }
    }

    /// Message safe to hand back to callers.
    ///
    /// Upstream bodies are passed through verbatim; transport failures are
    /// replaced by a fixed message.
    pub fn public_message(&self) -> Value {
        match self {
            Self::Http { status, body } if body.is_null() => Value::String(format!(
                "Request failed with status code {}",
                status.as_u16()
            )),
            Self::Http { body, .. } => body.clone(),
            Self::Unreachable(_) => Value::String(UNREACHABLE_MESSAGE.to_string()),
            Self::LocalRequest(message) => Value::String(message.clone()),
        }
    }

    /// Upstream status, when a response was received.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}
