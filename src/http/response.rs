//! Response shapes and error mapping.
//!
//! # Responsibilities
//! - Wrap upstream payloads in the uniform envelope
//! - Map `UpstreamError` to status code and envelope
//!
//! # Design Decisions
//! - Upstream HTTP errors keep their status code
//! - Unreachable upstream → 503 with a fixed message
//! - Local request failures → 500 with the local error text

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::probe::ProbeResult;
use crate::upstream::{UpstreamError, UpstreamPayload};

/// Uniform JSON envelope returned by the record endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl Envelope {
    pub fn records(payload: UpstreamPayload) -> Self {
        let count = payload.count();
        Self {
            success: true,
            data: Some(payload.into_value()),
            count: Some(count),
            error: None,
            message: None,
            status: None,
        }
    }

    pub fn failure(error: &'static str, message: Value) -> Self {
        Self {
            success: false,
            data: None,
            count: None,
            error: Some(error),
            message: Some(message),
            status: None,
        }
    }

    /// Status code and envelope for a failed upstream call.
    pub fn from_error(err: &UpstreamError) -> (StatusCode, Self) {
        let message = err.public_message();
        match err {
            UpstreamError::Http { status, .. } => {
                let mut envelope = Self::failure("API Error", message);
                envelope.status = Some(status.as_u16());
                (*status, envelope)
            }
            UpstreamError::Unreachable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, Self::failure("No Response", message))
            }
            UpstreamError::LocalRequest(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, Self::failure("Server Error", message))
            }
        }
    }
}

impl IntoResponse for UpstreamError {
    fn into_response(self) -> Response {
        let (status, envelope) = Envelope::from_error(&self);
        (status, Json(envelope)).into_response()
    }
}

/// Response from the health endpoint.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub timestamp: String,
}

/// Response from the credential probe.
#[derive(Debug, Serialize)]
pub struct ProbeReport {
    pub message: String,
    pub results: Vec<ProbeResult>,
    pub timestamp: String,
}

impl ProbeReport {
    pub fn new(results: Vec<ProbeResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            message: format!(
                "Probe completed: {} of {} strategies succeeded",
                succeeded,
                results.len()
            ),
            results,
            timestamp: timestamp(),
        }
    }
}

/// Current time as an RFC 3339 UTC string with millisecond precision.
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
