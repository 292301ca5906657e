//! HTTP client for the upstream statistics endpoint.
//!
//! # Responsibilities
//! - Send an `OutboundRequest` to the fixed endpoint
//! - Enforce the per-request timeout
//! - Classify failures into the `UpstreamError` taxonomy
//! - Classify successful bodies into `UpstreamPayload`

use axum::http::StatusCode;
use std::time::Instant;
use url::Url;

use crate::observability::metrics;
use crate::upstream::error::{UpstreamError, UpstreamResult};
use crate::upstream::payload::{decode_body, UpstreamPayload};
use crate::upstream::request::{OutboundRequest, Placement};

/// Client bound to a single upstream endpoint. Cheap to clone.
#[derive(Clone, Debug)]
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: Url,
}

/// A 2xx upstream response with its classified payload.
#[derive(Debug, Clone, PartialEq)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub payload: UpstreamPayload,
}

impl UpstreamReply {
    /// Promote an embedded application error into an HTTP error carrying the
    /// upstream's status and message.
    pub fn into_data(self) -> UpstreamResult<UpstreamPayload> {
        match self.payload {
            UpstreamPayload::ApplicationError { message, .. } => Err(UpstreamError::Http {
                status: self.status,
                body: serde_json::Value::String(message),
            }),
            payload => Ok(payload),
        }
    }
}

impl UpstreamClient {
    /// Create a client for `endpoint`.
    pub fn new(endpoint: &str) -> UpstreamResult<Self> {
        let endpoint = Url::parse(endpoint)
            .map_err(|e| UpstreamError::LocalRequest(format!("invalid upstream URL '{}': {}", endpoint, e)))?;
        let http = reqwest::Client::builder()
            .user_agent(concat!("otp-relay/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstreamError::LocalRequest(e.to_string()))?;

        Ok(Self { http, endpoint })
    }

    /// Issue one call. Non-2xx answers are returned as `UpstreamError::Http`.
    pub async fn send(&self, request: &OutboundRequest) -> UpstreamResult<UpstreamReply> {
        let started = Instant::now();
        let result = self.execute(request).await;

        let outcome = match &result {
            Ok(reply) if reply.payload.is_error() => "application_error",
            Ok(_) => "success",
            Err(e) => e.kind(),
        };
        metrics::record_upstream_call(outcome, started);

        result
    }

    async fn execute(&self, request: &OutboundRequest) -> UpstreamResult<UpstreamReply> {
        let params = request.params.pairs();
        let mut builder = match request.placement {
            Placement::Query => self.http.get(self.endpoint.clone()).query(params),
            Placement::Form => self.http.post(self.endpoint.clone()).form(params),
        };
        if let Some(auth) = &request.basic_auth {
            builder = builder.basic_auth(&auth.username, Some(&auth.password));
        }

        let http_request = builder
            .timeout(request.timeout)
            .build()
            .map_err(|e| UpstreamError::LocalRequest(e.to_string()))?;

        let response = self
            .http
            .execute(http_request)
            .await
            .map_err(UpstreamError::from_transport)?;

        let status = response.status();
        // A body cut short by the timeout or a reset still means no usable response.
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpstreamError::Unreachable(e.to_string()))?;

        if !status.is_success() {
            return Err(UpstreamError::Http {
                status,
                body: decode_body(&bytes),
            });
        }

        Ok(UpstreamReply {
            status,
            payload: UpstreamPayload::from_bytes(&bytes),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::request::ParamSet;
    use serde_json::json;
    use std::time::Duration;

    fn probe_request() -> OutboundRequest {
        OutboundRequest::query(
            ParamSet::new().with("token", "t").with("records", "1"),
            Duration::from_millis(500),
        )
    }

    #[test]
    fn test_invalid_endpoint_is_local_error() {
        let err = UpstreamClient::new("not a url").unwrap_err();
        assert!(matches!(err, UpstreamError::LocalRequest(_)));
    }

    #[tokio::test]
    async fn test_unsupported_scheme_fails_before_io() {
        let client = UpstreamClient::new("ftp://127.0.0.1/stats").unwrap();
        let err = client.send(&probe_request()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::LocalRequest(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_closed_port_is_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = UpstreamClient::new(&format!("http://{}/stats", addr)).unwrap();
        let err = client.send(&probe_request()).await.unwrap_err();
        assert!(matches!(err, UpstreamError::Unreachable(_)), "got {:?}", err);
    }

    #[test]
    fn test_application_error_promoted() {
        let reply = UpstreamReply {
            status: StatusCode::OK,
            payload: UpstreamPayload::parse(json!({"status": "error", "msg": "bad token"})),
        };
        match reply.into_data().unwrap_err() {
            UpstreamError::Http { status, body } => {
                assert_eq!(status, StatusCode::OK);
                assert_eq!(body, json!("bad token"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_data_passes_through() {
        let reply = UpstreamReply {
            status: StatusCode::OK,
            payload: UpstreamPayload::parse(json!([1, 2, 3])),
        };
        assert_eq!(reply.into_data().unwrap().count(), 3);
    }
}
