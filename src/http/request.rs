//! Request handling.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) for every inbound request
//! - Extract record filters from GET query strings and POST bodies (JSON or
//!   form-encoded), rejecting malformed input with the failure envelope

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Query, Request},
    http::{header, request::Parts, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use std::error::Error as StdError;
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::Envelope;
use crate::upstream::RecordFilter;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// Record filters taken from a GET query string.
#[derive(Debug)]
pub struct RecordsQuery(pub RecordFilter);

impl<S> FromRequestParts<S> for RecordsQuery
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(filter) = Query::<RecordFilter>::from_request_parts(parts, state)
            .await
            .map_err(|e| bad_request(filter_error(&e, e.body_text())))?;
        Ok(Self(filter))
    }
}

/// Record filters taken from a POST body.
///
/// Form-encoded bodies are read as a form, anything else as JSON. An empty
/// body means "no filters".
#[derive(Debug)]
pub struct RecordsBody(pub RecordFilter);

impl<S> FromRequest<S> for RecordsBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(filter) = Form::<RecordFilter>::from_request(req, state)
                .await
                .map_err(|e| bad_request(filter_error(&e, e.body_text())))?;
            return Ok(Self(filter));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| bad_request(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(RecordFilter::default()));
        }

        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| bad_request(format!("Invalid JSON body: {}", e)))
    }
}

/// Message for a filter decode failure, identical for query strings and form
/// bodies.
fn filter_error(rejection: &dyn StdError, fallback: String) -> String {
    match rejection.source() {
        Some(cause) => format!("Invalid record filter: {}", cause),
        None => fallback,
    }
}

fn bad_request(message: String) -> Response {
    tracing::warn!(error = %message, "Rejected record filters");
    (
        StatusCode::BAD_REQUEST,
        Json(Envelope::failure("Bad Request", message.into())),
    )
        .into_response()
}
