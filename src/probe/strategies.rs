//! Authentication strategies tried by the credential probe.
//!
//! Each strategy is a pure function from the probe base to an outbound
//! request. Adding or removing one only touches `STRATEGIES`.

use crate::probe::ProbeBase;
use crate::upstream::{OutboundRequest, ParamSet};

/// A named way of presenting the credential.
pub struct AuthStrategy {
    pub id: &'static str,
    pub build: fn(&ProbeBase) -> OutboundRequest,
}

/// Strategies in report order.
pub const STRATEGIES: &[AuthStrategy] = &[
    AuthStrategy { id: "query-token", build: query_token },
    AuthStrategy { id: "query-token-username", build: query_token_username },
    AuthStrategy { id: "form-body-token", build: form_body_token },
    AuthStrategy { id: "query-api-key", build: query_api_key },
    AuthStrategy { id: "basic-auth", build: basic_auth },
    AuthStrategy { id: "query-key-json", build: query_key_json },
];

fn query_token(base: &ProbeBase) -> OutboundRequest {
    let params = ParamSet::new()
        .with("token", &base.token)
        .with("records", &base.records);
    OutboundRequest::query(params, base.timeout)
}

fn query_token_username(base: &ProbeBase) -> OutboundRequest {
    let params = ParamSet::new()
        .with("token", &base.token)
        .with("username", &base.username)
        .with("records", &base.records);
    OutboundRequest::query(params, base.timeout)
}

fn form_body_token(base: &ProbeBase) -> OutboundRequest {
    let params = ParamSet::new()
        .with("token", &base.token)
        .with("records", &base.records);
    OutboundRequest::form(params, base.timeout)
}

fn query_api_key(base: &ProbeBase) -> OutboundRequest {
    let params = ParamSet::new()
        .with("api_key", &base.token)
        .with("records", &base.records);
    OutboundRequest::query(params, base.timeout)
}

fn basic_auth(base: &ProbeBase) -> OutboundRequest {
    let params = ParamSet::new().with("records", &base.records);
    OutboundRequest::query(params, base.timeout).with_basic_auth(&base.username, &base.token)
}

fn query_key_json(base: &ProbeBase) -> OutboundRequest {
    let params = ParamSet::new()
        .with("key", &base.token)
        .with("records", &base.records)
        .with("format", "json");
    OutboundRequest::query(params, base.timeout)
}
