//! Credential probe.
//!
//! Tries every authentication strategy in `strategies.rs` against the
//! upstream endpoint and reports one result per strategy. Strategies run
//! concurrently; the report keeps declaration order. A failing strategy never
//! stops the others.

pub mod strategies;

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::config::UpstreamConfig;
use crate::upstream::{OutboundRequest, UpstreamClient, UpstreamReply, UpstreamResult};

pub use strategies::{AuthStrategy, STRATEGIES};

/// Inputs shared by every strategy.
#[derive(Clone)]
pub struct ProbeBase {
    pub token: String,
    pub username: String,
    pub records: String,
    pub timeout: Duration,
}

impl ProbeBase {
    pub fn from_config(config: &UpstreamConfig) -> Self {
        Self {
            token: config.token.clone(),
            username: config.probe_username.clone(),
            records: config.probe_records.clone(),
            timeout: config.probe_timeout(),
        }
    }
}

/// Outcome of one strategy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub method: &'static str,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

impl ProbeResult {
    fn from_outcome(method: &'static str, outcome: UpstreamResult<(u16, Value)>) -> Self {
        match outcome {
            Ok((status, data)) => Self {
                method,
                success: true,
                status: Some(status),
                data: Some(data),
                error: None,
            },
            Err(e) => Self {
                method,
                success: false,
                status: e.status().map(|s| s.as_u16()),
                data: None,
                error: Some(e.public_message()),
            },
        }
    }
}

async fn attempt(
    client: &UpstreamClient,
    strategy: &AuthStrategy,
    request: OutboundRequest,
) -> ProbeResult {
    let outcome = client.send(&request).await.and_then(|reply: UpstreamReply| {
        let status = reply.status.as_u16();
        reply.into_data().map(|payload| (status, payload.into_value()))
    });

    match &outcome {
        Ok((status, _)) => {
            tracing::info!(strategy = strategy.id, status, "Probe strategy succeeded")
        }
        Err(e) => match e.status() {
            Some(status) => {
                tracing::warn!(strategy = strategy.id, status = %status, "Probe strategy rejected")
            }
            None => tracing::warn!(strategy = strategy.id, error = %e, "Probe strategy failed"),
        },
    }

    ProbeResult::from_outcome(strategy.id, outcome)
}

/// Run every strategy once. Returns exactly one result per strategy, in order.
pub async fn run_probe(
    client: &UpstreamClient,
    base: &ProbeBase,
    strategies: &[AuthStrategy],
) -> Vec<ProbeResult> {
    let attempts = strategies
        .iter()
        .map(|strategy| attempt(client, strategy, (strategy.build)(base)));
    join_all(attempts).await
}
