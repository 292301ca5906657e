//! Route handlers.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use std::time::Instant;

use crate::http::request::{RecordsBody, RecordsQuery};
use crate::http::response::{timestamp, Envelope, HealthResponse, ProbeReport};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::probe::{run_probe, STRATEGIES};
use crate::upstream::{OutboundRequest, RecordFilter, UpstreamReply};

const RECORDS_ROUTE: &str = "/api/otps";

/// `GET /`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OTP Backend Server Running",
        version: env!("CARGO_PKG_VERSION"),
        timestamp: timestamp(),
    })
}

/// `GET /api/test`: try every authentication strategy once.
pub async fn probe(State(state): State<AppState>) -> Json<ProbeReport> {
    let started = Instant::now();
    tracing::info!(strategies = STRATEGIES.len(), "Probing upstream credentials");

    let results = run_probe(&state.upstream, &state.probe_base, STRATEGIES).await;
    let report = ProbeReport::new(results);

    tracing::info!(summary = %report.message, "Probe finished");
    metrics::record_request("/api/test", 200, started);
    Json(report)
}

/// `GET /api/otps`
pub async fn fetch_records_get(
    State(state): State<AppState>,
    RecordsQuery(filter): RecordsQuery,
) -> Response {
    relay_records(&state, filter).await
}

/// `POST /api/otps`
pub async fn fetch_records_post(
    State(state): State<AppState>,
    RecordsBody(filter): RecordsBody,
) -> Response {
    relay_records(&state, filter).await
}

async fn relay_records(state: &AppState, filter: RecordFilter) -> Response {
    let started = Instant::now();
    let upstream = &state.config;
    let request = OutboundRequest::query(
        filter.to_params(&upstream.token, &upstream.default_records),
        upstream.fetch_timeout(),
    );
    let params = request.params.redacted().to_string();

    tracing::info!(params = %params, "Fetching records from upstream");

    let outcome = state.upstream.send(&request).await.and_then(|reply: UpstreamReply| {
        tracing::info!(status = reply.status.as_u16(), "Upstream responded");
        reply.into_data()
    });

    let response = match outcome {
        Ok(payload) => {
            tracing::info!(count = payload.count(), shape = payload.shape(), "Records received");
            Json(Envelope::records(payload)).into_response()
        }
        Err(e) => {
            match e.status() {
                Some(status) => tracing::error!(
                    params = %params,
                    status = status.as_u16(),
                    body = %e.public_message(),
                    "Upstream returned an error"
                ),
                None => tracing::error!(
                    params = %params,
                    kind = e.kind(),
                    error = %e,
                    "Upstream call failed"
                ),
            }
            e.into_response()
        }
    };

    metrics::record_request(RECORDS_ROUTE, response.status().as_u16(), started);
    response
}
