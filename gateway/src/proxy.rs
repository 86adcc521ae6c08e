//! Forward proxy core: byte-exact pass-through with credential injection.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every browser call under `/api` lands here, gains the service key, and is
//! relayed to the backend origin. The body is never parsed or re-encoded —
//! multipart uploads must reach the backend byte-identical. The gateway
//! never retries; failure classification is its whole error policy.
//!
//! A client disconnect does not abort the in-flight upstream call; at this
//! system's scale that is accepted.

#[cfg(test)]
#[path = "proxy_test.rs"]
mod proxy_test;

use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use crate::config::GatewayConfig;

/// Headers meaningful only for a single transport leg; never copied from the
/// upstream response.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "transfer-encoding",
    "upgrade",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
];

/// Request headers relayed verbatim when the client sent them.
const FORWARDED_REQUEST_HEADERS: &[&str] = &["content-type", "authorization"];

pub const SERVICE_KEY_HEADER: &str = "x-service-key";

/// Shared per-process state: read-only config plus the pooled upstream
/// client. No cross-request state exists.
#[derive(Clone)]
pub struct GatewayState {
    pub config: Arc<GatewayConfig>,
    upstream: reqwest::Client,
}

impl GatewayState {
    /// Build the state and the pooled upstream HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend fails to initialize.
    pub fn new(config: GatewayConfig) -> Result<Self, reqwest::Error> {
        let upstream = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(16)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self { config: Arc::new(config), upstream })
    }
}

fn is_hop_by_hop(name: &str) -> bool {
    HOP_BY_HOP.iter().any(|h| name.eq_ignore_ascii_case(h))
}

/// Join the backend origin with a proxied path (already stripped of the
/// `/api` prefix) and optional query string.
fn upstream_url(origin: &str, path: &str, query: Option<&str>) -> String {
    match query {
        Some(q) if !q.is_empty() => format!("{origin}/{path}?{q}"),
        _ => format!("{origin}/{path}"),
    }
}

/// `ANY /api/{*path}` — relay the request to the backend origin.
pub async fn forward(State(state): State<GatewayState>, req: Request) -> Response {
    let (parts, body) = req.into_parts();

    let path = parts.uri.path().trim_start_matches("/api").trim_start_matches('/').to_owned();
    let query = parts.uri.query().map(str::to_owned);

    // Raw collection with the configured cap; the bytes are relayed as-is.
    let body = match axum::body::to_bytes(body, state.config.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::warn!(%path, error = %err, "rejecting oversized or unreadable body");
            return too_large_response(state.config.max_body_bytes);
        }
    };

    relay(&state, parts.method, &path, query.as_deref(), &parts.headers, body).await
}

async fn relay(
    state: &GatewayState,
    method: axum::http::Method,
    path: &str,
    query: Option<&str>,
    headers: &HeaderMap,
    body: Bytes,
) -> Response {
    let url = upstream_url(&state.config.backend_origin, path, query);

    let mut outbound = state.upstream.request(method, &url).body(body);
    for name in FORWARDED_REQUEST_HEADERS {
        if let Some(value) = headers.get(*name).and_then(|v| v.to_str().ok()) {
            outbound = outbound.header(*name, value);
        }
    }
    if !state.config.service_key.is_empty() {
        outbound = outbound.header(SERVICE_KEY_HEADER, &state.config.service_key);
    }

    match outbound.send().await {
        Ok(upstream) => mirror_response(upstream),
        Err(err) if err.is_connect() || err.is_timeout() => {
            tracing::warn!(%url, error = %err, "backend origin unreachable");
            unavailable_response()
        }
        Err(err) => {
            tracing::error!(%url, error = %err, "proxy relay failed");
            server_error_response(&state.config, &err.to_string())
        }
    }
}

/// Mirror the upstream status and headers (minus hop-by-hop) and stream the
/// body back without touching it.
fn mirror_response(upstream: reqwest::Response) -> Response {
    let mut builder = Response::builder().status(upstream.status());
    for (name, value) in upstream.headers() {
        if is_hop_by_hop(name.as_str()) {
            continue;
        }
        builder = builder.header(name, value);
    }
    match builder.body(Body::from_stream(upstream.bytes_stream())) {
        Ok(resp) => resp,
        Err(err) => {
            tracing::error!(error = %err, "failed to assemble mirrored response");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

fn envelope(code: u16, status: &str, message: &str) -> serde_json::Value {
    json!({ "code": code, "status": status, "data": { "message": message } })
}

/// Synthetic response distinguishing "the backend is down" from every other
/// failure, so clients can offer a retry instead of a bug report.
fn unavailable_response() -> Response {
    let body = envelope(503, "Service Unavailable", "backend origin is unreachable");
    (StatusCode::SERVICE_UNAVAILABLE, Json(body)).into_response()
}

fn server_error_response(config: &GatewayConfig, detail: &str) -> Response {
    let message = if config.is_production() { "internal proxy error" } else { detail };
    let body = envelope(500, "Internal Server Error", message);
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

fn too_large_response(limit: usize) -> Response {
    let body = envelope(
        413,
        "Payload Too Large",
        &format!("request body exceeds the {limit}-byte limit"),
    );
    (StatusCode::PAYLOAD_TOO_LARGE, Json(body)).into_response()
}
