//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! The gateway exposes exactly two surfaces: the forward handler for every
//! method under `/api`, and a liveness probe.

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{any, get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::proxy::{GatewayState, forward};

/// Gateway router over the shared state.
pub fn app(state: GatewayState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/{*path}", any(forward))
        .route("/healthz", get(healthz))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}
