mod config;
mod proxy;
mod routes;

use config::GatewayConfig;
use proxy::GatewayState;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    // Fail closed: a production gateway without its backend origin and
    // service key must not come up at all.
    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "gateway configuration invalid");
            std::process::exit(1);
        }
    };

    let port = config.port;
    tracing::info!(
        backend_origin = %config.backend_origin,
        production = config.is_production(),
        "gateway configured"
    );

    let state = match GatewayState::new(config) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(error = %e, "failed to build upstream client");
            std::process::exit(1);
        }
    };

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "inkwell gateway listening");
    axum::serve(listener, app).await.expect("server failed");
}
