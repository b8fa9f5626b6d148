//! Gateway server setup
//!
//! Provides the WebSocket server configuration and routes.

mod handler;
mod state;

pub use handler::{close_session, gateway_handler, open_session};
pub use state::GatewayState;

use relay_common::{AppConfig, AppError, JwtVerifier};
use relay_queue::{RedisJobBroker, RedisPool};
use axum::{routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/ws", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Initialize all dependencies and create `GatewayState`
pub fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to Redis...");
    let redis_pool =
        RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;

    let broker = Arc::new(RedisJobBroker::new(redis_pool, &config.queue.name));
    let verifier = Arc::new(JwtVerifier::new(&config.jwt.secret));

    Ok(GatewayState::new(verifier, broker))
}

/// Run the gateway server
pub async fn run_server(app: Router, addr: &str) -> Result<(), AppError> {
    tracing::info!("Starting gateway server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    tracing::info!("Gateway listening on ws://{}/ws", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))?;

    Ok(())
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();

    let state = create_gateway_state(&config)?;
    let app = create_app(state);

    run_server(app, &addr).await
}
