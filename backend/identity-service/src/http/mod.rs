/// HTTP API for credential flows
///
/// Thin adapter over [`CredentialService`]: binds JSON bodies, runs request
/// validation, and maps [`IdentityError`](crate::error::IdentityError) to
/// status codes. No business rules live here.
mod auth;

use crate::services::CredentialService;
use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::{future::Future, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Shared HTTP server state
#[derive(Clone)]
pub struct HttpServerState {
    pub credentials: Arc<CredentialService>,
}

/// Build the HTTP router with all auth endpoints
pub fn build_router(state: HttpServerState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/auth/signup", post(auth::signup))
        .route("/auth/login", post(auth::login))
        .route("/auth/check-token", post(auth::check_token))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Serve until `shutdown` resolves
pub async fn start_http_server(
    state: HttpServerState,
    host: &str,
    port: u16,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    let app = build_router(state);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Starting HTTP API server on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| anyhow::anyhow!("HTTP server error: {}", e))?;

    Ok(())
}
