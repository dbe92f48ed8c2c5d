//! HTTP server facade for libris: routing, error pages and views.

use anyhow::Context;
use axum::{extract::Request, http::HeaderValue, routing::get, Router};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::{Timestamp, Uuid};

use libris_kernel::{AppState, ModuleRegistry};

pub mod error;
pub mod response;
pub mod router;
pub mod views;

use router::RouterBuilder;

/// Serve the catalog until ctrl-c
pub async fn start_server(registry: &ModuleRegistry, state: AppState) -> anyhow::Result<()> {
    let address = format!("{}:{}", state.settings.server.host, state.settings.server.port);
    tracing::info!("starting HTTP server on {}", address);

    let app = build_router(registry, state);

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind to {address}"))?;

    tracing::info!("HTTP server listening on http://{}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    Ok(())
}

/// Build the main HTTP router with all module routes mounted under `/catalog`
pub fn build_router(registry: &ModuleRegistry, state: AppState) -> Router {
    let timeout = state.settings.server.request_timeout_ms;

    RouterBuilder::new()
        .route("/", get(|| async { response::redirect("/catalog") }))
        .route("/healthz", get(health_check))
        .mount_modules("/catalog", registry)
        .with_not_found_fallback()
        .with_error_pages(&state)
        .with_request_id()
        .with_timeout(timeout)
        .with_tracing()
        .build(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "ok"
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

/// Request ID generator for tracing
#[derive(Clone)]
struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let timestamp = Timestamp::now(uuid::NoContext);
        let request_id = Uuid::new_v7(timestamp)
            .to_string()
            .parse::<HeaderValue>()
            .ok()?;
        Some(RequestId::new(request_id))
    }
}
