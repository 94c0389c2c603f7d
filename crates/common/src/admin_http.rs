//! Lightweight admin HTTP server spawner
//!
//! Exposes `/healthz` and `/metrics` endpoints, with metrics provided by caller.

use axum::http::StatusCode;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info};

async fn healthz() -> &'static str {
    "OK"
}

/// Build the admin router. The metrics are provided by the caller via a function.
pub fn admin_router(metrics_fn: fn() -> (StatusCode, String)) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(move || async move { metrics_fn() }))
}

/// Spawn the admin server on the current runtime. Bind failures are logged
/// and leave the main service running.
pub fn spawn_admin_server(addr: &str, metrics_fn: fn() -> (StatusCode, String)) {
    let addr = addr.to_string();
    tokio::spawn(async move {
        let listener = match TcpListener::bind(&addr).await {
            Ok(l) => l,
            Err(e) => {
                error!(%addr, error = %e, "admin server bind failed");
                return;
            }
        };
        info!(%addr, "admin server listening");
        if let Err(e) = axum::serve(listener, admin_router(metrics_fn)).await {
            error!(%addr, error = %e, "admin server stopped");
        }
    });
}
