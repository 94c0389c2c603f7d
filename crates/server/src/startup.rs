use std::future::Future;

use axum::Router;
use configs::AppConfig;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::{routes, state::AppState};

/// Build the app from configuration and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    common::env::ensure_data_dir(&cfg.storage.data_dir).await?;
    common::env::check_documents(&[
        cfg.storage.questions_file.as_path(),
        cfg.storage.master_config_file.as_path(),
    ])
    .await;

    let state = AppState::from_config(&cfg)?;

    if let Some(addr) = &cfg.admin.addr {
        common::admin_http::spawn_admin_server(addr, service::metrics::encode_metrics);
    }

    let addr = cfg.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        %addr,
        records = %cfg.storage.records_path().display(),
        upstream = %state.forwarder.upstream_url(),
        "exam sync server listening"
    );

    serve(listener, state.clone(), shutdown_signal()).await?;

    let total = state.records.status().await.total;
    info!(total, "server stopped; exam records on disk");
    Ok(())
}

/// Serve the router on an already-bound listener until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app: Router = routes::build_router(state, routes::build_cors());
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "cannot listen for Ctrl+C; running until killed");
        std::future::pending::<()>().await;
    }
    info!("received Ctrl+C, shutting down");
}
