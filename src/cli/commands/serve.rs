use std::time::Duration;

use anyhow::Context;
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing::{error, info};

use crate::api;
use crate::config::Config;

/// Run the HTTP API until ctrl-c.
pub async fn run(config: Config, prometheus_handle: Option<PrometheusHandle>) -> anyhow::Result<()> {
    info!(
        "Cartwheel v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let host = config.server.host.clone();
    let port = config.server.port;
    let sweep_interval_minutes = config.security.session_sweep_interval_minutes.max(1);

    let state = api::create_app_state_from_config(config, prometheus_handle).await?;

    // Expired sessions are already rejected at auth time; the sweeper keeps
    // the table from growing without bound.
    let sweeper_handle = {
        let store = state.store.clone();
        tokio::spawn(async move {
            let mut ticker =
                tokio::time::interval(Duration::from_secs(sweep_interval_minutes * 60));
            loop {
                ticker.tick().await;
                match store.delete_expired_sessions().await {
                    Ok(0) => {}
                    Ok(n) => info!("Swept {n} expired sessions"),
                    Err(e) => error!("Session sweep failed: {e}"),
                }
            }
        })
    };

    let app = api::router(state);
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    let server_handle = tokio::spawn(async move {
        info!("API server running at http://{addr}");
        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {e}");
        }
    });

    info!("Press Ctrl+C to stop.");

    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {e}"),
    }

    sweeper_handle.abort();
    server_handle.abort();
    info!("Server stopped");

    Ok(())
}
