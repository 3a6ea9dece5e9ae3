//! lotto-server binary entry point.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;

use lotto_server::{router, AppContext, ServerConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ServerConfig::parse();
    config.validate()?;
    let addr = config.bind_addr();
    log::info!(
        "Starting lotto-server on {} (policy={:?}, model={:?}, data={:?})",
        addr,
        config.auth_policy,
        config.model_path,
        config.data_path,
    );

    let ctx = Arc::new(AppContext::from_config(config)?);
    let app = router(ctx);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Cannot bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    log::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Cannot listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    log::info!("Shutdown requested");
}
