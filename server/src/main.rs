use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use minesweeper_server::{AppState, Args, MemoryGameStore, create_router};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(args.log_directive()));
    // also captures the `log` records emitted by the engine
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let state = AppState {
        store: Arc::new(MemoryGameStore::new()),
        config: args.server_config(),
    };
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&args.listen_addr)
        .await
        .with_context(|| format!("Could not bind {}", args.listen_addr))?;
    log::info!("Minesweeper API listening on {}", args.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Stopping server");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        log::error!("Failed to install CTRL+C handler: {}", err);
    }
}
