//! FleetDesk Server: application entry point.

use anyhow::Context;
use clap::Parser;
use fleetdesk_db::DbManager;
use fleetdesk_server::{AppState, Args, router};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("fleetdesk=info".parse()?))
        .json()
        .init();

    let args = Args::parse();
    args.validate()?;

    info!(bind = %args.bind, "starting FleetDesk server");

    let db = DbManager::connect(&args.db_config())
        .await
        .context("failed to connect to SurrealDB")?;
    let state = AppState::new(db.client().clone(), &args.auth_config())?;
    let app = router(state, args.request_timeout());

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("FleetDesk server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
