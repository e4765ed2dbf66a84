//! Placement tracker server entry point.
//!
//! Opens the configured document store, binds the HTTP listener, and serves
//! until Ctrl-C.

use clap::Parser;
use placement_server::{connect, telemetry, Cli, NetworkModule, ServerConfig};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from(Cli::parse());
    telemetry::init_tracing(config.log_format)?;

    if let Some(addr) = config.metrics_addr {
        telemetry::init_metrics(addr)?;
    }

    let store = connect(&config.database).await?;

    let mut network = NetworkModule::new(config.network, store);
    let port = network.start().await?;
    info!(port, "placement server listening");

    network.serve(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
