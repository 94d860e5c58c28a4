use crate::config::Config;
use crate::core_network::network;
use anyhow::Result;
use log::{error, info};
use std::sync::Arc;
use tokio::sync::watch;

/// Runs the FTP server with the provided configuration until the shutdown
/// signal flips and the network core has wound down.
pub async fn run(config: Config, shutdown: watch::Receiver<bool>) -> Result<()> {
    info!(
        "Starting server on {}:{}",
        config.server.host, config.server.port
    );

    match network::start_server(Arc::new(config), shutdown).await {
        Ok(()) => info!("Server stopped."),
        Err(e) => {
            error!("Failed to start server: {}", e);
            return Err(e.into());
        }
    }

    Ok(())
}
