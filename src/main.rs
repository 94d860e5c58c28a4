use anyhow::Result;
use clap::Parser;
use env_logger::{Builder, Env};
use ferroftpd::config::Config;
use ferroftpd::core_cli::Cli;
use ferroftpd::server;
use log::{info, warn};
use std::io::Write;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    // Load configuration, falling back to defaults when the file is absent
    let mut config = match Config::load_from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Failed to load config file {}: {:#}, using defaults",
                args.config, e
            );
            Config::default()
        }
    };

    // CLI overrides take precedence over the file
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(root) = args.root {
        config.ftp.root_dir = root;
    }

    // One-shot shutdown broadcast, flipped by SIGINT/SIGTERM
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        wait_for_signal().await;
        info!("Received shutdown signal, shutting down gracefully...");
        let _ = shutdown_tx.send(true);
    });

    info!(
        "Starting FTP server on {}:{}",
        config.server.host, config.server.port
    );
    info!("Root directory: {}", config.ftp.root_dir);

    server::run(config, shutdown_rx).await
}

async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = sigterm.recv() => {}
            }
        }
        Err(_) => {
            let _ = tokio::signal::ctrl_c().await;
        }
    }
}
