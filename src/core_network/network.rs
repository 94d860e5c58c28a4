use crate::config::Config;
use crate::constants::{
    RESPONSE_COMMAND_NOT_IMPLEMENTED, RESPONSE_SYSTEM_SHUTDOWN, RESPONSE_WELCOME,
};
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::dispatch_command;
use crate::core_network::error::ServerError;
use crate::helpers::send_response;
use crate::session::Session;
use log::{debug, error, info, warn};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{split, AsyncBufReadExt, AsyncRead, AsyncWrite, BufReader};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;

const DEFAULT_SHUTDOWN_GRACE_SECS: u64 = 10;

/// Binds the listener and runs the accept loop until the shutdown signal
/// flips. Root-directory and bind failures are fatal.
pub async fn start_server(
    config: Arc<Config>,
    shutdown: watch::Receiver<bool>,
) -> Result<(), ServerError> {
    let root = ensure_root_dir(&config.ftp.root_dir)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| ServerError::Bind {
            addr: addr.clone(),
            source,
        })?;
    info!("FTP server listening on {}", addr);

    serve(listener, config, root, shutdown).await;
    Ok(())
}

fn ensure_root_dir(root_dir: &str) -> Result<PathBuf, ServerError> {
    std::fs::create_dir_all(root_dir).map_err(|source| ServerError::RootDir {
        path: root_dir.to_string(),
        source,
    })?;
    // Canonicalized once here; every path check in the handlers is anchored
    // on this value.
    let root = std::fs::canonicalize(root_dir).map_err(|source| ServerError::RootDir {
        path: root_dir.to_string(),
        source,
    })?;
    info!("Root directory ready: {}", root.display());
    Ok(root)
}

/// The accept loop, split from `start_server` so tests can bind their own
/// listener on an ephemeral port.
///
/// Each accepted connection gets one independent worker task, tracked in a
/// `JoinSet`. On shutdown the listener stops accepting and workers are given
/// a bounded grace period to finish; whatever is still running afterwards
/// (typically a stalled inline transfer) is aborted.
pub async fn serve(
    listener: TcpListener,
    config: Arc<Config>,
    root: PathBuf,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut workers = JoinSet::new();

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((socket, addr)) => {
                    info!("New connection from {}", addr);
                    let config = Arc::clone(&config);
                    let session = Session::new(root.clone());
                    let shutdown = shutdown.clone();
                    workers.spawn(async move {
                        if let Err(e) = handle_connection(socket, config, session, shutdown).await {
                            // Transport errors end the session and are not
                            // reportable to the peer.
                            debug!("Connection from {} ended with error: {}", addr, e);
                        }
                        info!("Connection closed for {}", addr);
                    });
                }
                Err(e) => {
                    if *shutdown.borrow() {
                        break;
                    }
                    error!("Failed to accept connection: {}", e);
                    continue;
                }
            }
        }
    }

    drop(listener);

    let grace = Duration::from_secs(
        config
            .server
            .shutdown_grace
            .unwrap_or(DEFAULT_SHUTDOWN_GRACE_SECS),
    );
    if !workers.is_empty() {
        info!(
            "Waiting up to {:?} for {} active connection(s)",
            grace,
            workers.len()
        );
    }
    let drained = tokio::time::timeout(grace, async {
        while workers.join_next().await.is_some() {}
    })
    .await;
    if drained.is_err() {
        warn!(
            "Shutdown grace period expired, aborting {} connection(s)",
            workers.len()
        );
        workers.shutdown().await;
    }
    info!("FTP server shutdown complete");
}

/// Runs one session to completion: greeting, then the strictly sequential
/// read-dispatch loop. Generic over the stream so tests can drive it with
/// in-memory duplex pipes.
///
/// The loop ends on QUIT, client disconnect, read/write failure, or the
/// shutdown signal (answered with 421 when the session is idle between
/// commands). All owned resources go down with the worker.
pub async fn handle_connection<S>(
    stream: S,
    config: Arc<Config>,
    mut session: Session,
    mut shutdown: watch::Receiver<bool>,
) -> Result<(), std::io::Error>
where
    S: AsyncRead + AsyncWrite + Send + Unpin,
{
    let (read_half, mut writer) = split(stream);
    let mut reader = BufReader::new(read_half);

    send_response(&mut writer, RESPONSE_WELCOME).await?;

    let mut line = String::new();
    loop {
        line.clear();
        let bytes_read = tokio::select! {
            _ = shutdown.changed() => {
                debug!("Shutdown signal received, closing session");
                let _ = send_response(&mut writer, RESPONSE_SYSTEM_SHUTDOWN).await;
                break;
            }
            result = reader.read_line(&mut line) => result?,
        };

        if bytes_read == 0 {
            debug!("Client disconnected");
            break;
        }

        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        debug!("Received command: {}", message);

        // Verb plus the raw remainder; filenames may contain spaces.
        let (verb, arg) = match message.split_once(' ') {
            Some((verb, arg)) => (verb, arg),
            None => (message, ""),
        };

        let command = match FtpCommand::from_str(verb) {
            Some(command) => command,
            None => {
                send_response(&mut writer, RESPONSE_COMMAND_NOT_IMPLEMENTED).await?;
                continue;
            }
        };

        dispatch_command(command, arg, &config, &mut session, &mut reader, &mut writer).await?;

        if command == FtpCommand::QUIT {
            break;
        }
    }

    Ok(())
}
