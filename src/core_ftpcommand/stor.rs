use crate::config::Config;
use crate::constants::{
    RESPONSE_DATA_CONNECTION, RESPONSE_FILE_NOT_FOUND, RESPONSE_PERMISSION_DENIED,
    RESPONSE_SYNTAX_ERROR, RESPONSE_TRANSFER_COMPLETE, RESPONSE_TRANSFER_FAILED,
};
use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info, warn};
use std::io::ErrorKind;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Handles the STOR (Store File) FTP command.
///
/// Reads raw bytes inline from the control connection until the client
/// closes its write side, writing them to the target file. There is no
/// end-of-transfer marker besides stream closure, so no further command can
/// follow a STOR on the same connection unless the client half-closes.
pub async fn handle_stor_command<R, W>(
    writer: &mut W,
    reader: &mut R,
    config: &Config,
    session: &Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if arg.trim().is_empty() {
        warn!("STOR command received with no arguments");
        return send_response(writer, RESPONSE_SYNTAX_ERROR).await;
    }

    let file_path = match resolve_path(&session.base_path, &session.current_dir, arg) {
        Some(path) => path,
        None => {
            warn!("STOR target escapes the root: {}", arg);
            return send_response(writer, RESPONSE_FILE_NOT_FOUND).await;
        }
    };

    let mut file = match File::create(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            error!("Failed to create file {:?}: {}", file_path, e);
            let message = match e.kind() {
                ErrorKind::PermissionDenied => RESPONSE_PERMISSION_DENIED,
                _ => RESPONSE_FILE_NOT_FOUND,
            };
            return send_response(writer, message).await;
        }
    };

    send_response(writer, RESPONSE_DATA_CONNECTION).await?;
    info!("Receiving file: {:?}", file_path);

    let buffer_size = config.ftp.upload_buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
    let mut buffer = vec![0; buffer_size];
    loop {
        let bytes_read = match reader.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                error!("Error reading upload from control stream: {}", e);
                send_response(writer, RESPONSE_TRANSFER_FAILED).await?;
                return Err(e);
            }
        };
        if let Err(e) = file.write_all(&buffer[..bytes_read]).await {
            error!("Error writing to file {:?}: {}", file_path, e);
            send_response(writer, RESPONSE_TRANSFER_FAILED).await?;
            return Err(e);
        }
    }
    file.flush().await?;

    info!("File stored: {:?}", file_path);
    send_response(writer, RESPONSE_TRANSFER_COMPLETE).await
}
