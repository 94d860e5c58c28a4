use crate::config::Config;
use crate::constants::{
    RESPONSE_DATA_CONNECTION, RESPONSE_FILE_NOT_FOUND, RESPONSE_SYNTAX_ERROR,
    RESPONSE_TRANSFER_COMPLETE, RESPONSE_TRANSFER_FAILED,
};
use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::send_response;
use crate::session::Session;
use log::{error, info, warn};
use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

const DEFAULT_BUFFER_SIZE: usize = 8 * 1024;

/// Handles the RETR (Retrieve) FTP command.
///
/// Streams the file's raw bytes inline on the control connection, directly
/// after the 150 status line, bounded by the configured download buffer.
/// Nothing frames the payload; the 226 line follows the last chunk.
pub async fn handle_retr_command<W>(
    writer: &mut W,
    config: &Config,
    session: &Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    if arg.trim().is_empty() {
        warn!("RETR command received with no arguments");
        return send_response(writer, RESPONSE_SYNTAX_ERROR).await;
    }

    let file_path = match resolve_path(&session.base_path, &session.current_dir, arg) {
        Some(path) => path,
        None => {
            warn!("RETR target escapes the root: {}", arg);
            return send_response(writer, RESPONSE_FILE_NOT_FOUND).await;
        }
    };

    let mut file = match File::open(&file_path).await {
        Ok(file) => file,
        Err(e) => {
            warn!("File not found or could not be opened: {:?}: {}", file_path, e);
            return send_response(writer, RESPONSE_FILE_NOT_FOUND).await;
        }
    };

    send_response(writer, RESPONSE_DATA_CONNECTION).await?;
    info!("Sending file: {:?}", file_path);

    let buffer_size = config.ftp.download_buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE);
    let mut buffer = vec![0; buffer_size];
    loop {
        let bytes_read = match file.read(&mut buffer).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                // Local read failure after the 150; the control stream is
                // still intact, so the command fails but the session lives.
                error!("Error reading file {:?}: {}", file_path, e);
                return send_response(writer, RESPONSE_TRANSFER_FAILED).await;
            }
        };
        writer.write_all(&buffer[..bytes_read]).await?;
    }
    writer.flush().await?;

    info!("File transfer completed: {:?}", file_path);
    send_response(writer, RESPONSE_TRANSFER_COMPLETE).await
}
