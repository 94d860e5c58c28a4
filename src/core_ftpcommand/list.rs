use crate::constants::{
    RESPONSE_DATA_CONNECTION, RESPONSE_DIRECTORY_NOT_FOUND, RESPONSE_TRANSFER_COMPLETE,
};
use crate::core_ftpcommand::utils::resolve_path;
use crate::helpers::send_response;
use crate::session::Session;
use chrono::{DateTime, Local};
use log::warn;
use tokio::io::AsyncWrite;

/// Handles the LIST FTP command.
///
/// Emits one line per directory entry (name, size, modification time,
/// tab-separated) inline on the control connection between the 150 and 226
/// status lines. An empty argument lists the current directory.
pub async fn handle_list_command<W>(
    writer: &mut W,
    session: &Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let list_path = match resolve_path(&session.base_path, &session.current_dir, arg) {
        Some(path) => path,
        None => {
            warn!("LIST target escapes the root: {}", arg);
            return send_response(writer, RESPONSE_DIRECTORY_NOT_FOUND).await;
        }
    };

    let mut entries = match tokio::fs::read_dir(&list_path).await {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Failed to read directory {:?}: {}", list_path, e);
            return send_response(writer, RESPONSE_DIRECTORY_NOT_FOUND).await;
        }
    };

    send_response(writer, RESPONSE_DATA_CONNECTION).await?;

    while let Ok(Some(entry)) = entries.next_entry().await {
        // Entries whose metadata cannot be read are skipped, not fatal.
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };
        let modified: DateTime<Local> = match metadata.modified() {
            Ok(time) => time.into(),
            Err(_) => continue,
        };

        let line = format!(
            "{}\t{}\t{}",
            entry.file_name().to_string_lossy(),
            metadata.len(),
            modified.format("%b %d %H:%M")
        );
        send_response(writer, &line).await?;
    }

    send_response(writer, RESPONSE_TRANSFER_COMPLETE).await
}
