use crate::constants::{RESPONSE_DIRECTORY_CHANGED, RESPONSE_DIRECTORY_NOT_FOUND};
use crate::core_ftpcommand::utils::{join_relative, resolve_path};
use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the CWD FTP command.
///
/// The target must resolve inside the server root and exist as a directory;
/// containment failures and missing directories get the same 550 so the
/// client learns nothing about the tree outside the root.
pub async fn handle_cwd_command<W>(
    writer: &mut W,
    session: &mut Session,
    arg: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let dir_path = match resolve_path(&session.base_path, &session.current_dir, arg) {
        Some(path) => path,
        None => {
            warn!("CWD target escapes the root: {}", arg);
            return send_response(writer, RESPONSE_DIRECTORY_NOT_FOUND).await;
        }
    };

    match tokio::fs::metadata(&dir_path).await {
        Ok(metadata) if metadata.is_dir() => {
            session.current_dir = join_relative(&session.current_dir, arg);
            info!("Directory changed to: {}", session.current_dir);
            send_response(writer, RESPONSE_DIRECTORY_CHANGED).await
        }
        _ => send_response(writer, RESPONSE_DIRECTORY_NOT_FOUND).await,
    }
}
