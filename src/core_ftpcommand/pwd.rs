use crate::helpers::send_response;
use crate::session::Session;
use tokio::io::AsyncWrite;

/// Handles the PWD FTP command. Echoes the session's current directory,
/// quoted, relative to the server root.
pub async fn handle_pwd_command<W>(
    writer: &mut W,
    session: &Session,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let response = format!("257 \"{}\" is current directory", session.current_dir);
    send_response(writer, &response).await
}
