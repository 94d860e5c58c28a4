use crate::constants::RESPONSE_USERNAME_OK;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the USER FTP command.
///
/// Sets the pending username for the session and asks the client for a
/// password. May be sent again at any time; the pending username is simply
/// overwritten.
pub async fn handle_user_command<W>(
    writer: &mut W,
    session: &mut Session,
    username: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    info!("Received USER command with username: {}", username);
    session.username = Some(username.to_string());
    send_response(writer, RESPONSE_USERNAME_OK).await
}
