use crate::constants::RESPONSE_GOODBYE;
use crate::helpers::send_response;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the QUIT FTP command.
///
/// Sends the goodbye line; the connection loop terminates the session after
/// this handler returns.
pub async fn handle_quit_command<W>(writer: &mut W) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    info!("Received QUIT command. Closing connection.");
    send_response(writer, RESPONSE_GOODBYE).await
}
