use crate::constants::RESPONSE_OK;
use crate::helpers::send_response;
use tokio::io::AsyncWrite;

/// Handles the NOOP FTP command. Touches nothing.
pub async fn handle_noop_command<W>(writer: &mut W) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    send_response(writer, RESPONSE_OK).await
}
