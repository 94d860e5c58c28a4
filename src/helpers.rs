use log::debug;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Sends one CRLF-terminated status line to the client.
pub async fn send_response<W>(writer: &mut W, message: &str) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(message.as_bytes()).await?;
    writer.write_all(b"\r\n").await?;
    writer.flush().await?;
    debug!("Sent response: {}", message);
    Ok(())
}
