use crate::config::Config;
use crate::constants::{RESPONSE_LOGIN_FAILED, RESPONSE_LOGIN_OK};
use crate::core_auth::authenticate;
use crate::helpers::send_response;
use crate::session::Session;
use log::{info, warn};
use tokio::io::AsyncWrite;

/// Handles the PASS FTP command.
///
/// Runs the credential check against the pending username set by USER. A
/// PASS with no preceding USER is checked against the empty username and
/// fails like any other bad login.
pub async fn handle_pass_command<W>(
    writer: &mut W,
    config: &Config,
    session: &mut Session,
    password: &str,
) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    let username = session.username.clone().unwrap_or_default();

    if authenticate(&config.auth, &username, password) {
        session.is_authenticated = true;
        info!("User logged in: {}", username);
        send_response(writer, RESPONSE_LOGIN_OK).await
    } else {
        warn!("Login failed for username: {}", username);
        send_response(writer, RESPONSE_LOGIN_FAILED).await
    }
}
