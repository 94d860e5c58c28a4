use crate::config::Config;
use crate::constants::RESPONSE_NOT_LOGGED_IN;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{cwd, list, noop, pass, pwd, quit, retr, stor, user};
use crate::helpers::send_response;
use crate::session::Session;
use tokio::io::{AsyncRead, AsyncWrite};

/// Routes one parsed command to its handler.
///
/// The authentication gate lives here: anything other than USER, PASS, QUIT
/// and NOOP answers 530 on an unauthenticated session before any handler
/// (and any filesystem access) runs.
///
/// `reader` is the control-stream read half; only STOR consumes it, for the
/// inline upload payload.
pub async fn dispatch_command<R, W>(
    command: FtpCommand,
    arg: &str,
    config: &Config,
    session: &mut Session,
    reader: &mut R,
    writer: &mut W,
) -> Result<(), std::io::Error>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    if command.requires_auth() && !session.is_authenticated {
        return send_response(writer, RESPONSE_NOT_LOGGED_IN).await;
    }

    match command {
        FtpCommand::USER => user::handle_user_command(writer, session, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(writer, config, session, arg).await,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, session, arg).await,
        FtpCommand::PWD => pwd::handle_pwd_command(writer, session).await,
        FtpCommand::LIST => list::handle_list_command(writer, session, arg).await,
        FtpCommand::RETR => retr::handle_retr_command(writer, config, session, arg).await,
        FtpCommand::STOR => {
            stor::handle_stor_command(writer, reader, config, session, arg).await
        }
        FtpCommand::QUIT => quit::handle_quit_command(writer).await,
        FtpCommand::NOOP => noop::handle_noop_command(writer).await,
    }
}
