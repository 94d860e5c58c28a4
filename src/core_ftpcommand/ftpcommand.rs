#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    CWD,
    PWD,
    LIST,
    RETR,
    STOR,
    QUIT,
    NOOP,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "CWD" => Some(FtpCommand::CWD),
            "PWD" => Some(FtpCommand::PWD),
            "LIST" => Some(FtpCommand::LIST),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "QUIT" => Some(FtpCommand::QUIT),
            "NOOP" => Some(FtpCommand::NOOP),
            _ => None,
        }
    }

    /// Commands allowed before login: USER, PASS, QUIT and NOOP.
    /// Everything else requires an authenticated session.
    pub fn requires_auth(&self) -> bool {
        !matches!(
            self,
            FtpCommand::USER | FtpCommand::PASS | FtpCommand::QUIT | FtpCommand::NOOP
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_verbs_case_insensitively() {
        assert_eq!(FtpCommand::from_str("USER"), Some(FtpCommand::USER));
        assert_eq!(FtpCommand::from_str("user"), Some(FtpCommand::USER));
        assert_eq!(FtpCommand::from_str("List"), Some(FtpCommand::LIST));
        assert_eq!(FtpCommand::from_str("stor"), Some(FtpCommand::STOR));
    }

    #[test]
    fn unknown_verbs_parse_to_none() {
        assert_eq!(FtpCommand::from_str("PASV"), None);
        assert_eq!(FtpCommand::from_str(""), None);
        assert_eq!(FtpCommand::from_str("RETR7"), None);
    }

    #[test]
    fn auth_gate_covers_filesystem_commands_only() {
        assert!(!FtpCommand::USER.requires_auth());
        assert!(!FtpCommand::PASS.requires_auth());
        assert!(!FtpCommand::QUIT.requires_auth());
        assert!(!FtpCommand::NOOP.requires_auth());
        assert!(FtpCommand::CWD.requires_auth());
        assert!(FtpCommand::PWD.requires_auth());
        assert!(FtpCommand::LIST.requires_auth());
        assert!(FtpCommand::RETR.requires_auth());
        assert!(FtpCommand::STOR.requires_auth());
    }
}
