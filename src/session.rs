use std::path::PathBuf;

/// Per-connection state. Each connection worker owns exactly one `Session`;
/// nothing here is shared between connections, so no locking is involved.
#[derive(Debug)]
pub struct Session {
    pub current_dir: String,
    pub base_path: PathBuf, // canonicalized server root
    pub username: Option<String>,
    pub is_authenticated: bool,
}

impl Session {
    pub fn new(base_path: PathBuf) -> Self {
        Self {
            current_dir: String::from("."),
            base_path,
            username: None,
            is_authenticated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_unauthenticated_at_root() {
        let session = Session::new(PathBuf::from("/srv/ftp"));
        assert_eq!(session.current_dir, ".");
        assert!(session.username.is_none());
        assert!(!session.is_authenticated);
    }
}
