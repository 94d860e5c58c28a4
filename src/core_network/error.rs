use thiserror::Error;

/// Startup failures. These are fatal to the process, unlike per-connection
/// errors, which never propagate past their worker.
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to create or resolve root directory {path}: {source}")]
    RootDir {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to bind listener on {addr}: {source}")]
    Bind {
        addr: String,
        source: std::io::Error,
    },
}
