use std::path::PathBuf;

/// Errors that can occur setting up the relay.
///
/// Delivery failures are not here: the sender absorbs them and reports a
/// plain success flag.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The command map file could not be read.
    #[error("can't read command map {path}: {source}")]
    CommandMapRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The command map is not a JSON object of strings.
    #[error("invalid command map {path}: {source}")]
    CommandMapParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A reader thread could not be started.
    #[error("failed to spawn reader thread: {0}")]
    Spawn(std::io::Error),

    /// Transport-level error.
    #[error("transport error: {0}")]
    Transport(#[from] irbridge_transport::TransportError),
}

pub type Result<T> = std::result::Result<T, RelayError>;
