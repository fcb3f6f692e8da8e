/// Terminal status of a code reader.
///
/// Readers never recover from these; the first one ends the stream.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The device read failed.
    #[error("device read error: {0}")]
    Io(#[from] std::io::Error),

    /// The device reported end of stream (a zero-byte read).
    #[error("device closed (end of stream)")]
    Closed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
